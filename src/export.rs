use egui::Vec2;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, RgbaImage};
use std::path::Path;

use crate::error::ExportError;
use crate::surface::{Surface, blend_source_over};

/// File name for an export taken at `millis` since the UNIX epoch.
pub fn export_file_name(millis: u64) -> String {
    format!("{millis}.jpg")
}

/// Draws `layers` in order into a fresh buffer of `size` logical units.
///
/// Each layer is sampled nearest-neighbour through its own device scale, so a
/// surface larger than `size` is cropped at the bottom and right.
pub fn composite(layers: &[&Surface], size: Vec2) -> RgbaImage {
    let width = size.x.round().max(0.0) as u32;
    let height = size.y.round().max(0.0) as u32;
    let mut out = RgbaImage::new(width, height);

    for layer in layers {
        let scale = layer.device_scale();
        let source = layer.image();
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let sx = ((x as f32 + 0.5) * scale.x).floor() as u32;
            let sy = ((y as f32 + 0.5) * scale.y).floor() as u32;
            if sx < source.width() && sy < source.height() {
                blend_source_over(pixel, *source.get_pixel(sx, sy));
            }
        }
    }
    out
}

/// Flattens onto white and encodes as JPEG.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyImage { width, height });
    }

    let mut flattened = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for (x, y, pixel) in image.enumerate_pixels() {
        let alpha = pixel[3] as f32 / 255.0;
        let target = flattened.get_pixel_mut(x, y);
        for channel in 0..3 {
            let value = pixel[channel] as f32 * alpha + 255.0 * (1.0 - alpha);
            target[channel] = value.round() as u8;
        }
    }

    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    flattened.write_with_encoder(encoder)?;
    Ok(bytes)
}

/// Writes the export into `export_dir` (or the working directory).
#[cfg(not(target_arch = "wasm32"))]
pub fn deliver_download(
    file_name: &str,
    bytes: &[u8],
    export_dir: Option<&Path>,
) -> Result<(), ExportError> {
    let dir = export_dir.unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    log::info!("Exported {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Triggers a browser download through a synthesized anchor click.
#[cfg(target_arch = "wasm32")]
pub fn deliver_download(
    file_name: &str,
    bytes: &[u8],
    _export_dir: Option<&Path>,
) -> Result<(), ExportError> {
    use eframe::wasm_bindgen::{JsCast as _, JsValue};

    let browser = |err: JsValue| ExportError::Browser(format!("{err:?}"));

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| ExportError::Browser("no document".to_owned()))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/jpeg");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(browser)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(browser)?;

    let anchor = document
        .create_element("a")
        .map_err(browser)?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| ExportError::Browser("anchor is not an HtmlAnchorElement".to_owned()))?;
    anchor.set_download(file_name);
    anchor.set_href(&url);
    anchor.click();
    anchor.remove();

    web_sys::Url::revoke_object_url(&url).map_err(browser)?;
    log::info!("Exported {} bytes as {}", bytes.len(), file_name);
    Ok(())
}
