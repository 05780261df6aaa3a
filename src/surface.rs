use egui::{Color32, Pos2, Vec2, pos2, vec2};
use image::{Rgba, RgbaImage};
use std::sync::atomic::{AtomicU64, Ordering};

// Shared across all surfaces so a (surface, generation) pair never repeats
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Paint attributes pushed by `save` and popped by `restore`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PaintState {
    stroke_color: Color32,
    line_width: f32,
    scale: Vec2,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            stroke_color: Color32::BLACK,
            line_width: 1.0,
            scale: Vec2::splat(1.0),
        }
    }
}

/// A run of connected points in device coordinates
#[derive(Debug, Clone, Default)]
struct SubPath {
    points: Vec<Pos2>,
    closed: bool,
}

impl SubPath {
    fn segments(&self) -> impl Iterator<Item = (Pos2, Pos2)> + '_ {
        let closing = if self.closed && self.points.len() > 2 {
            self.points.last().copied().zip(self.points.first().copied())
        } else {
            None
        };
        self.points
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain(closing)
    }
}

/// A raster drawing surface with a 2D-context style API.
///
/// Coordinates passed to path and rect operations are in user space and are
/// mapped to device pixels through the current `scale`. A pixel is covered by
/// a shape when its center lies inside the shape.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: RgbaImage,
    state: PaintState,
    saved: Vec<PaintState>,
    path: Vec<SubPath>,
    generation: u64,
}

impl Surface {
    /// Creates a fully transparent surface of `width` x `height` device pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            state: PaintState::default(),
            saved: Vec::new(),
            path: Vec::new(),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Extent of the surface in user-space units under the current transform.
    pub fn logical_size(&self) -> Vec2 {
        vec2(
            self.width() as f32 / self.state.scale.x,
            self.height() as f32 / self.state.scale.y,
        )
    }

    /// The current user-to-device scale factor.
    pub fn device_scale(&self) -> Vec2 {
        self.state.scale
    }

    pub fn stroke_color(&self) -> Color32 {
        self.state.stroke_color
    }

    pub fn line_width(&self) -> f32 {
        self.state.line_width
    }

    /// Changes every time the pixel content changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Reads a device pixel, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let Rgba([r, g, b, a]) = *self.pixels.get_pixel(x, y);
        Some(Color32::from_rgba_unmultiplied(r, g, b, a))
    }

    pub fn set_stroke_color(&mut self, color: Color32) {
        self.state.stroke_color = color;
    }

    /// Non-finite and non-positive widths are ignored.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0 {
            self.state.scale = vec2(self.state.scale.x * x, self.state.scale.y * y);
        }
    }

    pub fn save(&mut self) {
        self.saved.push(self.state);
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    pub fn move_to(&mut self, point: Pos2) {
        let point = self.to_device(point);
        self.path.push(SubPath {
            points: vec![point],
            closed: false,
        });
    }

    /// Without a current point this behaves like `move_to`.
    pub fn line_to(&mut self, point: Pos2) {
        let device = self.to_device(point);
        if let Some(sub) = self.path.last_mut().filter(|sub| !sub.closed) {
            sub.points.push(device);
            return;
        }
        self.move_to(point);
    }

    pub fn close_path(&mut self) {
        if let Some(sub) = self.path.last_mut() {
            sub.closed = true;
        }
    }

    /// Strokes every segment of the current path with the current paint state.
    pub fn stroke(&mut self) {
        let segments: Vec<(Pos2, Pos2)> = self.path.iter().flat_map(|sub| sub.segments()).collect();
        self.stroke_segments(&segments);
    }

    /// Strokes the outline of a rectangle without touching the current path.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let corners = [
            self.to_device(pos2(x, y)),
            self.to_device(pos2(x + width, y)),
            self.to_device(pos2(x + width, y + height)),
            self.to_device(pos2(x, y + height)),
        ];
        let segments: Vec<(Pos2, Pos2)> = (0..4).map(|i| (corners[i], corners[(i + 1) % 4])).collect();
        self.stroke_segments(&segments);
    }

    /// Makes every pixel inside the rectangle fully transparent.
    pub fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let a = self.to_device(pos2(x, y));
        let b = self.to_device(pos2(x + width, y + height));
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));

        let Some((x0, y0, x1, y1)) = self.pixel_bounds(min_x, min_y, max_x, max_y) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                let center = pos2(px as f32 + 0.5, py as f32 + 0.5);
                if center.x >= min_x && center.x < max_x && center.y >= min_y && center.y < max_y {
                    self.pixels.put_pixel(px, py, Rgba([0, 0, 0, 0]));
                }
            }
        }
        self.touch();
    }

    /// Clears the whole buffer regardless of the current transform.
    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        self.touch();
    }

    fn to_device(&self, point: Pos2) -> Pos2 {
        pos2(point.x * self.state.scale.x, point.y * self.state.scale.y)
    }

    fn touch(&mut self) {
        self.generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
    }

    /// Clamps a device-space box to pixel indices, `None` when empty.
    fn pixel_bounds(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<(u32, u32, u32, u32)> {
        let clamp_x = |v: f32| v.clamp(0.0, self.width() as f32) as u32;
        let clamp_y = |v: f32| v.clamp(0.0, self.height() as f32) as u32;
        let (x0, x1) = (clamp_x(min_x.floor()), clamp_x(max_x.ceil()));
        let (y0, y1) = (clamp_y(min_y.floor()), clamp_y(max_y.ceil()));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Rasterizes segments as round-capped capsules into one coverage mask so
    /// overlapping segments blend once per stroke.
    fn stroke_segments(&mut self, segments: &[(Pos2, Pos2)]) {
        if segments.is_empty() {
            return;
        }
        let scale = (self.state.scale.x + self.state.scale.y) / 2.0;
        // at least one device pixel wide
        let half_width = (self.state.line_width * scale / 2.0).max(0.5);

        let (mut min, mut max) = (Pos2::new(f32::INFINITY, f32::INFINITY), Pos2::new(f32::NEG_INFINITY, f32::NEG_INFINITY));
        for (a, b) in segments {
            min = min.min(a.min(*b));
            max = max.max(a.max(*b));
        }
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(
            min.x - half_width,
            min.y - half_width,
            max.x + half_width,
            max.y + half_width,
        ) else {
            return;
        };

        let mask_width = (x1 - x0) as usize;
        let mut mask = vec![false; mask_width * (y1 - y0) as usize];
        for &(a, b) in segments {
            let Some((sx0, sy0, sx1, sy1)) = self.pixel_bounds(
                a.x.min(b.x) - half_width,
                a.y.min(b.y) - half_width,
                a.x.max(b.x) + half_width,
                a.y.max(b.y) + half_width,
            ) else {
                continue;
            };
            for py in sy0..sy1 {
                for px in sx0..sx1 {
                    let center = pos2(px as f32 + 0.5, py as f32 + 0.5);
                    if distance_to_segment(center, a, b) <= half_width {
                        mask[(py - y0) as usize * mask_width + (px - x0) as usize] = true;
                    }
                }
            }
        }

        let source = Rgba(self.state.stroke_color.to_srgba_unmultiplied());
        for (index, covered) in mask.iter().enumerate() {
            if *covered {
                let px = x0 + (index % mask_width) as u32;
                let py = y0 + (index / mask_width) as u32;
                blend_source_over(self.pixels.get_pixel_mut(px, py), source);
            }
        }
        self.touch();
    }
}

fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let length_sq = ab.length_sq();
    if length_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Porter-Duff source-over on straight (unmultiplied) RGBA.
pub(crate) fn blend_source_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let src_alpha = src[3] as f32 / 255.0;
    if src_alpha >= 1.0 {
        *dst = src;
        return;
    }
    if src_alpha <= 0.0 {
        return;
    }
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    for channel in 0..3 {
        let blended = (src[channel] as f32 * src_alpha
            + dst[channel] as f32 * dst_alpha * (1.0 - src_alpha))
            / out_alpha;
        dst[channel] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round() as u8;
}
