use crate::scribble::model::{Color, CompositeOp, Point, StrokeStyle};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Largest device side the surface allocates unless a presenter lowers it.
pub const MAX_SURFACE_SIDE: u32 = 16384;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRect {
    pub fn from_points(a: (i32, i32), b: (i32, i32), pad: i32) -> Self {
        let min_x = a.0.min(b.0) - pad;
        let max_x = a.0.max(b.0) + pad;
        let min_y = a.1.min(b.1) - pad;
        let max_y = a.1.max(b.1) + pad;
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1).max(1),
            height: (max_y - min_y + 1).max(1),
        }
    }

    pub fn union(self, other: DirtyRect) -> DirtyRect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<DirtyRect> {
        let max_w = width as i32;
        let max_h = height as i32;
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = (self.x + self.width).clamp(0, max_w);
        let y1 = (self.y + self.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Pixels changed since a presenter last asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    None,
    Region(DirtyRect),
    Full,
}

impl Damage {
    fn include(self, rect: DirtyRect) -> Damage {
        match self {
            Damage::None => Damage::Region(rect),
            Damage::Region(prev) => Damage::Region(prev.union(rect)),
            Damage::Full => Damage::Full,
        }
    }
}

/// Height measurements of the element the surface covers.
///
/// Scrollable pages report different heights depending on which property is
/// read, so the surface takes the largest one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerMetrics {
    pub width: f32,
    pub scroll_height: f32,
    pub offset_height: f32,
    pub client_height: f32,
    pub viewport_height: f32,
}

impl ContainerMetrics {
    pub fn max_height(&self) -> f32 {
        [
            self.scroll_height,
            self.offset_height,
            self.client_height,
            self.viewport_height,
        ]
        .into_iter()
        .fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    image: RgbaImage,
    pixel_ratio: f32,
}

#[derive(Debug, Clone, Copy)]
struct ActivePath {
    style: StrokeStyle,
    last: Point,
}

/// Device-resolution RGBA raster the scribble overlay paints into.
///
/// Coordinates passed in are CSS pixels relative to the surface origin and
/// are multiplied by the pixel ratio before touching the buffer.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    pixel_ratio: f32,
    css_size: (f32, f32),
    snapshot: Option<Snapshot>,
    path: Option<ActivePath>,
    damage: Damage,
    max_side: u32,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self {
            pixels: RgbaImage::new(0, 0),
            pixel_ratio: 1.0,
            css_size: (0.0, 0.0),
            snapshot: None,
            path: None,
            damage: Damage::Full,
            max_side: MAX_SURFACE_SIDE,
        }
    }
}

impl RasterSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(css_width: f32, css_height: f32, pixel_ratio: f32) -> Self {
        let mut surface = Self::default();
        surface.resize_to(css_width, css_height, pixel_ratio);
        surface
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn device_size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn css_size(&self) -> (f32, f32) {
        self.css_size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn max_side(&self) -> u32 {
        self.max_side
    }

    /// Caps both device dimensions, e.g. to the renderer's texture limit.
    /// Applied by the next `fit`/`resize_to`.
    pub fn set_max_side(&mut self, side: u32) {
        self.max_side = side.clamp(1, MAX_SURFACE_SIDE);
    }

    /// Returns and resets the damage accumulated since the previous call.
    pub fn take_damage(&mut self) -> Damage {
        std::mem::replace(&mut self.damage, Damage::None)
    }

    /// Copy of the pixels under `rect`, which must lie inside the surface.
    pub fn region_pixels(&self, rect: DirtyRect) -> RgbaImage {
        imageops::crop_imm(
            &self.pixels,
            rect.x.max(0) as u32,
            rect.y.max(0) as u32,
            rect.width.max(0) as u32,
            rect.height.max(0) as u32,
        )
        .to_image()
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    pub fn painted_pixel_count(&self) -> usize {
        self.pixels.pixels().filter(|px| px.0[3] != 0).count()
    }

    /// Fits the surface to `metrics` at `pixel_ratio`, keeping drawn content.
    ///
    /// Returns `false` when the device size and ratio are unchanged.
    pub fn fit(&mut self, metrics: ContainerMetrics, pixel_ratio: f32) -> bool {
        self.resize_to(metrics.width, metrics.max_height(), pixel_ratio)
    }

    pub fn resize_to(&mut self, css_width: f32, css_height: f32, pixel_ratio: f32) -> bool {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let device = device_size(css_width, css_height, pixel_ratio, self.max_side);
        let covered_limit = self.max_side as f32 / pixel_ratio;
        let css_size = (
            css_width.max(0.0).min(covered_limit),
            css_height.max(0.0).min(covered_limit),
        );
        if device == self.pixels.dimensions() && pixel_ratio == self.pixel_ratio {
            self.css_size = css_size;
            return false;
        }
        if css_size != (css_width.max(0.0), css_height.max(0.0)) {
            tracing::debug!(
                css_width,
                css_height,
                max_side = self.max_side,
                "scribble surface clamped; content past the limit is not drawable"
            );
        }

        let scratch = if self.is_empty() {
            None
        } else {
            Some(Snapshot {
                image: std::mem::replace(&mut self.pixels, RgbaImage::new(0, 0)),
                pixel_ratio: self.pixel_ratio,
            })
        };

        self.pixels = RgbaImage::from_pixel(device.0, device.1, TRANSPARENT);
        self.pixel_ratio = pixel_ratio;
        self.css_size = css_size;
        self.damage = Damage::Full;

        match scratch.or_else(|| self.snapshot.clone()) {
            Some(source) => self.redraw_from(&source),
            None => tracing::trace!("resize without scratch or snapshot; surface starts blank"),
        }
        tracing::debug!(
            width = device.0,
            height = device.1,
            pixel_ratio,
            "scribble surface resized"
        );
        true
    }

    fn redraw_from(&mut self, source: &Snapshot) {
        if self.is_empty() || source.image.width() == 0 || source.image.height() == 0 {
            return;
        }
        let scale = self.pixel_ratio / source.pixel_ratio;
        if (scale - 1.0).abs() <= f32::EPSILON {
            imageops::replace(&mut self.pixels, &source.image, 0, 0);
            return;
        }
        let width = ((source.image.width() as f32) * scale).round().max(1.0) as u32;
        let height = ((source.image.height() as f32) * scale).round().max(1.0) as u32;
        let scaled = imageops::resize(&source.image, width, height, FilterType::Triangle);
        imageops::replace(&mut self.pixels, &scaled, 0, 0);
    }

    pub fn take_snapshot(&mut self) {
        if self.is_empty() {
            return;
        }
        self.snapshot = Some(Snapshot {
            image: self.pixels.clone(),
            pixel_ratio: self.pixel_ratio,
        });
    }

    /// Updates only `region` of the snapshot when one of matching size
    /// exists; otherwise takes a full one.
    pub fn snapshot_region(&mut self, region: DirtyRect) {
        let (width, height) = self.pixels.dimensions();
        let Some(region) = region.clamp(width, height) else {
            return;
        };
        let pixel_ratio = self.pixel_ratio;
        match self.snapshot.as_mut() {
            Some(snapshot)
                if snapshot.image.dimensions() == (width, height)
                    && snapshot.pixel_ratio == pixel_ratio =>
            {
                let patch = imageops::crop_imm(
                    &self.pixels,
                    region.x as u32,
                    region.y as u32,
                    region.width as u32,
                    region.height as u32,
                )
                .to_image();
                imageops::replace(&mut snapshot.image, &patch, region.x as i64, region.y as i64);
            }
            _ => self.take_snapshot(),
        }
    }

    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = TRANSPARENT;
        }
        self.snapshot = None;
        self.path = None;
        self.damage = Damage::Full;
    }

    pub fn begin_path(&mut self, at: Point, style: StrokeStyle) {
        self.path = Some(ActivePath { style, last: at });
    }

    /// Extends the current path and paints the new segment right away.
    pub fn line_to(&mut self, to: Point) -> Option<DirtyRect> {
        let path = self.path.as_mut()?;
        let from = path.last;
        path.last = to;
        let style = path.style;
        if self.is_empty() {
            return None;
        }
        let dirty = self.paint_segment(from, to, style);
        if let Some(rect) = dirty {
            self.damage = self.damage.include(rect);
        }
        dirty
    }

    pub fn end_path(&mut self) {
        self.path = None;
    }

    pub fn current_style(&self) -> Option<StrokeStyle> {
        self.path.map(|path| path.style)
    }

    fn paint_segment(&mut self, from: Point, to: Point, style: StrokeStyle) -> Option<DirtyRect> {
        let ratio = self.pixel_ratio;
        let start = ((from.x * ratio).round() as i32, (from.y * ratio).round() as i32);
        let end = ((to.x * ratio).round() as i32, (to.y * ratio).round() as i32);
        let radius = (style.width * ratio / 2.0).max(0.5);
        let pad = radius.ceil() as i32 + 1;
        let (width, height) = self.pixels.dimensions();
        let clip = DirtyRect::from_points(start, end, pad).clamp(width, height)?;

        let radius_sq = radius * radius;
        for y in clip.y..(clip.y + clip.height) {
            for x in clip.x..(clip.x + clip.width) {
                if point_segment_distance_sq((x, y), start, end) <= radius_sq {
                    let px = self.pixels.get_pixel_mut(x as u32, y as u32);
                    composite_pixel(px, style.color, style.op);
                }
            }
        }
        Some(clip)
    }
}

fn device_size(css_width: f32, css_height: f32, pixel_ratio: f32, max_side: u32) -> (u32, u32) {
    let scale = |v: f32| (v.max(0.0) * pixel_ratio).round().min(max_side as f32) as u32;
    (scale(css_width), scale(css_height))
}

fn composite_pixel(px: &mut Rgba<u8>, color: Color, op: CompositeOp) {
    let src_a = color.a as f32 / 255.0;
    match op {
        CompositeOp::DestinationOut => {
            let remaining = px.0[3] as f32 * (1.0 - src_a);
            px.0[3] = remaining.round().clamp(0.0, 255.0) as u8;
            if px.0[3] == 0 {
                *px = TRANSPARENT;
            }
        }
        CompositeOp::SourceOver => {
            if color.a == 0 {
                return;
            }
            let dst = px.0;
            let dst_a = dst[3] as f32 / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);
            if out_a <= 0.0 {
                return;
            }
            let blend = |src: u8, dst: u8| {
                let src_f = src as f32 / 255.0;
                let dst_f = dst as f32 / 255.0;
                ((src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a * 255.0)
                    .round()
                    .clamp(0.0, 255.0) as u8
            };
            *px = Rgba([
                blend(color.r, dst[0]),
                blend(color.g, dst[1]),
                blend(color.b, dst[2]),
                (out_a * 255.0).round() as u8,
            ]);
        }
    }
}

fn point_segment_distance_sq(point: (i32, i32), start: (i32, i32), end: (i32, i32)) -> f32 {
    let px = point.0 as f32;
    let py = point.1 as f32;
    let x0 = start.0 as f32;
    let y0 = start.1 as f32;
    let vx = end.0 as f32 - x0;
    let vy = end.1 as f32 - y0;
    let wx = px - x0;
    let wy = py - y0;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return wx * wx + wy * wy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let dx = px - (x0 + vx * t);
    let dy = py - (y0 + vy * t);
    dx * dx + dy * dy
}
