#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}
impl PixelPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}
/// Colours used by the renderer.
#[derive(Clone, Debug)]
pub struct Palette {
    pub background: Rgb,
    pub grid: Rgb,
    pub trace: Rgb,
    pub separator: Rgb,
    pub gutter: Rgb,
    pub label: Rgb,
    pub readout: Rgb,
}
impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb(2, 8, 23),
            grid: Rgb(30, 41, 59),
            trace: Rgb(20, 184, 166),
            separator: Rgb(51, 65, 85),
            gutter: Rgb(15, 23, 42),
            label: Rgb(148, 163, 184),
            readout: Rgb(20, 184, 166),
        }
    }
}
/// Minimal immediate-mode drawing target. Coordinates are pixels from the
/// top-left corner of the surface.
pub trait PixelSurface {
    /// Current pixel size. Zero or non-finite means "not measured yet".
    fn measure(&self) -> (f32, f32);
    fn clear(&mut self);
    fn fill_background(&mut self, color: Rgb);
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb);
    fn stroke_line(&mut self, points: &[PixelPoint], color: Rgb, width: f32);
    /// Text centred on `at`.
    fn draw_text(&mut self, at: PixelPoint, text: &str, color: Rgb);
}
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Background(Rgb),
    Rect(PixelRect, Rgb),
    Line {
        points: Vec<PixelPoint>,
        color: Rgb,
        width: f32,
    },
    Text(PixelPoint, String, Rgb),
}
/// Surface that keeps a log of every call. Useful for tests and for hosts
/// that want to replay a frame onto their own backend.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: (f32, f32),
    ops: Vec<DrawOp>,
}
impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: (width, height),
            ops: Vec::new(),
        }
    }
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = (width, height);
    }
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
    pub fn lines_with_color(&self, color: Rgb) -> Vec<&[PixelPoint]> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line {
                    points, color: c, ..
                } if *c == color => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }
}
impl PixelSurface for RecordingSurface {
    fn measure(&self) -> (f32, f32) {
        self.size
    }
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }
    fn fill_background(&mut self, color: Rgb) {
        self.ops.push(DrawOp::Background(color));
    }
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        self.ops.push(DrawOp::Rect(rect, color));
    }
    fn stroke_line(&mut self, points: &[PixelPoint], color: Rgb, width: f32) {
        self.ops.push(DrawOp::Line {
            points: points.to_vec(),
            color,
            width,
        });
    }
    fn draw_text(&mut self, at: PixelPoint, text: &str, color: Rgb) {
        self.ops.push(DrawOp::Text(at, text.to_owned(), color));
    }
}
