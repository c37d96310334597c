use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb as ImageRgb};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use crate::signal::{SignalSource, ViewerError};
use super::render::{draw_frame, RenderSettings};
use super::state::ViewState;
use super::surface::{PixelPoint, PixelRect, PixelSurface, Rgb};
const LABEL_FONT: (&str, f64) = ("sans-serif", 11.0);
/// Largest snapshot edge, in pixels.
pub const MAX_SNAPSHOT_SIDE: u32 = 16_384;
fn color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}
fn to_px(p: &PixelPoint) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}
/// `PixelSurface` over an in-memory RGB bitmap.
pub struct PngSurface<'a> {
    area: DrawingArea<BitMapBackend<'a>, Shift>,
    size: (u32, u32),
    error: Option<ViewerError>,
}
impl<'a> PngSurface<'a> {
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32) -> Self {
        let area = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        Self {
            area,
            size: (width, height),
            error: None,
        }
    }
    fn keep_first_error<E>(&mut self, result: Result<(), DrawingAreaErrorKind<E>>)
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        if let Err(err) = result {
            if self.error.is_none() {
                self.error = Some(err.into());
            }
        }
    }
    /// Flushes the bitmap and reports the first drawing error, if any.
    pub fn finish(self) -> Result<(), ViewerError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.area.present()?;
        Ok(())
    }
}
impl PixelSurface for PngSurface<'_> {
    fn measure(&self) -> (f32, f32) {
        (self.size.0 as f32, self.size.1 as f32)
    }
    fn clear(&mut self) {
        let result = self.area.fill(&BLACK);
        self.keep_first_error(result);
    }
    fn fill_background(&mut self, c: Rgb) {
        let result = self.area.fill(&color(c));
        self.keep_first_error(result);
    }
    fn fill_rect(&mut self, rect: PixelRect, c: Rgb) {
        let corners = [
            to_px(&PixelPoint::new(rect.x, rect.y)),
            to_px(&PixelPoint::new(rect.x + rect.width, rect.y + rect.height)),
        ];
        let result = self.area.draw(&Rectangle::new(corners, color(c).filled()));
        self.keep_first_error(result);
    }
    fn stroke_line(&mut self, points: &[PixelPoint], c: Rgb, width: f32) {
        let path: Vec<(i32, i32)> = points.iter().map(to_px).collect();
        let style = color(c).stroke_width(width.round().max(1.0) as u32);
        let result = self.area.draw(&PathElement::new(path, style));
        self.keep_first_error(result);
    }
    fn draw_text(&mut self, at: PixelPoint, text: &str, c: Rgb) {
        let style = LABEL_FONT
            .into_font()
            .color(&color(c))
            .pos(Pos::new(HPos::Center, VPos::Center));
        // Labels are cosmetic; a host without fonts still gets the traces.
        if let Err(err) = self.area.draw(&Text::new(text.to_owned(), to_px(&at), style)) {
            log::debug!("snapshot label '{text}' skipped: {err:?}");
        }
    }
}
/// Renders the current view (without advancing playback) into PNG bytes.
pub fn render_snapshot_png(
    view: &ViewState,
    source: &dyn SignalSource,
    settings: &RenderSettings,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, ViewerError> {
    if width == 0 || height == 0 {
        return Err(ViewerError::Plot(format!(
            "snapshot size {width}x{height} has no pixels"
        )));
    }
    if width > MAX_SNAPSHOT_SIDE || height > MAX_SNAPSHOT_SIDE {
        return Err(ViewerError::Plot(format!(
            "snapshot size {width}x{height} exceeds {MAX_SNAPSHOT_SIDE}px per side"
        )));
    }
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(|| ViewerError::Plot(format!("snapshot size {width}x{height} overflows")))?;
    let mut buffer = vec![0u8; len];
    {
        let mut surface = PngSurface::new(&mut buffer, width, height);
        draw_frame(
            &mut surface,
            (width as f32, height as f32),
            view,
            source,
            settings,
        );
        surface.finish()?;
    }
    encode_png(&buffer, width, height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ViewerError> {
    let image = ImageBuffer::<ImageRgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| ViewerError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
