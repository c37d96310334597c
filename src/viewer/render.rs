use crate::config::ViewerConfig;
use crate::signal::{SignalSource, SyntheticWave};
use super::layout::LaneLayout;
use super::state::ViewState;
use super::surface::{Palette, PixelPoint, PixelRect, PixelSurface};
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub max_lanes: usize,
    pub grid_spacing_px: f32,
    pub grid_px_per_sec: f32,
    pub sample_stride_px: usize,
    pub lane_margin_px: f32,
    pub display_gain: f64,
    pub gutter_width_px: f32,
    pub trace_line_width: f32,
    pub palette: Palette,
    pub wave: SyntheticWave,
}
impl RenderSettings {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            max_lanes: config.max_lanes.max(1),
            grid_spacing_px: config.grid_spacing_px,
            grid_px_per_sec: config.grid_px_per_sec,
            sample_stride_px: config.sample_stride_px.max(1),
            lane_margin_px: config.lane_margin_px,
            display_gain: config.display_gain,
            gutter_width_px: config.gutter_width_px,
            trace_line_width: 1.5,
            palette: Palette::default(),
            wave: SyntheticWave::default(),
        }
    }
}
impl Default for RenderSettings {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}
/// What the signal source has for one pixel column of one lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LaneSample {
    /// Raw recorded value, not yet scaled for display.
    Recorded(f64),
    /// Synthetic value, already in display units.
    Synthetic(f64),
    /// Window starts before the first recorded sample (negative offset).
    BeforeStart,
    /// Recorded samples ran out.
    Exhausted,
}
/// Pixel column `x` maps to sample `floor(offset * sfreq) + x`.
pub fn lane_sample(
    source: &dyn SignalSource,
    wave: &SyntheticWave,
    lane: usize,
    offset: f64,
    x: usize,
) -> LaneSample {
    let sample_rate_hz = source.sample_rate_hz();
    match source.samples(lane) {
        Some(samples) => {
            let start = (offset * sample_rate_hz).floor() as i64;
            let index = start.saturating_add(x as i64);
            if index < 0 {
                LaneSample::BeforeStart
            } else {
                match samples.get(index as usize) {
                    Some(value) => LaneSample::Recorded(*value),
                    None => LaneSample::Exhausted,
                }
            }
        }
        None => LaneSample::Synthetic(wave.value(lane, offset + x as f64 / sample_rate_hz)),
    }
}
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LaneStats {
    pub points: usize,
    pub synthetic: bool,
}
impl LaneStats {
    pub fn segments(&self) -> usize {
        self.points.saturating_sub(1)
    }
}
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub layout: Option<LaneLayout>,
    pub lanes: Vec<LaneStats>,
}
/// Paints one full frame. Pure with respect to its inputs: the same state,
/// source and size always produce the same calls on `surface`.
pub fn draw_frame(
    surface: &mut dyn PixelSurface,
    size: (f32, f32),
    view: &ViewState,
    source: &dyn SignalSource,
    settings: &RenderSettings,
) -> FrameStats {
    let palette = &settings.palette;
    let labels = source.channel_labels();
    let layout = LaneLayout::new(size, labels.len(), settings.max_lanes, settings.gutter_width_px);
    surface.clear();
    surface.fill_background(palette.background);
    draw_time_grid(surface, &layout, view.offset, settings);
    let limit = layout.clamp_limit(settings.lane_margin_px) as f64;
    let trace_width = layout.trace_width();
    let mut lanes = Vec::with_capacity(layout.lane_count);
    let mut points = Vec::new();
    for lane in 0..layout.lane_count {
        let center_y = layout.center_y(lane);
        let synthetic = source.samples(lane).is_none();
        points.clear();
        let mut drawn = 0usize;
        let mut x = 0usize;
        while (x as f32) < trace_width {
            let signal = match lane_sample(source, &settings.wave, lane, view.offset, x) {
                LaneSample::Recorded(v) => v * view.scale * settings.display_gain,
                LaneSample::Synthetic(v) => v * view.scale,
                LaneSample::BeforeStart => {
                    x += settings.sample_stride_px;
                    continue;
                }
                LaneSample::Exhausted => break,
            };
            if signal.is_finite() {
                let clamped = signal.clamp(-limit, limit);
                points.push(PixelPoint::new(
                    layout.trace_left() + x as f32,
                    center_y + clamped as f32,
                ));
            } else {
                // Gap in the data: end the current run instead of bridging it.
                drawn += stroke_run(surface, &points, settings);
                points.clear();
            }
            x += settings.sample_stride_px;
        }
        drawn += stroke_run(surface, &points, settings);
        lanes.push(LaneStats {
            points: drawn,
            synthetic,
        });
        let bottom = layout.lane_bottom(lane);
        surface.stroke_line(
            &[
                PixelPoint::new(layout.trace_left(), bottom),
                PixelPoint::new(layout.width, bottom),
            ],
            palette.separator,
            1.0,
        );
    }
    draw_label_gutter(surface, &layout, labels, palette);
    surface.draw_text(
        PixelPoint::new(layout.width - 52.0, layout.height - 12.0),
        &format!("Time: {:.2}s", view.offset),
        palette.readout,
    );
    FrameStats {
        layout: Some(layout),
        lanes,
    }
}
/// Strokes one polyline run; returns how many points were drawn.
fn stroke_run(surface: &mut dyn PixelSurface, points: &[PixelPoint], settings: &RenderSettings) -> usize {
    if points.len() < 2 {
        return 0;
    }
    surface.stroke_line(points, settings.palette.trace, settings.trace_line_width);
    points.len()
}
fn draw_time_grid(
    surface: &mut dyn PixelSurface,
    layout: &LaneLayout,
    offset: f64,
    settings: &RenderSettings,
) {
    let spacing = settings.grid_spacing_px as f64;
    if spacing <= 0.0 || !offset.is_finite() {
        return;
    }
    // Scroll rate is independent of the trace's sample rate.
    let shift = (offset * settings.grid_px_per_sec as f64).rem_euclid(spacing);
    let mut x = if shift == 0.0 { 0.0 } else { spacing - shift };
    let width = layout.trace_width() as f64;
    while x < width {
        let px = layout.trace_left() + x as f32;
        surface.stroke_line(
            &[PixelPoint::new(px, 0.0), PixelPoint::new(px, layout.height)],
            settings.palette.grid,
            1.0,
        );
        x += spacing;
    }
}
fn draw_label_gutter(
    surface: &mut dyn PixelSurface,
    layout: &LaneLayout,
    labels: &[String],
    palette: &Palette,
) {
    if layout.gutter_width <= 0.0 {
        return;
    }
    surface.fill_rect(
        PixelRect {
            x: 0.0,
            y: 0.0,
            width: layout.gutter_width,
            height: layout.height,
        },
        palette.gutter,
    );
    surface.stroke_line(
        &[
            PixelPoint::new(layout.gutter_width, 0.0),
            PixelPoint::new(layout.gutter_width, layout.height),
        ],
        palette.separator,
        1.0,
    );
    for (lane, label) in labels.iter().take(layout.lane_count).enumerate() {
        surface.draw_text(
            PixelPoint::new(layout.gutter_width / 2.0, layout.center_y(lane)),
            label,
            palette.label,
        );
    }
}
/// Up to `count` consecutive values of one lane starting at `offset`, in the
/// source's own units (recorded) or display units (synthetic).
pub fn window_samples(
    source: &dyn SignalSource,
    wave: &SyntheticWave,
    lane: usize,
    offset: f64,
    count: usize,
) -> Vec<f64> {
    let mut out = Vec::with_capacity(count);
    for x in 0..count {
        match lane_sample(source, wave, lane, offset, x) {
            LaneSample::Recorded(v) | LaneSample::Synthetic(v) => out.push(v),
            LaneSample::BeforeStart => continue,
            LaneSample::Exhausted => break,
        }
    }
    out
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{SampleMatrix, SignalPayload, SyntheticSource};
    use crate::viewer::surface::{DrawOp, RecordingSurface};
    fn matrix(rows: Vec<Vec<f64>>, sfreq: f64) -> SampleMatrix {
        let channels = (0..rows.len()).map(|i| format!("C{i}")).collect();
        SampleMatrix::from_payload(SignalPayload {
            channels,
            data: rows,
            sfreq,
        })
        .unwrap()
    }
    fn render(source: &dyn SignalSource, view: &ViewState) -> (RecordingSurface, FrameStats) {
        let mut surface = RecordingSurface::new(848.0, 400.0);
        let stats = draw_frame(&mut surface, (848.0, 400.0), view, source, &RenderSettings::default());
        (surface, stats)
    }
    #[test]
    fn short_channel_renders_empty_lane_without_failing() {
        let source = matrix(vec![vec![1e-5; 10], vec![1e-5; 10_000]], 100.0);
        let view = ViewState {
            offset: 0.5, // start sample 50
            ..ViewState::default()
        };
        let (surface, stats) = render(&source, &view);
        assert_eq!(stats.lanes.len(), 2);
        assert_eq!(stats.lanes[0].segments(), 0);
        assert_eq!(stats.lanes[1].points, 400);
        let traces = surface.lines_with_color(Palette::default().trace);
        assert_eq!(traces.len(), 1);
    }
    #[test]
    fn trace_stops_when_samples_run_out() {
        let source = matrix(vec![vec![0.0; 120]], 100.0);
        let view = ViewState {
            offset: 1.0, // 20 samples left
            ..ViewState::default()
        };
        let (_, stats) = render(&source, &view);
        assert_eq!(stats.lanes[0].points, 10);
    }
    #[test]
    fn negative_offset_starts_trace_late() {
        let source = matrix(vec![vec![0.0; 1000]], 100.0);
        let view = ViewState {
            offset: -1.0,
            ..ViewState::default()
        };
        let (surface, stats) = render(&source, &view);
        assert_eq!(stats.lanes[0].points, 350);
        let first = surface.lines_with_color(Palette::default().trace)[0][0];
        assert_eq!(first.x, 48.0 + 100.0);
    }
    #[test]
    fn signal_is_clamped_inside_its_lane() {
        let source = matrix(vec![vec![1.0; 1000], vec![-1.0; 1000]], 100.0);
        let (surface, stats) = render(&source, &ViewState::default());
        let layout = stats.layout.unwrap();
        let limit = layout.clamp_limit(2.0);
        for (lane, line) in surface
            .lines_with_color(Palette::default().trace)
            .iter()
            .enumerate()
        {
            let center = layout.center_y(lane);
            assert!(line.iter().all(|p| (p.y - center).abs() <= limit + 1e-3));
            assert!(line.iter().all(|p| p.y > lane as f32 * layout.lane_height));
        }
    }
    #[test]
    fn synthetic_render_is_deterministic() {
        let source = SyntheticSource::new(16, 100.0);
        let view = ViewState {
            offset: 3.7,
            scale: 1.4,
            ..ViewState::default()
        };
        let (first, stats) = render(&source, &view);
        let (second, _) = render(&source, &view);
        assert_eq!(first.ops(), second.ops());
        assert_eq!(stats.lanes.len(), 15);
        assert!(stats.lanes.iter().all(|l| l.synthetic && l.points == 400));
    }
    #[test]
    fn labels_and_readout_are_painted() {
        let source = SyntheticSource::new(3, 100.0);
        let view = ViewState {
            offset: 1.234,
            ..ViewState::default()
        };
        let (surface, _) = render(&source, &view);
        let texts: Vec<&str> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(_, text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["Fp1", "Fp2", "F7", "Time: 1.23s"]);
        assert_eq!(surface.ops()[0], DrawOp::Clear);
    }
    #[test]
    fn grid_scrolls_with_offset() {
        let source = SyntheticSource::new(1, 100.0);
        let grid_xs = |offset: f64| -> Vec<f32> {
            let (surface, _) = render(
                &source,
                &ViewState {
                    offset,
                    ..ViewState::default()
                },
            );
            surface
                .lines_with_color(Palette::default().grid)
                .iter()
                .map(|l| l[0].x)
                .collect()
        };
        assert_eq!(grid_xs(0.0), [48.0, 148.0, 248.0, 348.0, 448.0, 548.0, 648.0, 748.0]);
        assert_eq!(grid_xs(0.25)[0], 48.0 + 75.0);
    }
    #[test]
    fn grid_speed_does_not_follow_sample_rate() {
        let fast = matrix(vec![vec![0.0; 4096]], 256.0);
        let (surface, _) = render(
            &fast,
            &ViewState {
                offset: 0.25,
                ..ViewState::default()
            },
        );
        let first = surface.lines_with_color(Palette::default().grid)[0][0].x;
        assert_eq!(first, 48.0 + 75.0);
    }
    #[test]
    fn non_finite_samples_split_the_trace() {
        let mut row = vec![0.0; 1000];
        row[100] = f64::NAN;
        row[400] = f64::INFINITY;
        let (surface, stats) = render(&matrix(vec![row], 100.0), &ViewState::default());
        let traces = surface.lines_with_color(Palette::default().trace);
        assert_eq!(traces.len(), 3);
        assert_eq!(traces[0].last().unwrap().x, 48.0 + 98.0);
        assert_eq!(traces[1][0].x, 48.0 + 102.0);
        assert_eq!(traces[1].last().unwrap().x, 48.0 + 398.0);
        assert_eq!(traces[2][0].x, 48.0 + 402.0);
        assert_eq!(stats.lanes[0].points, 398);
    }
    #[test]
    fn window_samples_reads_recorded_and_synthetic() {
        let source = matrix(vec![(0..10).map(|i| i as f64).collect()], 10.0);
        let wave = SyntheticWave::default();
        assert_eq!(window_samples(&source, &wave, 0, 0.5, 100), [5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(window_samples(&source, &wave, 0, -0.2, 4), [0.0, 1.0]);
        let synthetic = SyntheticSource::new(4, 100.0);
        let values = window_samples(&synthetic, &wave, 2, 0.0, 64);
        assert_eq!(values.len(), 64);
        assert_eq!(values[3], wave.value(2, 0.03));
    }
}
