// src/gui.rs
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};
use egui_plot::{Bar, BarChart, Plot};
use eeg_viewer::signal::{SignalFetcher, BANDS};
use eeg_viewer::viewer::{
    quantize_speed, FrameScheduler, PixelPoint, PixelRect, PixelSurface, Rgb, SignalViewer,
};
use eeg_viewer::{ViewerCommand, ViewerConfig};
fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}
/// egui 按需重绘：start 就是 request_repaint
pub struct EguiScheduler {
    ctx: egui::Context,
    pending: bool,
}
impl EguiScheduler {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            pending: false,
        }
    }
}
impl FrameScheduler for EguiScheduler {
    fn start(&mut self) {
        self.pending = true;
        self.ctx.request_repaint();
    }
    fn stop(&mut self) {
        self.pending = false;
    }
    fn is_scheduled(&self) -> bool {
        self.pending
    }
}
/// 把 viewer 的像素坐标映射到 painter 分配到的矩形
struct EguiSurface<'a> {
    painter: &'a egui::Painter,
    rect: Rect,
}
impl EguiSurface<'_> {
    fn pos(&self, p: &PixelPoint) -> Pos2 {
        Pos2::new(self.rect.min.x + p.x, self.rect.min.y + p.y)
    }
}
impl PixelSurface for EguiSurface<'_> {
    fn measure(&self) -> (f32, f32) {
        (self.rect.width(), self.rect.height())
    }
    fn clear(&mut self) {
        self.painter.rect_filled(self.rect, 0.0, Color32::BLACK);
    }
    fn fill_background(&mut self, color: Rgb) {
        self.painter.rect_filled(self.rect, 0.0, color32(color));
    }
    fn fill_rect(&mut self, rect: PixelRect, color: Rgb) {
        let min = self.pos(&PixelPoint::new(rect.x, rect.y));
        let max = self.pos(&PixelPoint::new(rect.x + rect.width, rect.y + rect.height));
        self.painter
            .rect_filled(Rect::from_min_max(min, max), 0.0, color32(color));
    }
    fn stroke_line(&mut self, points: &[PixelPoint], color: Rgb, width: f32) {
        let points: Vec<Pos2> = points.iter().map(|p| self.pos(p)).collect();
        self.painter
            .add(Shape::line(points, Stroke::new(width, color32(color))));
    }
    fn draw_text(&mut self, at: PixelPoint, text: &str, color: Rgb) {
        self.painter.text(
            self.pos(&at),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(11.0),
            color32(color),
        );
    }
}
/// 空格 = 播放/暂停；正在输入 record id 时不抢空格键
fn shortcut_command(space_pressed: bool, typing: bool) -> Option<ViewerCommand> {
    (space_pressed && !typing).then_some(ViewerCommand::TogglePlay)
}
pub struct EegViewerApp {
    viewer: SignalViewer<EguiScheduler>,
    record_input: String,
    focus_lane: usize,
    snapshot_dir: PathBuf,
    status: Option<String>,
}
impl EegViewerApp {
    pub fn new(
        ctx: &egui::Context,
        config: ViewerConfig,
        fetcher: Option<Arc<dyn SignalFetcher>>,
        record_id: Option<String>,
    ) -> Self {
        let record_input = record_id.clone().unwrap_or_default();
        let scheduler = EguiScheduler::new(ctx.clone());
        Self {
            viewer: SignalViewer::mount(config, scheduler, fetcher, record_id),
            record_input,
            focus_lane: 0,
            snapshot_dir: PathBuf::from("."),
            status: None,
        }
    }
    fn save_snapshot(&mut self, size: (f32, f32)) {
        let (width, height) = (size.0.round() as u32, size.1.round() as u32);
        let path = self
            .snapshot_dir
            .join(format!("eeg-snapshot-{:.2}s.png", self.viewer.state().offset));
        let result = self
            .viewer
            .snapshot_png(width, height)
            .map_err(anyhow::Error::from)
            .and_then(|png| std::fs::write(&path, png).map_err(anyhow::Error::from));
        self.status = Some(match result {
            Ok(()) => {
                log::info!("snapshot written to {}", path.display());
                format!("Saved {}", path.display())
            }
            Err(err) => {
                log::error!("snapshot failed: {err:#}");
                format!("Snapshot failed: {err}")
            }
        });
    }
    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let config = self.viewer.config().clone();
        let state = *self.viewer.state();
        ui.horizontal(|ui| {
            let play_txt = if state.is_playing { "⏸ Pause" } else { "▶ Play" };
            if ui.button(play_txt).clicked() {
                self.viewer.apply(ViewerCommand::TogglePlay);
            }
            ui.separator();
            let mut speed = state.speed;
            let slider = egui::Slider::new(&mut speed, config.min_speed..=config.max_speed)
                .step_by(config.speed_step)
                .suffix("x")
                .text("Speed");
            if ui.add(slider).changed() {
                let speed =
                    quantize_speed(speed, config.min_speed, config.max_speed, config.speed_step);
                self.viewer.apply(ViewerCommand::SetSpeed(speed));
            }
            ui.separator();
            if ui.button("−").clicked() {
                self.viewer.apply(ViewerCommand::ZoomOut);
            }
            ui.monospace(format!("{:>4.0}%", state.scale * 100.0));
            if ui.button("+").clicked() {
                self.viewer.apply(ViewerCommand::ZoomIn);
            }
            ui.separator();
            ui.label("Record");
            ui.add(egui::TextEdit::singleline(&mut self.record_input).desired_width(120.0));
            if ui.button("Load").clicked() {
                let id = self.record_input.trim();
                let id = (!id.is_empty()).then(|| id.to_owned());
                self.focus_lane = 0;
                self.viewer.apply(ViewerCommand::LoadRecord(id));
            }
            if self.viewer.is_fetching() {
                ui.spinner();
            } else if self.viewer.source().is_recorded() {
                ui.label(egui::RichText::new("LIVE DATA").color(Color32::from_rgb(20, 184, 166)));
            } else {
                ui.label(egui::RichText::new("SYNTHETIC").color(Color32::YELLOW));
            }
            ui.separator();
            if ui.button("💾 Save PNG").clicked() {
                self.save_snapshot(self.viewer.surface_size());
            }
        });
        if let Some(status) = &self.status {
            ui.label(egui::RichText::new(status).small());
        }
    }
    fn band_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Band power");
        let labels = self.viewer.source().channel_labels().to_vec();
        let lanes = labels.len().min(self.viewer.config().max_lanes);
        if lanes == 0 {
            return;
        }
        self.focus_lane = self.focus_lane.min(lanes - 1);
        egui::ComboBox::from_label("Lane")
            .selected_text(labels[self.focus_lane].as_str())
            .show_ui(ui, |ui| {
                for (lane, label) in labels.iter().take(lanes).enumerate() {
                    ui.selectable_value(&mut self.focus_lane, lane, label.as_str());
                }
            });
        let Some(powers) = self.viewer.band_powers(self.focus_lane) else {
            return;
        };
        // 相对功率，方便不同通道之间比较
        let values = powers.as_array();
        let total: f64 = values.iter().sum();
        let bars: Vec<Bar> = BANDS
            .iter()
            .zip(values.iter())
            .enumerate()
            .map(|(i, ((name, _, _), value))| {
                let relative = if total > 0.0 { value / total } else { 0.0 };
                Bar::new(i as f64, relative)
                    .name(*name)
                    .fill(Color32::from_rgb(20, 184, 166))
            })
            .collect();
        Plot::new("band_power")
            .height(180.0)
            .include_y(0.0)
            .include_y(1.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| plot_ui.bar_chart(BarChart::new(bars)));
        if let Some(dominant) = powers.dominant() {
            ui.label(format!("Dominant: {dominant}"));
        }
    }
}
impl eframe::App for EegViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. 键盘快捷键
        let space = ctx.input(|i| i.key_pressed(egui::Key::Space));
        if let Some(command) = shortcut_command(space, ctx.wants_keyboard_input()) {
            self.viewer.apply(command);
        }
        ctx.set_visuals(egui::Visuals::dark());
        // 2. UI
        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.toolbar(ui));
        egui::SidePanel::right("bands")
            .min_width(220.0)
            .show(ctx, |ui| self.band_panel(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
                let mut surface = EguiSurface {
                    painter: &painter,
                    rect: response.rect,
                };
                let now = ctx.input(|i| i.time);
                self.viewer.frame(now, &mut surface);
            });
        // 3. 后台请求还没回来时定期轮询
        if self.viewer.is_fetching() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn space_is_ignored_while_typing() {
        assert_eq!(shortcut_command(true, false), Some(ViewerCommand::TogglePlay));
        assert_eq!(shortcut_command(true, true), None);
        assert_eq!(shortcut_command(false, false), None);
    }
}
