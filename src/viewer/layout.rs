/// Replaces an unmeasured (zero, negative or non-finite) dimension with the
/// default so the first frames still have something to draw on.
pub fn effective_size(measured: (f32, f32), default: (f32, f32)) -> (f32, f32) {
    let pick = |value: f32, fallback: f32| {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            fallback
        }
    };
    (pick(measured.0, default.0), pick(measured.1, default.1))
}
/// Geometry of one frame: a label gutter on the left and `lane_count` equal
/// horizontal lanes to its right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneLayout {
    pub width: f32,
    pub height: f32,
    pub gutter_width: f32,
    pub lane_count: usize,
    pub lane_height: f32,
}
impl LaneLayout {
    pub fn new(size: (f32, f32), channel_count: usize, max_lanes: usize, gutter_width: f32) -> Self {
        let (width, height) = size;
        let lane_count = channel_count.min(max_lanes);
        let lane_height = if lane_count == 0 {
            0.0
        } else {
            height / lane_count as f32
        };
        Self {
            width,
            height,
            gutter_width: gutter_width.clamp(0.0, width.max(0.0)),
            lane_count,
            lane_height,
        }
    }
    pub fn trace_left(&self) -> f32 {
        self.gutter_width
    }
    pub fn trace_width(&self) -> f32 {
        (self.width - self.gutter_width).max(0.0)
    }
    pub fn center_y(&self, lane: usize) -> f32 {
        lane as f32 * self.lane_height + self.lane_height / 2.0
    }
    pub fn lane_bottom(&self, lane: usize) -> f32 {
        (lane + 1) as f32 * self.lane_height
    }
    /// Largest excursion from the lane centre that stays inside the lane.
    pub fn clamp_limit(&self, margin: f32) -> f32 {
        (self.lane_height / 2.0 - margin).max(0.0)
    }
}
