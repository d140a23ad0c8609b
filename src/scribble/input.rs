use crate::scribble::model::{Color, Point, StrokeStyle, Tool, STROKE_COLORS};
use crate::scribble::surface::{DirtyRect, RasterSurface};

/// Receiver of the path operations produced by [`StrokeInput`].
pub trait StrokeTarget {
    fn begin_path(&mut self, at: Point, style: StrokeStyle);
    /// Returns the device-pixel area the segment changed, if any.
    fn line_to(&mut self, to: Point) -> Option<DirtyRect>;
    fn end_path(&mut self);
    /// Records `region` (the union of a finished stroke's segments).
    fn take_snapshot(&mut self, region: DirtyRect);
}

impl StrokeTarget for RasterSurface {
    fn begin_path(&mut self, at: Point, style: StrokeStyle) {
        RasterSurface::begin_path(self, at, style);
    }

    fn line_to(&mut self, to: Point) -> Option<DirtyRect> {
        RasterSurface::line_to(self, to)
    }

    fn end_path(&mut self) {
        RasterSurface::end_path(self);
    }

    fn take_snapshot(&mut self, region: DirtyRect) {
        self.snapshot_region(region);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokePhase {
    #[default]
    Idle,
    /// `bounds` covers every segment painted so far in this stroke.
    Drawing {
        bounds: Option<DirtyRect>,
    },
}

/// Keys that temporarily override the tool while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldKey {
    /// Space: draw with the pencil while held.
    Draw,
    /// `E`: erase while held.
    Erase,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrokeInput {
    phase: StrokePhase,
    active_tool: Tool,
    resting_tool: Tool,
    space_held: bool,
    erase_held: bool,
    color: Color,
}

impl Default for StrokeInput {
    fn default() -> Self {
        Self {
            phase: StrokePhase::Idle,
            active_tool: Tool::Pencil,
            resting_tool: Tool::Pencil,
            space_held: false,
            erase_held: false,
            color: STROKE_COLORS[0],
        }
    }
}

impl StrokeInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, StrokePhase::Drawing { .. })
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    pub fn resting_tool(&self) -> Tool {
        self.resting_tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn space_held(&self) -> bool {
        self.space_held
    }

    pub fn erase_held(&self) -> bool {
        self.erase_held
    }

    fn draw_trigger_held(&self) -> bool {
        self.space_held || self.erase_held
    }

    pub fn pointer_down<T: StrokeTarget>(&mut self, at: Point, target: &mut T) {
        if self.is_drawing() {
            self.finish_stroke(target);
        }
        self.start_stroke(at, target);
    }

    pub fn pointer_move<T: StrokeTarget>(&mut self, at: Point, button_held: bool, target: &mut T) {
        match self.phase {
            StrokePhase::Drawing { bounds } => {
                if button_held || self.draw_trigger_held() {
                    let bounds = match (bounds, target.line_to(at)) {
                        (Some(prev), Some(rect)) => Some(prev.union(rect)),
                        (prev, rect) => prev.or(rect),
                    };
                    self.phase = StrokePhase::Drawing { bounds };
                }
            }
            StrokePhase::Idle => {
                // The hold key may have gone down before the pointer arrived.
                // This move only starts the path; the first segment is
                // painted by the next one.
                if button_held || self.space_held || self.erase_held {
                    self.start_stroke(at, target);
                }
            }
        }
    }

    pub fn pointer_up<T: StrokeTarget>(&mut self, target: &mut T) {
        self.finish_stroke(target);
    }

    pub fn pointer_leave<T: StrokeTarget>(&mut self, target: &mut T) {
        self.finish_stroke(target);
    }

    pub fn key_down<T: StrokeTarget>(&mut self, key: HoldKey, target: &mut T) {
        match key {
            HoldKey::Draw => {
                if self.space_held {
                    return;
                }
                self.space_held = true;
            }
            HoldKey::Erase => {
                if self.erase_held {
                    return;
                }
                self.erase_held = true;
            }
        }
        self.apply_hold_tool(target);
    }

    pub fn key_up<T: StrokeTarget>(&mut self, key: HoldKey, target: &mut T) {
        let was_held = match key {
            HoldKey::Draw => std::mem::replace(&mut self.space_held, false),
            HoldKey::Erase => std::mem::replace(&mut self.erase_held, false),
        };
        if !was_held {
            return;
        }
        self.finish_stroke(target);
        self.apply_hold_tool(target);
    }

    /// Sets both the active and the resting tool.
    pub fn select_tool<T: StrokeTarget>(&mut self, tool: Tool, target: &mut T) {
        self.resting_tool = tool;
        self.apply_hold_tool(target);
    }

    pub fn select_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Stops any stroke and drops key holds, e.g. when scribble mode turns off.
    pub fn reset<T: StrokeTarget>(&mut self, target: &mut T) {
        self.finish_stroke(target);
        self.space_held = false;
        self.erase_held = false;
        self.active_tool = self.resting_tool;
    }

    fn hold_tool(&self) -> Tool {
        if self.erase_held {
            Tool::Eraser
        } else if self.space_held {
            Tool::Pencil
        } else {
            self.resting_tool
        }
    }

    fn apply_hold_tool<T: StrokeTarget>(&mut self, target: &mut T) {
        let tool = self.hold_tool();
        if tool == self.active_tool {
            return;
        }
        // A stroke keeps the compositing it started with; end it so the next
        // movement begins a stroke with the new tool.
        self.finish_stroke(target);
        self.active_tool = tool;
    }

    fn start_stroke<T: StrokeTarget>(&mut self, at: Point, target: &mut T) {
        target.begin_path(at, StrokeStyle::for_tool(self.active_tool, self.color));
        self.phase = StrokePhase::Drawing { bounds: None };
    }

    fn finish_stroke<T: StrokeTarget>(&mut self, target: &mut T) -> bool {
        let StrokePhase::Drawing { bounds } = self.phase else {
            return false;
        };
        target.end_path();
        if let Some(region) = bounds {
            target.take_snapshot(region);
        }
        self.phase = StrokePhase::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scribble::model::CompositeOp;

    #[derive(Debug, Default)]
    struct Recorder {
        begins: Vec<(Point, StrokeStyle)>,
        segments: usize,
        ends: usize,
        snapshots: Vec<DirtyRect>,
    }

    impl StrokeTarget for Recorder {
        fn begin_path(&mut self, at: Point, style: StrokeStyle) {
            self.begins.push((at, style));
        }

        fn line_to(&mut self, to: Point) -> Option<DirtyRect> {
            self.segments += 1;
            let at = (to.x as i32, to.y as i32);
            Some(DirtyRect::from_points(at, at, 1))
        }

        fn end_path(&mut self) {
            self.ends += 1;
        }

        fn take_snapshot(&mut self, region: DirtyRect) {
            self.snapshots.push(region);
        }
    }

    #[test]
    fn down_move_up_draws_one_stroke_and_snapshots() {
        let mut input = StrokeInput::new();
        let mut rec = Recorder::default();

        input.pointer_down(Point::new(1.0, 1.0), &mut rec);
        input.pointer_move(Point::new(5.0, 5.0), true, &mut rec);
        input.pointer_move(Point::new(9.0, 9.0), true, &mut rec);
        input.pointer_up(&mut rec);

        assert_eq!(rec.begins.len(), 1);
        assert_eq!(rec.segments, 2);
        assert_eq!(rec.ends, 1);
        assert_eq!(
            rec.snapshots,
            vec![DirtyRect {
                x: 4,
                y: 4,
                width: 7,
                height: 7
            }]
        );
        assert_eq!(input.phase(), StrokePhase::Idle);
        assert_eq!(rec.begins[0].1.op, CompositeOp::SourceOver);
    }

    #[test]
    fn click_without_movement_takes_no_snapshot() {
        let mut input = StrokeInput::new();
        let mut rec = Recorder::default();
        input.pointer_down(Point::new(1.0, 1.0), &mut rec);
        input.pointer_up(&mut rec);
        assert_eq!(rec.ends, 1);
        assert!(rec.snapshots.is_empty());
    }

    #[test]
    fn hover_without_button_or_hold_does_nothing() {
        let mut input = StrokeInput::new();
        let mut rec = Recorder::default();
        input.pointer_move(Point::new(3.0, 3.0), false, &mut rec);
        assert!(rec.begins.is_empty());
        assert_eq!(input.phase(), StrokePhase::Idle);
    }

    #[test]
    fn space_hold_starts_stroke_on_move_and_release_ends_it() {
        let mut input = StrokeInput::new();
        let mut rec = Recorder::default();
        input.select_tool(Tool::Eraser, &mut rec);

        input.key_down(HoldKey::Draw, &mut rec);
        assert_eq!(input.active_tool(), Tool::Pencil);
        assert_eq!(input.resting_tool(), Tool::Eraser);

        input.pointer_move(Point::new(2.0, 2.0), false, &mut rec);
        assert_eq!(rec.begins.len(), 1);
        assert_eq!(rec.segments, 0);
        input.pointer_move(Point::new(6.0, 2.0), false, &mut rec);
        assert!(input.is_drawing());
        assert_eq!(rec.segments, 1);

        input.key_up(HoldKey::Draw, &mut rec);
        assert_eq!(input.phase(), StrokePhase::Idle);
        assert_eq!(input.active_tool(), Tool::Eraser);
        assert_eq!(rec.snapshots.len(), 1);
    }

    #[test]
    fn erase_hold_overrides_and_restores_resting_tool() {
        let mut input = StrokeInput::new();
        let mut rec = Recorder::default();

        input.key_down(HoldKey::Erase, &mut rec);
        assert_eq!(input.active_tool(), Tool::Eraser);
        input.pointer_move(Point::new(0.0, 0.0), false, &mut rec);
        input.pointer_move(Point::new(4.0, 0.0), false, &mut rec);
        assert_eq!(rec.begins[0].1.op, CompositeOp::DestinationOut);
        assert_eq!(rec.begins[0].1.width, 20.0);

        input.key_up(HoldKey::Erase, &mut rec);
        assert_eq!(input.active_tool(), Tool::Pencil);
        assert_eq!(input.resting_tool(), Tool::Pencil);
        assert!(!input.is_drawing());
    }

    #[test]
    fn repeated_key_down_is_ignored() {
        let mut input = StrokeInput::new();
        let mut rec = Recorder::default();
        input.key_down(HoldKey::Draw, &mut rec);
        input.pointer_move(Point::new(0.0, 0.0), false, &mut rec);
        input.key_down(HoldKey::Draw, &mut rec);
        assert!(input.is_drawing());
        assert_eq!(rec.ends, 0);
    }

    #[test]
    fn reset_stops_stroke_and_drops_holds() {
        let mut input = StrokeInput::new();
        let mut rec = Recorder::default();
        input.key_down(HoldKey::Erase, &mut rec);
        input.pointer_down(Point::new(0.0, 0.0), &mut rec);
        input.reset(&mut rec);
        assert_eq!(input.phase(), StrokePhase::Idle);
        assert!(!input.erase_held());
        assert_eq!(input.active_tool(), Tool::Pencil);
    }

    #[test]
    fn selected_color_reaches_pencil_strokes() {
        let mut input = StrokeInput::new();
        let mut rec = Recorder::default();
        input.select_color(STROKE_COLORS[2]);
        input.pointer_down(Point::new(0.0, 0.0), &mut rec);
        assert_eq!(rec.begins[0].1.color, STROKE_COLORS[2]);
        assert_eq!(rec.begins[0].1.width, 2.0);
    }
}
