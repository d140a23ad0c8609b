use crate::keys::{KeyCode, KeyEvent, KeyState};
use crate::mode::{ModeChange, ModeFlag, ModeWatch};
use crate::scribble::input::{HoldKey, StrokeInput, StrokeTarget};
use crate::scribble::model::{Point, StrokeStyle, Tool};
use crate::scribble::surface::{ContainerMetrics, Damage, DirtyRect, RasterSurface, MAX_SURFACE_SIDE};
use crate::scribble::toolbar::ToolbarCommand;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cursor {
    Default,
    Crosshair,
    Eraser { at: Point },
}

/// Freehand drawing layer covering the page.
///
/// Pointer positions are given in page coordinates; the overlay converts
/// them to surface coordinates using the surface origin.
pub struct ScribbleOverlay {
    mode: ModeFlag,
    watch: ModeWatch,
    surface: Option<RasterSurface>,
    input: StrokeInput,
    origin: Point,
    pointer: Option<Point>,
    max_side: u32,
}

impl ScribbleOverlay {
    pub fn new(mode: ModeFlag) -> Self {
        let watch = mode.watch();
        Self {
            mode,
            watch,
            surface: None,
            input: StrokeInput::new(),
            origin: Point::default(),
            pointer: None,
            max_side: MAX_SURFACE_SIDE,
        }
    }

    /// Creates the surface. Without a container nothing is mounted.
    pub fn mount(&mut self, container: Option<ContainerMetrics>, pixel_ratio: f32) -> bool {
        let Some(container) = container else {
            tracing::trace!("scribble mount skipped: no container");
            return false;
        };
        let mut surface = RasterSurface::new();
        surface.set_max_side(self.max_side);
        surface.fit(container, pixel_ratio);
        self.surface = Some(surface);
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Re-fits the surface after a viewport resize or scroll.
    pub fn fit(&mut self, container: Option<ContainerMetrics>, pixel_ratio: f32) -> bool {
        let (Some(surface), Some(container)) = (self.surface.as_mut(), container) else {
            tracing::trace!("scribble fit skipped: surface or container missing");
            return false;
        };
        surface.fit(container, pixel_ratio)
    }

    /// Limits the surface's device size; takes effect on the next `fit`.
    pub fn set_max_side(&mut self, side: u32) {
        self.max_side = side;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_max_side(side);
        }
    }

    /// Pixels changed since the last call; `None` when nothing is mounted.
    pub fn take_damage(&mut self) -> Option<Damage> {
        self.surface.as_mut().map(RasterSurface::take_damage)
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn surface(&self) -> Option<&RasterSurface> {
        self.surface.as_ref()
    }

    pub fn input(&self) -> &StrokeInput {
        &self.input
    }

    pub fn is_active(&mut self) -> bool {
        self.sync_mode();
        self.mode.get()
    }

    /// Pointer events pass through to the page while this is `false`.
    pub fn intercepts_pointer(&mut self) -> bool {
        self.is_active()
    }

    /// Reconciles with the host-owned flag; a flag that went off (or was
    /// cycled) since the last event stops any stroke in progress.
    pub fn sync_mode(&mut self) {
        match self.watch.poll(&self.mode) {
            ModeChange::TurnedOff | ModeChange::Cycled => {
                self.reset_input();
                tracing::debug!("scribble mode off; stroke state reset");
            }
            ModeChange::TurnedOn => tracing::debug!("scribble mode on"),
            ModeChange::Unchanged => {}
        }
    }

    fn reset_input(&mut self) {
        self.pointer = None;
        match self.surface.as_mut() {
            Some(surface) => self.input.reset(surface),
            None => self.input.reset(&mut NoSurface),
        }
    }

    pub fn pointer_down(&mut self, page: Point) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let at = page.offset_from(self.origin);
        self.pointer = Some(at);
        self.input.pointer_down(at, surface);
        true
    }

    pub fn pointer_move(&mut self, page: Point, button_held: bool) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let at = page.offset_from(self.origin);
        self.pointer = Some(at);
        self.input.pointer_move(at, button_held, surface);
        self.input.is_drawing()
    }

    pub fn pointer_up(&mut self) {
        if !self.is_active() {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            self.input.pointer_up(surface);
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        if !self.is_active() {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            self.input.pointer_leave(surface);
        }
    }

    /// Handles the Space and `E` holds. Returns `true` when the key was used.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        if !self.is_active() {
            return false;
        }
        let hold = match event.key {
            KeyCode::Space => HoldKey::Draw,
            KeyCode::E if !event.modifiers.ctrl && !event.modifiers.alt => HoldKey::Erase,
            _ => return false,
        };
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match event.state {
            KeyState::Pressed => self.input.key_down(hold, surface),
            KeyState::Released => self.input.key_up(hold, surface),
        }
        true
    }

    pub fn apply(&mut self, command: ToolbarCommand) {
        match command {
            ToolbarCommand::SelectTool(tool) => match self.surface.as_mut() {
                Some(surface) => self.input.select_tool(tool, surface),
                None => self.input.select_tool(tool, &mut NoSurface),
            },
            ToolbarCommand::SetColor(color) => self.input.select_color(color),
            ToolbarCommand::Clear => {
                if let Some(surface) = self.surface.as_mut() {
                    self.input.reset(surface);
                    surface.clear();
                    tracing::debug!("scribble surface cleared");
                }
            }
        }
    }

    pub fn cursor(&mut self) -> Cursor {
        if !self.is_active() {
            return Cursor::Default;
        }
        match (self.input.active_tool(), self.pointer) {
            (Tool::Eraser, Some(at)) => Cursor::Eraser {
                at: at.translate(self.origin.x, self.origin.y),
            },
            _ => Cursor::Crosshair,
        }
    }
}

/// Stand-in target used to run state transitions before the surface exists.
struct NoSurface;

impl StrokeTarget for NoSurface {
    fn begin_path(&mut self, _at: Point, _style: StrokeStyle) {}

    fn line_to(&mut self, _to: Point) -> Option<DirtyRect> {
        None
    }

    fn end_path(&mut self) {}

    fn take_snapshot(&mut self, _region: DirtyRect) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyModifiers;
    use crate::scribble::input::StrokePhase;
    use crate::scribble::model::STROKE_COLORS;

    fn metrics(width: f32, height: f32) -> ContainerMetrics {
        ContainerMetrics {
            width,
            scroll_height: height,
            offset_height: height,
            client_height: height,
            viewport_height: height,
        }
    }

    fn mounted(active: bool) -> (ModeFlag, ScribbleOverlay) {
        let flag = ModeFlag::new(false);
        let mut overlay = ScribbleOverlay::new(flag.clone());
        assert!(overlay.mount(Some(metrics(100.0, 100.0)), 1.0));
        flag.set(active);
        (flag, overlay)
    }

    #[test]
    fn inactive_overlay_ignores_pointer() {
        let (_flag, mut overlay) = mounted(false);
        assert!(!overlay.pointer_down(Point::new(10.0, 10.0)));
        overlay.pointer_move(Point::new(50.0, 50.0), true);
        overlay.pointer_up();
        assert_eq!(overlay.surface().map(|s| s.painted_pixel_count()), Some(0));
        assert_eq!(overlay.cursor(), Cursor::Default);
    }

    #[test]
    fn origin_offsets_page_coordinates() {
        let (_flag, mut overlay) = mounted(true);
        overlay.set_origin(Point::new(20.0, 30.0));
        overlay.pointer_down(Point::new(30.0, 40.0));
        overlay.pointer_move(Point::new(60.0, 40.0), true);
        overlay.pointer_up();
        let surface = overlay.surface().expect("mounted");
        assert!(surface.pixels().get_pixel(20, 10).0[3] > 0);
        assert_eq!(surface.pixels().get_pixel(20, 40).0[3], 0);
    }

    #[test]
    fn turning_mode_off_mid_stroke_resets_to_idle() {
        let (flag, mut overlay) = mounted(true);
        overlay.pointer_down(Point::new(1.0, 1.0));
        overlay.handle_key(KeyEvent::pressed(KeyCode::Space, KeyModifiers::default()));
        assert!(overlay.input().is_drawing());

        flag.set(false);
        overlay.sync_mode();
        assert_eq!(overlay.input().phase(), StrokePhase::Idle);
        assert!(!overlay.input().space_held());
    }

    #[test]
    fn unmounted_overlay_is_a_noop() {
        let flag = ModeFlag::new(true);
        let mut overlay = ScribbleOverlay::new(flag);
        assert!(!overlay.mount(None, 1.0));
        assert_eq!(overlay.take_damage(), None);
        assert!(!overlay.pointer_down(Point::new(1.0, 1.0)));
        assert!(!overlay.fit(Some(metrics(10.0, 10.0)), 1.0));
        assert!(!overlay.input().is_drawing());
    }

    #[test]
    fn eraser_cursor_follows_pointer() {
        let (_flag, mut overlay) = mounted(true);
        overlay.apply(ToolbarCommand::SelectTool(Tool::Eraser));
        overlay.pointer_move(Point::new(12.0, 7.0), false);
        assert_eq!(
            overlay.cursor(),
            Cursor::Eraser {
                at: Point::new(12.0, 7.0)
            }
        );
        overlay.apply(ToolbarCommand::SelectTool(Tool::Pencil));
        assert_eq!(overlay.cursor(), Cursor::Crosshair);
    }

    #[test]
    fn max_side_applies_to_mounted_surface() {
        let (_flag, mut overlay) = mounted(true);
        assert_eq!(overlay.take_damage(), Some(Damage::Full));
        overlay.set_max_side(64);
        assert!(overlay.fit(Some(metrics(100.0, 400.0)), 1.0));
        let surface = overlay.surface().expect("mounted");
        assert_eq!(surface.device_size(), (64, 64));
    }

    #[test]
    fn keys_are_ignored_outside_scribble_mode() {
        let (_flag, mut overlay) = mounted(false);
        assert!(!overlay.handle_key(KeyEvent::pressed(KeyCode::E, KeyModifiers::default())));
        assert_eq!(overlay.input().active_tool(), Tool::Pencil);
    }

    #[test]
    fn clear_wipes_everything_drawn() {
        let (_flag, mut overlay) = mounted(true);
        overlay.apply(ToolbarCommand::SetColor(STROKE_COLORS[1]));
        overlay.pointer_down(Point::new(5.0, 5.0));
        overlay.pointer_move(Point::new(50.0, 50.0), true);
        overlay.pointer_up();
        overlay.apply(ToolbarCommand::Clear);
        let surface = overlay.surface().expect("mounted");
        assert_eq!(surface.painted_pixel_count(), 0);
        assert!(!surface.has_snapshot());
    }
}
