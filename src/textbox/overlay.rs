use crate::geometry::Point;
use crate::mode::{ModeChange, ModeFlag, ModeWatch};
use crate::textbox::model::{IdSource, Textbox, TextboxId};

pub const PLACEMENT_HINT: &str = "Click anywhere to place a textbox";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub id: TextboxId,
    pub last_x: f32,
    pub last_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Enter { shift: bool },
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Commit,
    InsertNewline,
    Ignore,
}

/// Where keyboard focus went when an editor field lost it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    DeleteControl,
    Elsewhere,
}

/// Collection of page-positioned textboxes plus the single-shot placement
/// mode that creates them.
pub struct TextboxOverlay {
    mode: ModeFlag,
    watch: ModeWatch,
    boxes: Vec<Textbox>,
    drag: Option<DragState>,
    ids: IdSource,
}

impl TextboxOverlay {
    pub fn new(mode: ModeFlag) -> Self {
        let watch = mode.watch();
        Self {
            mode,
            watch,
            boxes: Vec::new(),
            drag: None,
            ids: IdSource::default(),
        }
    }

    pub fn boxes(&self) -> &[Textbox] {
        &self.boxes
    }

    pub fn get(&self, id: TextboxId) -> Option<&Textbox> {
        self.boxes.iter().find(|tb| tb.id == id)
    }

    fn get_mut(&mut self, id: TextboxId) -> Option<&mut Textbox> {
        self.boxes.iter_mut().find(|tb| tb.id == id)
    }

    pub fn sync_mode(&mut self) {
        match self.watch.poll(&self.mode) {
            ModeChange::TurnedOn => tracing::debug!("textbox placement armed"),
            ModeChange::TurnedOff | ModeChange::Cycled => {
                tracing::debug!("textbox placement disarmed")
            }
            ModeChange::Unchanged => {}
        }
    }

    /// `true` while the full-page click catcher should be shown.
    pub fn is_placing(&mut self) -> bool {
        self.sync_mode();
        self.mode.get()
    }

    /// Creates an editing textbox at `page` and leaves placement mode.
    pub fn place_at(&mut self, page: Point) -> Option<TextboxId> {
        if !self.is_placing() {
            return None;
        }
        let id = self.ids.next_id();
        self.boxes.push(Textbox::new(id, page.x, page.y));
        self.mode.set(false);
        self.sync_mode();
        tracing::debug!(%id, x = page.x, y = page.y, "textbox placed");
        Some(id)
    }

    pub fn commit(&mut self, id: TextboxId, value: &str) -> bool {
        let Some(tb) = self.get_mut(id) else {
            return false;
        };
        tb.text = value.to_owned();
        tb.is_editing = false;
        true
    }

    pub fn editor_key(&mut self, id: TextboxId, key: EditorKey, value: &str) -> EditorAction {
        match key {
            EditorKey::Enter { shift: true } => EditorAction::InsertNewline,
            EditorKey::Enter { shift: false } => {
                if self.commit(id, value) {
                    EditorAction::Commit
                } else {
                    EditorAction::Ignore
                }
            }
            EditorKey::Other => EditorAction::Ignore,
        }
    }

    /// Commits on blur unless focus moved onto the box's delete control.
    pub fn blur(&mut self, id: TextboxId, value: &str, new_focus: FocusTarget) -> bool {
        match new_focus {
            FocusTarget::DeleteControl => false,
            FocusTarget::Elsewhere => self.commit(id, value),
        }
    }

    pub fn double_click(&mut self, id: TextboxId) -> bool {
        match self.get_mut(id) {
            Some(tb) if !tb.is_editing => {
                tb.is_editing = true;
                true
            }
            _ => false,
        }
    }

    pub fn delete(&mut self, id: TextboxId) -> bool {
        let before = self.boxes.len();
        self.boxes.retain(|tb| tb.id != id);
        if self.drag.is_some_and(|drag| drag.id == id) {
            self.drag = None;
        }
        before != self.boxes.len()
    }

    pub fn begin_drag(&mut self, id: TextboxId, pointer: Point, on_delete_control: bool) -> bool {
        if on_delete_control {
            return false;
        }
        match self.get(id) {
            Some(tb) if !tb.is_editing => {
                self.drag = Some(DragState {
                    id,
                    last_x: pointer.x,
                    last_y: pointer.y,
                });
                true
            }
            _ => false,
        }
    }

    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let dx = pointer.x - drag.last_x;
        let dy = pointer.y - drag.last_y;
        let Some(tb) = self.get_mut(drag.id) else {
            self.drag = None;
            return false;
        };
        tb.x += dx;
        tb.y += dy;
        self.drag = Some(DragState {
            id: drag.id,
            last_x: pointer.x,
            last_y: pointer.y,
        });
        true
    }

    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    /// The host tracks page-wide pointer movement only while this is `true`.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag(&self) -> Option<DragState> {
        self.drag
    }
}
