use super::input::{to_page, to_screen};
use super::page::PageLayout;
use crate::geometry::Point;
use crate::textbox::overlay::PLACEMENT_HINT;
use crate::textbox::{EditorKey, FocusTarget, Textbox, TextboxId, TextboxOverlay};
use eframe::egui::{self, CursorIcon, Event, Id, Key, Order, Rect, RichText, Sense};
use std::collections::{HashMap, HashSet};

/// Renders textboxes as floating areas and turns egui responses into
/// overlay operations.
#[derive(Default)]
pub struct TextboxLayer {
    drafts: HashMap<TextboxId, String>,
    focus_pending: HashSet<TextboxId>,
    delete_rects: HashMap<TextboxId, Rect>,
}

impl TextboxLayer {
    pub fn show(&mut self, ctx: &egui::Context, overlay: &mut TextboxOverlay, layout: &PageLayout) {
        self.track_drag(ctx, overlay, layout);

        let boxes: Vec<Textbox> = overlay.boxes().to_vec();
        for tb in boxes {
            let screen = to_screen(Point::new(tb.x, tb.y), layout.origin);
            let dragged = overlay.drag().is_some_and(|drag| drag.id == tb.id);
            if !tb.is_editing && !dragged && !layout.viewport.contains(screen) {
                continue;
            }
            egui::Area::new(Id::new(("textbox", tb.id.0)))
                .fixed_pos(screen)
                .order(Order::Middle)
                .movable(false)
                .constrain(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style())
                        .inner_margin(6.0)
                        .show(ui, |ui| {
                            if tb.is_editing {
                                self.editor_ui(ui, overlay, &tb);
                            } else {
                                self.display_ui(ui, overlay, &tb, layout);
                            }
                        });
                });
        }

        self.drafts
            .retain(|id, _| overlay.get(*id).is_some_and(|tb| tb.is_editing));
        self.focus_pending.retain(|id| overlay.get(*id).is_some());
        self.delete_rects.retain(|id, _| overlay.get(*id).is_some());

        self.placement_catcher(ctx, overlay, layout);
    }

    /// Screen rect of a box's delete control as of the last frame it was shown.
    pub fn delete_rect(&self, id: TextboxId) -> Option<Rect> {
        self.delete_rects.get(&id).copied()
    }

    fn begin_editing(&mut self, id: TextboxId, text: &str) {
        self.drafts.insert(id, text.to_owned());
        self.focus_pending.insert(id);
    }

    fn placement_catcher(&mut self, ctx: &egui::Context, overlay: &mut TextboxOverlay, layout: &PageLayout) {
        if !overlay.is_placing() {
            return;
        }
        let response = egui::Area::new(Id::new("textbox-placement"))
            .fixed_pos(layout.viewport.min)
            .order(Order::Foreground)
            .show(ctx, |ui| {
                let response = ui.allocate_response(layout.viewport.size(), Sense::click());
                ui.painter().text(
                    layout.viewport.center_top() + egui::vec2(0.0, 24.0),
                    egui::Align2::CENTER_CENTER,
                    PLACEMENT_HINT,
                    egui::FontId::proportional(16.0),
                    ui.visuals().strong_text_color(),
                );
                response
            })
            .inner;
        if response.hovered() {
            ctx.output_mut(|o| o.cursor_icon = CursorIcon::Crosshair);
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(id) = overlay.place_at(to_page(pos, layout.origin)) {
                    self.begin_editing(id, "");
                }
            }
        }
    }

    /// Page-wide pointer tracking, live only while a drag is in progress.
    fn track_drag(&mut self, ctx: &egui::Context, overlay: &mut TextboxOverlay, layout: &PageLayout) {
        if !overlay.is_dragging() {
            return;
        }
        let (pos, down) = ctx.input(|i| (i.pointer.latest_pos(), i.pointer.primary_down()));
        if let Some(pos) = pos {
            overlay.drag_to(to_page(pos, layout.origin));
        }
        if down {
            ctx.output_mut(|o| o.cursor_icon = CursorIcon::Grabbing);
        } else {
            overlay.end_drag();
        }
    }

    fn editor_ui(&mut self, ui: &mut egui::Ui, overlay: &mut TextboxOverlay, tb: &Textbox) {
        let id = tb.id;
        let edit_id = Id::new(("textbox-editor", id.0));

        let delete = ui
            .horizontal(|ui| {
                ui.label(RichText::new("Enter to save, Shift+Enter for a new line").small().weak());
                ui.small_button("✕").on_hover_text("Delete textbox")
            })
            .inner;

        self.delete_rects.insert(id, delete.rect);

        // Plain Enter is taken out before the editor sees it; Shift+Enter
        // stays in the queue and becomes a newline.
        let had_focus = ui.memory(|m| m.has_focus(edit_id));
        let enter = had_focus && ui.input_mut(|i| take_plain_enter(&mut i.events));

        let draft = self.drafts.entry(id).or_insert_with(|| tb.text.clone());
        let response = ui.add(
            egui::TextEdit::multiline(draft)
                .id(edit_id)
                .desired_rows(2)
                .desired_width(220.0),
        );
        let value = draft.clone();
        if self.focus_pending.remove(&id) {
            response.request_focus();
        }

        if delete.clicked() {
            overlay.delete(id);
        } else if enter {
            overlay.editor_key(id, EditorKey::Enter { shift: false }, &value);
        } else if response.lost_focus() {
            // Focus leaves on press, the delete click lands on release.
            let press = ui.input(|i| i.pointer.press_origin());
            let on_delete = press.is_some_and(|pos| delete.rect.contains(pos));
            let target = if on_delete || delete.hovered() || delete.is_pointer_button_down_on() {
                FocusTarget::DeleteControl
            } else {
                FocusTarget::Elsewhere
            };
            overlay.blur(id, &value, target);
        }
    }

    fn display_ui(
        &mut self,
        ui: &mut egui::Ui,
        overlay: &mut TextboxOverlay,
        tb: &Textbox,
        layout: &PageLayout,
    ) {
        ui.horizontal(|ui| {
            let text = if tb.text.is_empty() {
                RichText::new("(empty)").weak()
            } else {
                RichText::new(&tb.text)
            };
            let body = ui
                .add(egui::Label::new(text).sense(Sense::click_and_drag()))
                .on_hover_cursor(CursorIcon::Grab);
            let delete = ui.small_button("✕").on_hover_text("Delete textbox");
            self.delete_rects.insert(tb.id, delete.rect);

            if delete.clicked() {
                overlay.delete(tb.id);
            } else if body.double_clicked() {
                if overlay.double_click(tb.id) {
                    self.begin_editing(tb.id, &tb.text);
                }
            } else if body.drag_started() {
                let press = ui.input(|i| i.pointer.press_origin());
                if let Some(pos) = press.or(body.interact_pointer_pos()) {
                    overlay.begin_drag(tb.id, to_page(pos, layout.origin), false);
                }
            }
        });
    }
}

/// Removes Enter presses without Shift and reports whether there were any.
/// Each event's own modifiers decide, not the frame-level state.
fn take_plain_enter(events: &mut Vec<Event>) -> bool {
    let before = events.len();
    events.retain(|event| {
        !matches!(
            event,
            Event::Key { key: Key::Enter, pressed: true, modifiers, .. } if !modifiers.shift
        )
    });
    events.len() != before
}
