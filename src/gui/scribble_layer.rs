use super::input::{to_page, to_screen};
use super::page::PageLayout;
use crate::geometry::Point;
use crate::scribble::model::{Color, ERASER_WIDTH};
use crate::scribble::toolbar::{toolbar_items, ToolbarItem};
use crate::scribble::{Cursor, Damage, RasterSurface, ScribbleOverlay};
use eframe::egui::{self, Color32, CursorIcon, Id, LayerId, Order, Rect, Sense, Stroke, TextureHandle, TextureOptions};

fn full_image(surface: &RasterSurface) -> egui::ColorImage {
    let (width, height) = surface.device_size();
    egui::ColorImage::from_rgba_unmultiplied([width as usize, height as usize], surface.pixels().as_raw())
}

fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Presents the scribble raster and feeds it pointer input.
#[derive(Default)]
pub struct ScribbleLayer {
    texture: Option<TextureHandle>,
    last_pointer: Option<Point>,
}

impl ScribbleLayer {
    /// Uploads whatever the surface painted since the previous frame:
    /// only the damaged region when a texture exists, the whole raster
    /// after a resize or clear.
    pub fn sync_texture(&mut self, ctx: &egui::Context, overlay: &mut ScribbleOverlay) {
        let Some(damage) = overlay.take_damage() else {
            return;
        };
        let Some(surface) = overlay.surface() else {
            return;
        };
        let (width, height) = surface.device_size();
        if width == 0 || height == 0 {
            self.texture = None;
            return;
        }
        match (damage, self.texture.as_mut()) {
            (Damage::None, Some(_)) => {}
            (Damage::Region(rect), Some(texture)) => {
                let patch = surface.region_pixels(rect);
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [patch.width() as usize, patch.height() as usize],
                    patch.as_raw(),
                );
                texture.set_partial([rect.x as usize, rect.y as usize], image, TextureOptions::LINEAR);
            }
            (_, Some(texture)) => texture.set(full_image(surface), TextureOptions::LINEAR),
            (_, None) => {
                self.texture = Some(ctx.load_texture(
                    "scribble-surface",
                    full_image(surface),
                    TextureOptions::LINEAR,
                ));
            }
        }
    }

    pub fn paint(&self, ctx: &egui::Context, layout: &PageLayout, surface: &RasterSurface) {
        let Some(texture) = &self.texture else {
            return;
        };
        let (width, height) = surface.css_size();
        let rect = Rect::from_min_size(layout.origin, egui::vec2(width, height));
        let painter = ctx
            .layer_painter(LayerId::new(Order::Foreground, Id::new("scribble-surface")))
            .with_clip_rect(layout.viewport);
        painter.image(
            texture.id(),
            rect,
            Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    pub fn handle_pointer(
        &mut self,
        ctx: &egui::Context,
        overlay: &mut ScribbleOverlay,
        layout: &PageLayout,
    ) {
        if !overlay.intercepts_pointer() {
            self.last_pointer = None;
            return;
        }

        // Swallow clicks so the page below does not react while drawing.
        egui::Area::new(Id::new("scribble-catcher"))
            .fixed_pos(layout.viewport.min)
            .order(Order::Foreground)
            .show(ctx, |ui| {
                ui.allocate_response(layout.viewport.size(), Sense::click_and_drag());
            });

        let (hover, pressed, down, released) = ctx.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
            )
        });

        match hover.filter(|pos| layout.viewport.contains(*pos)) {
            Some(pos) => {
                let page = to_page(pos, layout.origin);
                if pressed {
                    overlay.pointer_down(page);
                } else if self.last_pointer != Some(page) {
                    overlay.pointer_move(page, down);
                }
                self.last_pointer = Some(page);
            }
            None => {
                if self.last_pointer.take().is_some() {
                    overlay.pointer_leave();
                }
            }
        }
        if released {
            overlay.pointer_up();
        }
    }

    pub fn paint_cursor(&self, ctx: &egui::Context, overlay: &mut ScribbleOverlay, layout: &PageLayout) {
        if self.last_pointer.is_none() {
            return;
        }
        match overlay.cursor() {
            Cursor::Default => {}
            Cursor::Crosshair => ctx.output_mut(|o| o.cursor_icon = CursorIcon::Crosshair),
            Cursor::Eraser { at } => {
                ctx.output_mut(|o| o.cursor_icon = CursorIcon::None);
                let painter = ctx.layer_painter(LayerId::new(Order::Tooltip, Id::new("eraser-cursor")));
                let outline = Rect::from_center_size(to_screen(at, layout.origin), egui::Vec2::splat(ERASER_WIDTH));
                painter.rect_filled(outline, 3.0, Color32::from_white_alpha(160));
                painter.rect_stroke(outline, 3.0, Stroke::new(1.0, Color32::DARK_GRAY));
            }
        }
    }
}

/// Tool, swatch and clear buttons; only enabled while scribble mode is on.
pub fn toolbar_ui(ui: &mut egui::Ui, overlay: &mut ScribbleOverlay) {
    let active = overlay.is_active();
    ui.add_enabled_ui(active, |ui| {
        for item in toolbar_items() {
            let clicked = match item {
                ToolbarItem::Tool { tool, label, tooltip } => ui
                    .selectable_label(overlay.input().active_tool() == tool, label)
                    .on_hover_text(tooltip)
                    .clicked(),
                ToolbarItem::Swatch { color } => {
                    let stroke = if overlay.input().color() == color {
                        Stroke::new(2.0, ui.visuals().strong_text_color())
                    } else {
                        Stroke::NONE
                    };
                    ui.add(
                        egui::Button::new("")
                            .fill(to_color32(color))
                            .stroke(stroke)
                            .min_size(egui::vec2(18.0, 18.0)),
                    )
                    .clicked()
                }
                ToolbarItem::Clear => ui.button("Clear").clicked(),
            };
            if clicked {
                overlay.apply(item.command());
            }
        }
    });
}
