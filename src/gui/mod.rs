mod input;
mod page;
mod scribble_layer;
mod textbox_layer;

pub use input::{key_events, to_page, to_screen, translate_key, translate_modifiers};
pub use page::{Page, PageLayout};

use crate::geometry::Point;
use crate::host::{AnnotationHost, ModeState};
use crate::keys::ModeCommand;
use crate::scribble::ScribbleOverlay;
use crate::settings::Settings;
use crate::textbox::overlay::PLACEMENT_HINT;
use crate::textbox::{TextboxId, TextboxOverlay};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use scribble_layer::ScribbleLayer;
use textbox_layer::TextboxLayer;

/// Demo page with both annotation overlays mounted on top of it.
pub struct AnnotateApp {
    settings: Settings,
    host: AnnotationHost,
    scribble: ScribbleOverlay,
    textboxes: TextboxOverlay,
    page: Page,
    scribble_layer: ScribbleLayer,
    textbox_layer: TextboxLayer,
    toasts: Toasts,
}

impl AnnotateApp {
    pub fn new(settings: Settings) -> Self {
        let host = AnnotationHost::from_settings(&settings);
        let scribble = ScribbleOverlay::new(host.scribble_mode());
        let textboxes = TextboxOverlay::new(host.textbox_mode());
        let page = Page::generate(settings.page_paragraphs);
        Self {
            settings,
            host,
            scribble,
            textboxes,
            page,
            scribble_layer: ScribbleLayer::default(),
            textbox_layer: TextboxLayer::default(),
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
        }
    }

    pub fn mode_state(&self) -> ModeState {
        self.host.state()
    }

    pub fn scribble(&self) -> &ScribbleOverlay {
        &self.scribble
    }

    pub fn textboxes(&self) -> &TextboxOverlay {
        &self.textboxes
    }

    pub fn textbox_delete_rect(&self, id: TextboxId) -> Option<egui::Rect> {
        self.textbox_layer.delete_rect(id)
    }

    /// Runs one frame of the page and both overlays.
    pub fn show(&mut self, ctx: &egui::Context) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("annotate-toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| self.mode_bar(ui));
        });

        let layout = egui::CentralPanel::default()
            .show(ctx, |ui| self.page.show(ui))
            .inner;

        let metrics = Some(layout.metrics(ctx.screen_rect().height()));
        let pixel_ratio = ctx.pixels_per_point();
        let max_side = ctx.input(|i| i.max_texture_side);
        self.scribble
            .set_max_side(u32::try_from(max_side).unwrap_or(u32::MAX));
        if self.scribble.is_mounted() {
            self.scribble.fit(metrics, pixel_ratio);
        } else {
            self.scribble.mount(metrics, pixel_ratio);
            self.scribble.set_origin(Point::default());
        }

        self.scribble_layer
            .handle_pointer(ctx, &mut self.scribble, &layout);
        self.scribble_layer.sync_texture(ctx, &mut self.scribble);
        if let Some(surface) = self.scribble.surface() {
            self.scribble_layer.paint(ctx, &layout, surface);
        }
        self.scribble_layer
            .paint_cursor(ctx, &mut self.scribble, &layout);

        self.textbox_layer.show(ctx, &mut self.textboxes, &layout);

        self.toasts.show(ctx);
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| key_events(&i.events));
        let typing = ctx.wants_keyboard_input();
        for event in events {
            if let Some(command) = self.host.handle_key(event) {
                self.announce(command);
                continue;
            }
            // Releases always go through so a hold never sticks behind a text field.
            if !typing || !event.is_pressed() {
                self.scribble.handle_key(event);
            }
        }
    }

    fn announce(&mut self, command: ModeCommand) {
        let state = self.host.state();
        tracing::info!(
            ?command,
            scribble = state.scribble,
            textbox = state.textbox,
            "annotation mode changed"
        );
        if !self.settings.enable_toasts {
            return;
        }
        let text = match command {
            ModeCommand::ToggleScribble if state.scribble => {
                "Scribble on: drag to draw, hold Space to draw, hold E to erase"
            }
            ModeCommand::ToggleScribble => "Scribble off",
            ModeCommand::ToggleTextbox if state.textbox => PLACEMENT_HINT,
            ModeCommand::ToggleTextbox => "Textbox placement cancelled",
            ModeCommand::ExitAll => "Annotation modes off",
        };
        self.toasts.add(Toast {
            text: text.into(),
            kind: ToastKind::Info,
            options: ToastOptions::default().duration_in_seconds(self.settings.toast_duration()),
        });
    }

    fn mode_bar(&mut self, ui: &mut egui::Ui) {
        let state = self.host.state();
        let chord = self.settings.activation_modifier.label();
        let mut command = None;
        if ui
            .selectable_label(state.scribble, "Scribble")
            .on_hover_text(format!("{chord}+S"))
            .clicked()
        {
            command = Some(ModeCommand::ToggleScribble);
        }
        if ui
            .selectable_label(state.textbox, "Textbox")
            .on_hover_text(format!("{chord}+T"))
            .clicked()
        {
            command = Some(ModeCommand::ToggleTextbox);
        }
        if let Some(command) = command {
            self.host.apply(command);
            self.announce(command);
        }
        ui.separator();
        scribble_layer::toolbar_ui(ui, &mut self.scribble);
    }
}

impl eframe::App for AnnotateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}
