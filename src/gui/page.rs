use crate::scribble::ContainerMetrics;
use eframe::egui;

/// Where the scrolled page sits on screen this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    /// Screen position of page coordinate (0, 0); moves up as the page scrolls.
    pub origin: egui::Pos2,
    /// Visible part of the page.
    pub viewport: egui::Rect,
    pub content_size: egui::Vec2,
}

impl PageLayout {
    pub fn metrics(&self, window_height: f32) -> ContainerMetrics {
        ContainerMetrics {
            width: self.viewport.width(),
            scroll_height: self.content_size.y,
            offset_height: self.viewport.height(),
            client_height: self.viewport.height(),
            viewport_height: window_height,
        }
    }
}

/// Filler document the overlays annotate.
pub struct Page {
    title: String,
    paragraphs: Vec<String>,
}

impl Page {
    pub fn generate(paragraphs: usize) -> Self {
        let paragraphs = (0..paragraphs)
            .map(|_| {
                (0..5)
                    .map(|_| lipsum::lipsum_words(12))
                    .collect::<Vec<_>>()
                    .join(". ")
            })
            .collect();
        Self {
            title: lipsum::lipsum_words(4),
            paragraphs,
        }
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn show(&self, ui: &mut egui::Ui) -> PageLayout {
        let output = egui::ScrollArea::vertical()
            .id_source("page")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.heading(&self.title);
                for paragraph in &self.paragraphs {
                    ui.add_space(8.0);
                    ui.label(paragraph);
                }
            });
        PageLayout {
            origin: output.inner_rect.min - output.state.offset,
            viewport: output.inner_rect,
            content_size: output.content_size,
        }
    }
}
