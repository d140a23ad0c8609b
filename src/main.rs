use eframe::egui;
use page_annotate::gui::AnnotateApp;
use page_annotate::logging;
use page_annotate::settings::Settings;

fn main() -> anyhow::Result<()> {
    let settings_path = Settings::default_path();
    let settings = Settings::load(&settings_path)?;
    logging::init(settings.debug_logging);
    tracing::info!(path = %settings_path, "settings loaded");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Page Annotate",
        native_options,
        Box::new(move |_cc| Box::new(AnnotateApp::new(settings))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run the annotation window: {err}"))
}
