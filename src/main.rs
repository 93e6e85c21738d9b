use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zoomies::settings::{SETTINGS_PATH, Settings};

use crate::app_context::AppContext;

mod app_context;
mod subject;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = match Settings::load_or_default() {
        Ok(settings) => settings,
        Err(error) => {
            warn!("Could not read {}: {:?}, using defaults", SETTINGS_PATH.display(), error);
            Settings::default()
        }
    };

    let window_size = [720.0, 420.0];
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(window_size)
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    let context = AppContext::new(settings);
    info!("===Zoomies loaded===");

    eframe::run_native(
        "Zoomies",
        options,
        Box::new(|_ctx| {
            Ok(Box::new(context))
        })
    ).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    Ok(())
}
