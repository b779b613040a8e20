mod analysis;
mod app;
mod event;
mod session;
mod store;
mod theme;

use analysis::AnalysisEngine;
use anyhow::Context;
use app::FaultlineApp;
use eframe::egui;
use std::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (error_store, analysis_lookup, warnings) =
        store::dataset::load_embedded().context("failed to load embedded dataset")?;
    info!(
        records = error_store.len(),
        analyses = analysis_lookup.len(),
        "dataset loaded"
    );
    if error_store.is_empty() {
        warn!("dataset contains no error records");
    }
    if analysis_lookup.is_empty() {
        warn!("dataset contains no analysis entries");
    }

    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("faultline-runtime")
        .build()
        .context("failed to build tokio runtime")?;

    let engine = AnalysisEngine::new(analysis_lookup, tx, runtime.handle().clone());
    let app = FaultlineApp::new(rx, engine, error_store, warnings);
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([1024.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Faultline",
        native_options,
        Box::new(move |creation_context| {
            app.apply_theme(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to run UI: {err}"))?;

    Ok(())
}
