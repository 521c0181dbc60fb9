//! Heartysis: heart-disease risk form with a cardiology chat assistant.
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heartysis::adapters::sanitize::SanitizingMakeWriter;
use heartysis::config::AppConfig;
use heartysis::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen), so
    // interactive sessions log to a file and non-interactive ones to stdout.
    let interactive = std::io::stdout().is_terminal();
    let (writer, _guard) = if config.log.mode.use_file(interactive) {
        if let Some(parent) = config.log.file.parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log.file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!(
        locale = %config.locale,
        model = ?config.model_path,
        gemini_model = %config.gemini.model,
        "Starting Heartysis..."
    );

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("Heartysis shutdown complete.");
    Ok(())
}
