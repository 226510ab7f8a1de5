//! Hospital Super Admin - desktop console for appointments, statistics and settings.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use hospital_super_admin as app;
use tracing_subscriber::prelude::*;

use app::config::{self, AppConfig, ConfigLoadResult};
use app::ui::App;

/// Desktop console for hospital super administrators.
#[derive(Parser)]
#[command(name = "hospital-super-admin")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging: stdout plus a daily file in the data dir
    let log_dir = config::data_dir().join("logs");
    let file_appender = tracing_appender::rolling::daily(&log_dir, "super-admin.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    tracing::info!("Hospital Super Admin starting...");
    tracing::info!("Log directory: {:?}", log_dir);

    // Determine config path based on mode
    let config_path = match cli.config {
        Some(path) => path,
        None if cli.dev => {
            tracing::info!("Dev mode: loading config from current directory");
            PathBuf::from("config.toml")
        }
        None => AppConfig::default_path(),
    };
    tracing::info!("Config path: {:?}", config_path);

    let (config, startup_error) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded successfully");
            (config, None)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("Config missing, writing defaults");
            let config = AppConfig::default();
            if let Err(e) = config.save(&config_path) {
                tracing::warn!("Could not write default config: {}", e);
            }
            (config, None)
        }
        ConfigLoadResult::Invalid(e) => {
            tracing::warn!("Config invalid: {}", e);
            let message = format!("{} is invalid: {e}\nUsing default settings.", config_path.display());
            (AppConfig::default(), Some(message))
        }
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let main_app = App::new(config, rt, startup_error).context("Failed to initialize application")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Hospital Super Admin")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Hospital Super Admin",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);

            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            Ok(Box::new(main_app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
