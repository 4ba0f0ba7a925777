mod wiring;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::configuration::Configuration;
use crate::storage::SqliteStorage;
use crate::{cli, rest};

pub struct App {
    pub config: Configuration,
    pub storage: SqliteStorage,
    // Keeps the non-blocking log writer flushing until the process exits.
    _log_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl App {
    pub fn from_cli() -> Result<Self> {
        let cli = cli::parse();
        let config = Configuration::from_cli(&cli);

        let log_guard = crate::tracing::init(config.log_file.as_deref());
        log::info!("🚀 Starting catalogue service");
        log::info!("🌐 Listen address: {}", config.listen);
        log::info!("📂 Data dir: {}", config.data_dir.display());
        if let Some(path) = config.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.display());
        }

        wiring::init_data_dir(&config).context("initializing data dir")?;
        let storage = wiring::init_storage(&config)?;

        Ok(Self {
            config,
            storage,
            _log_guard: log_guard,
        })
    }
}

pub async fn run() -> Result<()> {
    let app = App::from_cli()?;

    let shutdown = CancellationToken::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("🧨 Ctrl-C received, shutting down");
            signal_shutdown.cancel();
        }
    });

    rest::serve(app.config.listen, app.storage.clone(), shutdown).await?;

    log::info!("✅ Shutdown complete");
    Ok(())
}
