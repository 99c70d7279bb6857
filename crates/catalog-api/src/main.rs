//! # catalog-api
//!
//! Product catalog service binary. Loads settings, opens the `SQLite`
//! store, and serves the HTTP API until ctrl-c.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use catalog_server::{CatalogServer, RandomFailureGate, ServerConfig};
use catalog_settings::CatalogSettings;
use catalog_store::ConnectionConfig;
use clap::Parser;
use tracing_subscriber::fmt::MakeWriter;

/// Product catalog HTTP service.
#[derive(Parser, Debug)]
#[command(name = "catalog-api", about = "Product catalog HTTP service")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database file (overrides settings).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Settings file (defaults to `$CATALOG_SETTINGS` or `./data/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings and validate
    /// the result.
    fn apply(&self, settings: &mut CatalogSettings) -> catalog_settings::Result<()> {
        if let Some(ref host) = self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(ref path) = self.db_path {
            settings.database.path = path.to_string_lossy().into_owned();
        }
        settings.validate()
    }
}

/// Load settings with a warn-level subscriber scoped to the load, so
/// rejected overrides are reported before logging is configured.
fn load_settings<F, W>(
    path: &Path,
    lookup: F,
    make_writer: W,
) -> catalog_settings::Result<CatalogSettings>
where
    F: Fn(&str) -> Option<String>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(make_writer)
        .compact()
        .finish();
    tracing::subscriber::with_default(bootstrap, || {
        catalog_settings::load_settings_with(path, lookup)
    })
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(catalog_settings::loader::settings_path);
    let mut settings =
        load_settings(&settings_path, |name| std::env::var(name).ok(), std::io::stderr)
            .with_context(|| {
                format!("Failed to load settings from {}", settings_path.display())
            })?;
    args.apply(&mut settings)
        .context("Invalid command-line overrides")?;

    init_logging(&settings.logging.level, settings.logging.json);

    let db_path = PathBuf::from(&settings.database.path);
    let store = catalog_store::initialize(
        &db_path,
        &ConnectionConfig {
            pool_size: settings.database.pool_size,
            busy_timeout_ms: settings.database.busy_timeout_ms,
        },
    )
    .with_context(|| format!("Failed to initialize database at {}", db_path.display()))?;

    let metrics = catalog_server::metrics::install_recorder()
        .map_err(|e| anyhow!(e))
        .context("Failed to install metrics recorder")?;

    let gate = RandomFailureGate::new(settings.chaos.update_failure_rate);
    tracing::info!(rate = gate.rate(), "update failure injection configured");

    let server = CatalogServer::new(
        ServerConfig {
            host: settings.server.host.clone(),
            port: settings.server.port,
        },
        store,
        Arc::new(gate),
        metrics,
    );
    let handle = server.listen().await.context("Failed to bind server")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    if handle.shutdown().await {
        tracing::info!("Shutdown complete");
    } else {
        tracing::warn!("Shutdown finished with requests still in flight");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;
    use catalog_settings::SettingsError;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn no_flags_leaves_settings_alone() {
        let cli = Cli::try_parse_from(["catalog-api"]).unwrap();
        let mut settings = CatalogSettings::default();
        cli.apply(&mut settings).unwrap();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3002);
        assert_eq!(settings.database.path, "./data/products.db");
    }

    #[test]
    fn flags_override_settings() {
        let cli = Cli::try_parse_from([
            "catalog-api",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--db-path",
            "/tmp/catalog.db",
        ])
        .unwrap();
        let mut settings = CatalogSettings::default();
        cli.apply(&mut settings).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.path, "/tmp/catalog.db");
    }

    #[test]
    fn settings_flag_parses_path() {
        let cli = Cli::try_parse_from(["catalog-api", "--settings", "conf/catalog.json"]).unwrap();
        assert_eq!(cli.settings, Some(PathBuf::from("conf/catalog.json")));
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(Cli::try_parse_from(["catalog-api", "--port", "70000"]).is_err());
    }

    #[test]
    fn overrides_are_revalidated() {
        let cli = Cli {
            host: None,
            port: None,
            db_path: Some(PathBuf::new()),
            settings: None,
        };
        let mut settings = CatalogSettings::default();
        assert!(matches!(
            cli.apply(&mut settings),
            Err(SettingsError::InvalidValue(_))
        ));
    }

    #[test]
    fn empty_db_path_flag_never_reaches_the_store() {
        let result = Cli::try_parse_from(["catalog-api", "--db-path", ""])
            .map_err(anyhow::Error::from)
            .and_then(|cli| {
                let mut settings = CatalogSettings::default();
                cli.apply(&mut settings)?;
                Ok(settings)
            });
        assert!(result.is_err());
    }

    #[test]
    fn rejected_env_values_are_logged_while_loading() {
        let dir = tempfile::tempdir().unwrap();
        let captured = Captured::default();
        let sink = captured.clone();

        let settings = load_settings(
            &dir.path().join("absent.json"),
            |name| (name == "CATALOG_PORT").then(|| "not-a-port".to_owned()),
            move || sink.clone(),
        )
        .unwrap();

        assert_eq!(settings.server.port, 3002);
        let output = captured.text();
        assert!(output.contains("invalid env var"), "got: {output}");
        assert!(output.contains("CATALOG_PORT"), "got: {output}");
    }
}
