//! Binary entry point: resolve the data directory, start logging, open the
//! store, seed the catalog on first run and drive the Ratatui loop.
use amazonia_viva::{init_logging, run_app, App, AppConfig, Catalog};
use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(&config)?;
    info!(data_dir = %config.data_dir().display(), "starting");

    let mut catalog = Catalog::open(&config.db_path())
        .with_context(|| format!("failed to open {}", config.db_path().display()))?;
    catalog.ensure_seeded().context("failed to seed the catalog")?;

    let mut app = App::new(catalog, config.export_dir())?;
    let result = run_app(&mut app);

    app.into_catalog()
        .close()
        .context("failed to close the store")?;
    result
}
