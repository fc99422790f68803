use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;
use tracing::debug;

/// Creates an initial `config.json` file at `config_path` with default settings, pointing at the
/// `invoice` and `statement` locations. The parent directory is created if needed.
///
/// # Arguments
/// - `config_path` - Where to write the config, e.g. `$HOME/.expenses/config.json`
/// - `invoice` - A CSV path or an http(s) URL for the card invoice history
/// - `statement` - A CSV path or an http(s) URL for the account statement history
///
/// # Errors
/// - Returns a `Config` error if any file operations fail or a location is empty.
pub async fn init(config_path: &Path, invoice: &str, statement: &str) -> Result<Out<()>> {
    let config = Config::create(config_path, invoice, statement).await?;
    debug!(
        "Invoice at {}, statement at {}",
        config.invoice(),
        config.statement()
    );
    Ok(format!("Created the config file at {}", config.path().display()).into())
}
