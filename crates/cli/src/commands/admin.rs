//! Admin-side commands: dashboard figures and backups.
//!
//! # Environment Variables
//!
//! - `ECOBLOOM_DATA_DIR` - Store directory (default: ./data)
//! - `ECOBLOOM_ADMIN_USERNAME`, `ECOBLOOM_ADMIN_PASSWORD` - Required by `import`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ecobloom_admin::{AdminConfig, AdminContext};
use ecobloom_catalog::LogSurface;
use ecobloom_core::SystemClock;
use secrecy::ExposeSecret;
use tracing::info;

use super::{CommandError, open_store};

fn start(
    data_dir: Option<PathBuf>,
) -> Result<(AdminConfig, AdminContext<LogSurface>), CommandError> {
    let config = AdminConfig::from_env()?;
    let store = open_store(data_dir, config.data_dir.clone())?;
    let context = AdminContext::start(store.context(), Arc::new(SystemClock), &config, LogSurface);
    Ok((config, context))
}

/// Log the dashboard figures.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or measured.
pub fn stats(data_dir: Option<PathBuf>) -> Result<(), CommandError> {
    let (_, context) = start(data_dir)?;
    let stats = context.stats()?;
    info!(
        products = stats.products,
        categories = stats.categories,
        reviews = stats.reviews,
        storage_mb = %stats.storage_mb(),
        "Dashboard"
    );
    Ok(())
}

/// Write a backup document.
///
/// `output` may name a file, or an existing directory to place the default
/// file name in. Without it the default file name is used in the current
/// directory.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the file cannot be
/// written.
pub async fn export(data_dir: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), CommandError> {
    let (_, mut context) = start(data_dir)?;
    let document = context.export()?;

    let path = match output {
        Some(dir) if dir.is_dir() => dir.join(&document.file_name),
        Some(file) => file,
        None => PathBuf::from(&document.file_name),
    };
    tokio::fs::write(&path, document.json.as_bytes())
        .await
        .map_err(|source| CommandError::WriteFile {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), "Backup written");
    Ok(())
}

/// Log in with the configured credentials and restore a backup document.
///
/// # Errors
///
/// Returns an error if credentials are missing or wrong, the file cannot be
/// read, or the document is malformed.
pub async fn import(data_dir: Option<PathBuf>, file: &Path) -> Result<(), CommandError> {
    let (config, mut context) = start(data_dir)?;
    let credentials = config.require_credentials()?;
    context.login(&credentials.username, credentials.password.expose_secret())?;

    let json = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| CommandError::ReadFile {
            path: file.to_path_buf(),
            source,
        })?;
    let summary = context.import(&json)?;
    context.logout();

    info!(
        products = ?summary.products,
        categories = ?summary.categories,
        reviews = ?summary.reviews,
        "Backup restored"
    );
    Ok(())
}
