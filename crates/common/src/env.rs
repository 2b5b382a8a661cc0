//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

/// Ensure the data directory tree (photo storage included) exists.
pub async fn ensure_env(data_dir: &str, photo_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    tokio::fs::create_dir_all(photo_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {photo_dir}: {e}"))?;
    Ok(())
}
