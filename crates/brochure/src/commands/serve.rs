//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use super::build::{self, Overrides};

/// Pick the directory to serve, building the site into it first if asked.
///
/// Without `--dir` this is the output directory resolved from the config
/// file, the same one `brochure build` writes to.
fn prepare(config_path: &Path, dir: Option<PathBuf>, rebuild: bool) -> Result<PathBuf> {
    let overrides = Overrides {
        output: dir,
        ..Default::default()
    };

    let dir = if rebuild {
        build::run(config_path, overrides)?.output_dir
    } else {
        build::resolve_config(config_path, overrides)?.output_dir
    };

    if !dir.is_dir() {
        anyhow::bail!(
            "Directory not found: {}. Run 'brochure build' first.",
            dir.display()
        );
    }

    Ok(dir)
}

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>, rebuild: bool) -> Result<()> {
    let dir = prepare(config_path, dir, rebuild)?;

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    if let Err(e) = open::that(format!("http://{}", addr)) {
        tracing::debug!("Could not open browser: {}", e);
    }

    axum::serve(listener, app).await?;

    Ok(())
}
