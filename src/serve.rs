use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{config::ServeArgs, routes};

/// `/health` plus every file under `dir`; directories resolve to their
/// `index.html`.
pub fn router(dir: &Path) -> Router {
    Router::new()
        .route("/health", get(routes::health::handler))
        .fallback_service(ServeDir::new(dir))
        // The page fetches its hint files; allow any local origin to do the same.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    if !args.dir.is_dir() {
        anyhow::bail!("{} is not a directory; run `build` first", args.dir.display());
    }

    let addr: SocketAddr = args.addr().parse().context("Invalid bind address")?;
    let app = router(&args.dir);

    tracing::info!("Serving {} on http://{}", args.dir.display(), addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping");
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn(dir: &Path) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(dir);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_serves_page_and_health() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Puzzle</h1>").unwrap();
        std::fs::write(dir.path().join("hints.json"), "{}").unwrap();
        let base = spawn(dir.path()).await;

        let page = reqwest::get(format!("{base}/")).await.unwrap();
        assert!(page.status().is_success());
        assert_eq!(page.text().await.unwrap(), "<h1>Puzzle</h1>");

        let hints = reqwest::get(format!("{base}/hints.json")).await.unwrap();
        assert_eq!(hints.text().await.unwrap(), "{}");

        let health: serde_json::Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["ok"], true);
        assert_eq!(health["service"], "crossword-press");

        let missing = reqwest::get(format!("{base}/nope.json")).await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
