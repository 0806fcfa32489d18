//! Optional status endpoint: `GET /` answers with the bot's username.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::State, routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

fn app(username: String) -> Router {
    Router::new()
        .route("/", get(bot_name))
        .with_state(Arc::new(username))
}

async fn bot_name(State(username): State<Arc<String>>) -> String {
    username.as_str().to_string()
}

pub async fn serve(bind: SocketAddr, username: String) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind web endpoint to {}", bind))?;
    serve_on(listener, username).await
}

async fn serve_on(listener: TcpListener, username: String) -> Result<()> {
    info!("Web endpoint listening on {}", listener.local_addr()?);
    axum::serve(listener, app(username))
        .await
        .context("Web endpoint stopped")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn(username: &str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_on(listener, username.to_string()));
        addr
    }

    #[tokio::test]
    async fn test_root_returns_username() {
        let addr = spawn("basil_bot").await;
        let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "basil_bot");
    }

    #[tokio::test]
    async fn test_other_routes_and_verbs_rejected() {
        let addr = spawn("basil_bot").await;
        let missing = reqwest::get(format!("http://{}/status", addr)).await.unwrap();
        assert_eq!(missing.status(), 404);

        let post = reqwest::Client::new()
            .post(format!("http://{}/", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(post.status(), 405);
    }
}
