//! DirView server — thin axum frontend over [`dirview_core::SnapshotStore`].
//!
//! Routes:
//! - `GET /api/list?path=` — shallow listing of one directory.
//! - `GET /api/search?query=&limit=` — bounded substring search.
//! - `GET /api/status` — summary of the snapshot being served.
//! - `/files/*` — the crawl root served as static files.
//! - `/app/*` — the optional web UI; `/` redirects there.

pub mod config;
pub mod error;
pub mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::{header, HeaderName, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use dirview_core::SnapshotStore;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

pub use config::ServerConfig;

/// Router for the `/api` routes, with CORS headers on every response.
pub fn api_router(store: Arc<SnapshotStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("access_token"),
        ]);

    Router::new()
        .route("/search", get(routes::search))
        .route("/list", get(routes::list))
        .route("/status", get(routes::status))
        .with_state(store)
        .layer(cors)
}

/// Full application router: API, static files and the optional UI.
pub fn app_router(store: Arc<SnapshotStore>, app_dir: Option<&Path>) -> Router {
    let files = ServeDir::new(store.root());

    let mut app = Router::new()
        .nest("/api", api_router(store))
        .nest_service("/files", files)
        .route("/", get(redirect_to_app));

    if let Some(dir) = app_dir {
        app = app.nest_service("/app", ServeDir::new(dir));
    }
    app
}

/// `302 Found` to the UI; axum's `Redirect` only offers 303, 307 and 308.
async fn redirect_to_app() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, "/app")])
}

/// A running HTTP server. Dropping it requests a graceful shutdown.
pub struct Server {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl Server {
    /// Bind `addr` and serve `app` on a background task.
    pub async fn start(addr: SocketAddr, app: Router) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            if let Err(err) = serve(listener, app, async move {
                let _ = shutdown_rx.await;
            })
            .await
            {
                tracing::error!("HTTP server stopped with error: {err}");
            }
        });

        info!("Listening on {addr}");
        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            task,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Request shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Serve `app` on `listener` until `signal` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, signal: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .await
}
