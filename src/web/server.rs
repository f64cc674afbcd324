//! Web server for Aula.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::db::Database;
use crate::upload::UploadStorage;
use crate::Result;

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server for the portal API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: AppState,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
    /// Whether to serve the static front-end bundle.
    serve_static: bool,
    /// Path to the static front-end bundle.
    static_path: String,
}

impl WebServer {
    /// Create a new web server from configuration and an open database.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| {
                crate::AulaError::Config(format!("invalid web server address: {e}"))
            })?;

        let uploads = UploadStorage::new(
            &config.uploads.public_dir,
            config.uploads.max_size_mb * 1024 * 1024,
        )?;

        let app_state = AppState::new(
            db,
            &config.session.secret,
            config.session.secure_cookies,
            config.session.ttl_days,
            uploads,
        );

        Ok(Self {
            addr,
            app_state,
            cors_origins: config.server.cors_origins.clone(),
            serve_static: config.server.serve_static,
            static_path: config.server.static_path.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> axum::Router {
        let uploads_dir = self.app_state.uploads.uploads_dir();

        let mut router = create_router(self.app_state.clone(), &self.cors_origins)
            .merge(create_health_router())
            // Uploaded files are public static content
            .nest_service("/uploads", ServeDir::new(uploads_dir));

        if self.serve_static {
            router = router.fallback_service(ServeDir::new(&self.static_path));
        }

        router
    }

    /// Run the web server until shutdown.
    pub async fn run(self) -> std::io::Result<()> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let router = self.build_router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
