//! Web server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::content::ContentService;
use crate::{Result, SiteError};

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the site API and uploaded images.
pub struct WebServer {
    addr: SocketAddr,
    app_state: Arc<AppState>,
    cors_origins: Vec<String>,
    sweep_interval: Duration,
}

impl WebServer {
    /// Create a new web server over the given content service.
    pub fn new(config: &Config, content: ContentService) -> Result<Self> {
        let addr = format!("{}:{}", config.web.host, config.web.port)
            .parse()
            .map_err(|e| SiteError::Config(format!("invalid web server address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(content, config)),
            cors_origins: config.web.cors_origins.clone(),
            sweep_interval: Duration::from_secs(config.uploads.sweep_interval_secs.max(1)),
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shared handler state.
    pub fn state(&self) -> Arc<AppState> {
        self.app_state.clone()
    }

    /// Start the maintenance task.
    ///
    /// Each tick sweeps expired staged uploads, drops expired admin sessions
    /// and forgets idle rate-limit entries. The first immediate tick is
    /// skipped; failures are logged and the loop keeps going.
    fn start_maintenance_task(state: Arc<AppState>, every: Duration) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.tick().await;

            loop {
                interval.tick().await;

                match state.uploads().sweep().await {
                    Ok(count) if count > 0 => {
                        tracing::info!(deleted_count = count, "Swept expired staged uploads");
                    }
                    Ok(_) => tracing::debug!("No expired staged uploads to sweep"),
                    Err(e) => tracing::warn!(error = %e, "Failed to sweep staged uploads"),
                }

                let purged = state.auth.sessions().purge_expired().await;
                if purged > 0 {
                    tracing::info!(purged, "Purged expired admin sessions");
                }

                state.login_limiter.cleanup();
            }
        });
    }

    async fn bind(self) -> Result<(TcpListener, axum::Router, SocketAddr)> {
        let router = create_router(self.app_state.clone(), &self.cors_origins)
            .layer(CompressionLayer::new());

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        Self::start_maintenance_task(self.app_state, self.sweep_interval);
        tracing::info!(
            interval_secs = self.sweep_interval.as_secs(),
            "Upload sweeper started"
        );
        tracing::info!("Web server listening on http://{}", local_addr);

        Ok((listener, router, local_addr))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let (listener, router, _) = self.bind().await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }

    /// Run the server in the background and return the bound address.
    ///
    /// Useful for tests that bind to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::UploadStore;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.web.host = "127.0.0.1".to_string();
        config.web.port = 0;
        config.uploads.public_root = dir.path().to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let content = ContentService::in_memory(UploadStore::from_config(&config.uploads));

        let server = WebServer::new(&config, content).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
        assert_eq!(server.sweep_interval, Duration::from_secs(900));
    }

    #[tokio::test]
    async fn test_web_server_rejects_bad_host() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.web.host = "not a host".to_string();
        let content = ContentService::in_memory(UploadStore::from_config(&config.uploads));

        assert!(matches!(
            WebServer::new(&config, content),
            Err(SiteError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_web_server_run() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let content = ContentService::in_memory(UploadStore::from_config(&config.uploads));

        let server = WebServer::new(&config, content).unwrap();
        let addr = server.run_with_addr().await.unwrap();
        assert_ne!(addr.port(), 0);

        let stream = tokio::net::TcpStream::connect(addr).await;
        assert!(stream.is_ok());
    }
}
