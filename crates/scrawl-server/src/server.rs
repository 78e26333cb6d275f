//! The websocket accept loop.

use scrawl_room::Registry;
use tokio::net::TcpListener;

use crate::ServerError;
use crate::handler::handle_connection;

/// A running Scrawl server: a bound listener plus the registry every
/// connection dispatches into.
pub struct ScrawlServer {
    listener: TcpListener,
    registry: Registry,
}

impl ScrawlServer {
    /// Binds a listener on `addr`.
    ///
    /// # Errors
    /// Returns the bind failure, e.g. when the port is taken.
    pub async fn bind(addr: &str, registry: Registry) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr, "listening");
        Ok(Self { listener, registry })
    }

    /// The locally bound address (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the process ends, one handler task per
    /// connection.
    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    tracing::debug!(%addr, "connection accepted");
                    let registry = self.registry.clone();
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(stream, registry).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
