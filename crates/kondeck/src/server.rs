//! `Server` builder and accept loop.

use kondeck_protocol::JsonCodec;
use kondeck_session::{HubConfig, HubHandle, spawn_hub};
use kondeck_transport::{Transport, WebSocketTransport};

use crate::ServerError;
use crate::handler::handle_connection;

/// Builder for configuring and starting a kondeck server.
pub struct ServerBuilder {
    bind_addr: String,
    hub_config: HubConfig,
}

impl ServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            hub_config: HubConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Overrides the session hub configuration.
    pub fn hub_config(mut self, config: HubConfig) -> Self {
        self.hub_config = config;
        self
    }

    /// Binds the transport and spawns the session hub.
    pub async fn build(self) -> Result<Server, ServerError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let hub = spawn_hub(self.hub_config);
        Ok(Server {
            transport,
            hub,
            codec: JsonCodec,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running kondeck server.
pub struct Server {
    transport: WebSocketTransport,
    hub: HubHandle,
    codec: JsonCodec,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// The bound local address. Useful when binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop: one handler task per connection, for the life
    /// of the process.
    pub async fn run(mut self) -> Result<(), ServerError> {
        tracing::info!("kondeck server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let hub = self.hub.clone();
                    let codec = self.codec;
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, hub, codec).await
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
