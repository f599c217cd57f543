use anyhow::Result;
use std::path::Path;
use typedroutes_core::TypedRoutesServer;

use super::load_config;

/// Start the server; command line flags override the configuration
pub async fn run(config: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut server = TypedRoutesServer::with_config(load_config(config)?);
    if let Some(host) = host {
        server = server.with_host(host);
    }
    if let Some(port) = port {
        server = server.with_port(port);
    }
    server.serve().await
}
