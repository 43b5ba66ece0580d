use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::content::ContentSources;
use crate::http::connection::Connection;
use crate::http::request::ServerInfo;

pub async fn run(cfg: &Config, sources: ContentSources) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on {}", cfg.listen_addr);

    serve(listener, cfg.root.clone(), sources).await
}

/// Accepts connections on an already-bound listener, one task each.
pub async fn serve(
    listener: TcpListener,
    root: PathBuf,
    sources: ContentSources,
) -> anyhow::Result<()> {
    let server = ServerInfo {
        port: listener.local_addr()?.port(),
        root,
    };

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let server = server.clone();
        let sources = sources.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, server, sources);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
