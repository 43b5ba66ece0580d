use std::sync::Arc;
use std::time::{Duration, SystemTime};

use sar::config::Config;
use sar::content::controllers::ActionRegistry;
use sar::content::debug;
use sar::content::error_page::ErrorPage;
use sar::content::files::FileSystem;
use sar::content::pdf::HttpPdfRenderer;
use sar::content::ContentSources;
use sar::pipeline::resolver::{DEBUG_ACTION, DEBUG_CONTROLLER};
use sar::server;
use sar::session::SessionStore;

const SESSION_SWEEP: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let sessions = SessionStore::new();

    let sessions_for_info = sessions.clone();
    let controllers = ActionRegistry::new().action(DEBUG_CONTROLLER, DEBUG_ACTION, move |req| {
        Ok(debug::info_page(req, &sessions_for_info))
    });

    let sources = ContentSources::new(
        Arc::new(controllers),
        Arc::new(FileSystem),
        Arc::new(ErrorPage),
        Arc::new(HttpPdfRenderer::new(cfg.pdf_timeout())),
    );

    let sweeper = sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP);
        loop {
            ticker.tick().await;
            sweeper.remove_expired(SystemTime::now());
        }
    });

    tracing::info!(root = %cfg.root.display(), "Serving static content");

    tokio::select! {
        res = server::listener::run(&cfg, sources) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!(sessions = sessions.len(), "Shutdown signal received");
        }
    }

    Ok(())
}
