use std::sync::Arc;

use anyhow::Context;

use intake_assist::actions::ActionRegistry;
use intake_assist::channels::CliChannel;
use intake_assist::config::AssistantConfig;
use intake_assist::conversation::ConversationSession;
use intake_assist::error::Error;
use intake_assist::rooms::RoomRegistry;
use intake_assist::{server, store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env loaded"),
    }

    let config = AssistantConfig::from_env().map_err(Error::from)?;
    let addr = config.socket_addr();

    eprintln!("🎙️  {} v{}", config.name, env!("CARGO_PKG_VERSION"));
    eprintln!("   Conversation WS: ws://{}/ws/conversation", addr);
    eprintln!("   Actions API: http://{}/api/actions", addr);

    // ── Profile store ────────────────────────────────────────────────────
    if config.is_in_memory() {
        eprintln!("   Database: in-memory (profiles are not persisted)");
    } else {
        eprintln!("   Database: {}", config.db_path.display());
    }
    let store = store::open(&config)
        .await
        .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;

    let registry = Arc::new(ActionRegistry::new(store));
    tracing::info!(
        assistant = %config.name,
        actions = registry.count(),
        "Action registry ready"
    );

    // ── HTTP / WebSocket server ──────────────────────────────────────────
    let app = server::app(Arc::clone(&registry), RoomRegistry::new());
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Conversation server started");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Conversation server stopped");
        }
    });

    // ── Foreground ───────────────────────────────────────────────────────
    if config.cli_enabled {
        eprintln!("   Type a message and press Enter. Ctrl-D to exit.\n");
        let outcome = ConversationSession::new(registry, Arc::new(CliChannel::new()))
            .with_label("cli")
            .run()
            .await?;
        tracing::info!(
            turns = outcome.turns_handled,
            phase = %outcome.final_phase,
            "CLI conversation finished"
        );
    } else {
        eprintln!("   CLI: disabled. Ctrl-C to stop.\n");
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for shutdown signal")?;
        tracing::info!("Shutting down");
    }

    Ok(())
}
