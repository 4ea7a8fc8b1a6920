//! Startup helpers for the chat application.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::chat::{ChatApp, ChatConfig, ChatResult};

/// Initialize tracing once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .try_init();
}

/// Run the launcher binary.
///
/// # Returns
/// `ExitCode::SUCCESS` once the app is up, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();
    tracing::info!("Starting chatroom v{}", env!("CARGO_PKG_VERSION"));

    let config = match ChatConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(bootstrap(config)) {
        tracing::error!("Startup failed: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Open the app from `config` and log what was restored.
///
/// # Errors
/// Returns an error if the configuration is invalid or storage cannot be opened.
pub async fn bootstrap(config: ChatConfig) -> ChatResult<ChatApp> {
    let app = ChatApp::open(config)?;

    {
        let chat = app.chat();
        let chat = chat.lock().await;
        tracing::info!(rooms = chat.room_count(), "Chat state ready");
        for room in chat.rooms() {
            tracing::debug!(
                room = %room.id,
                title = %room.title,
                messages = chat.room_messages(&room.id).len(),
                "Room restored"
            );
        }
    }

    let authenticated = app.session().lock().await.is_authenticated();
    let dark = app.theme().lock().await.is_dark();
    tracing::info!(authenticated, dark, "Session restored");

    Ok(app)
}
