use std::process::ExitCode;
use std::sync::Arc;

use guildgate::access::AccessResolver;
use guildgate::config::Config;
use guildgate::http::{router, AppState};
use guildgate::oauth::{AuthClient, OAuthConfig, OUTBOUND_TIMEOUT};
use guildgate::session::MemorySessionStore;
use guildgate::signer::Signer;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // One connection pool shared by the OAuth and guild clients.
    let http = reqwest::Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .build()?;

    let oauth = OAuthConfig::new(
        config.client_id.clone(),
        config.client_secret.clone(),
        config.redirect_uri.clone(),
    );
    let auth = AuthClient::new(oauth).with_http_client(http.clone());
    let access = AccessResolver::new(config.guild.clone()).with_http_client(http);

    let state = AppState::new(
        auth,
        access,
        Arc::new(MemorySessionStore::new()),
        Signer::new(config.session_secret.as_bytes()),
        config.files_dir.clone(),
        config.secure_cookies,
    );

    let app = router(state, &config.public_dir);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "guildgate listening");
    axum::serve(listener, app).await?;
    Ok(())
}
