use config::Config;
use constants::{ACCOUNTS_FILE_PATH, PROXIES_FILE_PATH, TOKENS_FILE_PATH};
use logger::init_default_logger;
use tokio_util::sync::CancellationToken;

mod account;
mod api;
mod config;
mod constants;
mod fleet;
mod logger;
mod onboarding;
mod proxy;
mod shutdown;
mod utils;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let _guard = init_default_logger();

    let config = Config::read_default().await;

    if let Some(onboarding_config) = &config.onboarding {
        let api = api::ApiClient::new(api::build_http_client(None)?);
        let onboarded = onboarding::run(
            &api,
            onboarding_config,
            ACCOUNTS_FILE_PATH,
            TOKENS_FILE_PATH,
        )
        .await?;
        if onboarded > 0 {
            tracing::info!("Onboarded {onboarded} new accounts");
        }
    }

    let cancel = CancellationToken::new();

    tokio::select! {
        result = fleet::run_all(&config, TOKENS_FILE_PATH, PROXIES_FILE_PATH, cancel.clone()) => result?,
        () = shutdown::wait_for_signal() => {
            tracing::warn!("Termination signal received, shutting down");
            cancel.cancel();
        }
    }

    Ok(())
}
