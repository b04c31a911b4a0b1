use std::{path::Path, time::Duration};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    account::AccountWorker,
    api::{build_http_client, ApiClient},
    config::Config,
    constants::PING_INTERVAL,
    proxy,
    utils::read_file_lines,
};

/// Spawns one worker per token and blocks until shutdown is requested and
/// every worker has wound down. Returns early only on a startup failure.
pub async fn run_all(
    config: &Config,
    tokens_path: impl AsRef<Path>,
    proxies_path: impl AsRef<Path>,
    shutdown: CancellationToken,
) -> eyre::Result<()> {
    let tokens = read_file_lines(tokens_path.as_ref()).await;
    if tokens.is_empty() {
        eyre::bail!("No tokens found in {}", tokens_path.as_ref().display());
    }

    let proxies = read_file_lines(proxies_path.as_ref()).await;
    if proxies.is_empty() {
        tracing::warn!("No proxies configured, all accounts will connect directly");
    }

    tracing::info!("Processing {} accounts", tokens.len());

    // Workers without a proxy share this client; proxied workers get their
    // own, since reqwest installs proxies per client.
    let shared_client = build_http_client(None)?;
    let mut handles = JoinSet::new();

    for (index, token) in tokens.into_iter().enumerate() {
        tokio::time::sleep(Duration::from_millis(config.spawn_task_delay)).await;

        let assignment = proxy::assign(&proxies, index);
        if let Some(url) = assignment.url() {
            tracing::info!("Account {} using proxy {url}", index + 1);
        }

        let client = match assignment.to_reqwest() {
            Some(proxy) => build_http_client(Some(proxy)).unwrap_or_else(|err| {
                tracing::warn!(
                    "Account {}: proxy client failed ({err}), connecting directly",
                    index + 1
                );
                shared_client.clone()
            }),
            None => shared_client.clone(),
        };

        let worker = AccountWorker::new(
            index,
            ApiClient::new(client),
            token,
            PING_INTERVAL,
            shutdown.child_token(),
        );
        handles.spawn(worker.run());
    }

    while let Some(result) = handles.join_next().await {
        if let Err(err) = result {
            tracing::error!("Account task failed: {err}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            spawn_task_delay: 0,
            onboarding: None,
        }
    }

    #[tokio::test]
    async fn missing_token_file_halts_startup() {
        let dir = tempfile::tempdir().expect("Temp dir to be creatable");

        let result = run_all(
            &test_config(),
            dir.path().join("tokens.txt"),
            dir.path().join("proxy.txt"),
            CancellationToken::new(),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn blank_token_file_halts_startup() {
        let dir = tempfile::tempdir().expect("Temp dir to be creatable");
        let tokens_path = dir.path().join("tokens.txt");
        tokio::fs::write(&tokens_path, "\n   \n\t\n")
            .await
            .expect("File to be writable");

        let result = run_all(
            &test_config(),
            &tokens_path,
            dir.path().join("proxy.txt"),
            CancellationToken::new(),
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn workers_wind_down_after_cancellation() {
        let dir = tempfile::tempdir().expect("Temp dir to be creatable");
        let tokens_path = dir.path().join("tokens.txt");
        tokio::fs::write(&tokens_path, "tok-a\ntok-b\ntok-c\n")
            .await
            .expect("File to be writable");

        // Cancelling up front means every worker stops before its first
        // request, so the supervisor returns without touching the network.
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            run_all(
                &test_config(),
                &tokens_path,
                dir.path().join("proxy.txt"),
                shutdown,
            ),
        )
        .await
        .expect("Supervisor to return promptly");

        assert!(result.is_ok());
    }
}
