use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, ApiError};

const UNKNOWN_RESULT: &str = "unknown error";

/// Keep-alive loop for a single account. Runs until its token is cancelled;
/// a failed request never ends the loop, only the iteration that raised it.
pub struct AccountWorker {
    index: usize,
    api: ApiClient,
    token: String,
    interval: Duration,
    shutdown: CancellationToken,
}

impl AccountWorker {
    pub fn new(
        index: usize,
        api: ApiClient,
        token: String,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            index,
            api,
            token,
            interval,
            shutdown,
        }
    }

    fn account_number(&self) -> usize {
        self.index + 1
    }

    pub async fn run(self) {
        tokio::select! {
            biased;
            () = self.shutdown.cancelled() => {}
            () = self.fetch_user_info() => {}
        }

        // Fixed-delay scheduling: the interval is counted from the end of a
        // cycle, so slow cycles push later ones back.
        while !self.shutdown.is_cancelled() {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                () = self.cycle() => {}
            }
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::debug!("Account {} worker stopped", self.account_number());
    }

    /// One-time best-effort fetch of display fields.
    async fn fetch_user_info(&self) {
        match self.api.get_user_info(&self.token).await {
            Ok(info) => {
                let user = info.data;
                tracing::info!(
                    "Account {} info: email={} verified={} tier={} points={}",
                    self.account_number(),
                    user.email,
                    user.verified,
                    user.current_tier,
                    user.points_balance,
                );
            }
            Err(err) => self.log_failure("user info", &err),
        }
    }

    async fn cycle(&self) {
        let ping = match self.api.connect(&self.token).await {
            Ok(response) => response.message.unwrap_or_default(),
            Err(err) => {
                self.log_failure("connect", &err);
                UNKNOWN_RESULT.to_owned()
            }
        };
        tracing::info!("Account {} ping result: {ping}", self.account_number());

        let earnings = match self.api.get_earnings(&self.token).await {
            Ok(response) => response.data.map(|data| data.to_string()),
            Err(err) => {
                self.log_failure("earnings", &err);
                None
            }
        };
        tracing::info!(
            "Account {} earnings: {}",
            self.account_number(),
            earnings.as_deref().unwrap_or(UNKNOWN_RESULT),
        );
    }

    fn log_failure(&self, operation: &str, err: &ApiError) {
        tracing::error!("Account {}: {operation} failed: {err}", self.account_number());
    }
}
