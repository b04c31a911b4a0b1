use std::path::Path;

use crate::{
    api::ApiClient,
    config::OnboardingConfig,
    utils::{append_line, read_file_lines},
};

/// Registers and logs in every `email:password` pair from `accounts_path`,
/// appending the obtained bearer tokens to `tokens_path`. Individual account
/// failures are logged and skipped. Returns the number of onboarded accounts.
pub async fn run(
    api: &ApiClient,
    config: &OnboardingConfig,
    accounts_path: impl AsRef<Path>,
    tokens_path: impl AsRef<Path>,
) -> eyre::Result<usize> {
    let accounts = read_file_lines(accounts_path.as_ref()).await;
    if accounts.is_empty() {
        tracing::info!(
            "No accounts to onboard in {}",
            accounts_path.as_ref().display()
        );
        return Ok(0);
    }

    let mut onboarded = 0;
    for line in &accounts {
        let Some((email, password)) = line.split_once(':') else {
            tracing::warn!("Skipping malformed account line (expected email:password)");
            continue;
        };

        match onboard_account(api, config, email, password).await {
            Ok(token) => {
                append_line(tokens_path.as_ref(), &token).await?;
                onboarded += 1;
                tracing::info!("Onboarded {email}");
            }
            Err(err) => tracing::error!("Onboarding {email} failed: {err}"),
        }
    }

    Ok(onboarded)
}

async fn onboard_account(
    api: &ApiClient,
    config: &OnboardingConfig,
    email: &str,
    password: &str,
) -> eyre::Result<String> {
    // Registration may already have happened on an earlier run.
    match api.register(email, password).await {
        Ok(response) => tracing::info!(
            "Registered {email}: {}",
            response.message.unwrap_or_default()
        ),
        Err(err) => tracing::warn!("Registration for {email}: {err}"),
    }

    let auth = api.login(email, password).await?;
    let token = auth
        .data
        .map(|data| data.token)
        .ok_or_else(|| eyre::eyre!("Login response for {email} carried no token"))?;

    if let Some(profile) = &config.profile {
        let payload = serde_json::to_value(profile)?;
        match api.create_profile(&token, &payload).await {
            Ok(response) => tracing::info!(
                "Profile created for {email}: {}",
                response.message.unwrap_or_default()
            ),
            Err(err) => tracing::warn!("Profile creation for {email}: {err}"),
        }
    }

    if let Some(code) = &config.referral_code {
        match api.confirm_referral(&token, code).await {
            Ok(response) => tracing::info!(
                "Referral confirmed for {email}: {}",
                response.message.unwrap_or_default()
            ),
            Err(err) => tracing::warn!("Referral confirmation for {email}: {err}"),
        }
    }

    Ok(token)
}
