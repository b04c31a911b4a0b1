use serde::Deserialize;
use std::path::Path;

const CONFIG_FILE_PATH: &str = "data/config.toml";

fn default_spawn_task_delay() -> u64 {
    100
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Config {
    /// Milliseconds to wait between spawning consecutive account workers.
    #[serde(default = "default_spawn_task_delay")]
    pub spawn_task_delay: u64,
    pub onboarding: Option<OnboardingConfig>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OnboardingConfig {
    pub referral_code: Option<String>,
    /// Forwarded verbatim as the profile-creation request body.
    pub profile: Option<toml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spawn_task_delay: default_spawn_task_delay(),
            onboarding: None,
        }
    }
}

impl Config {
    async fn read_from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let cfg_str = tokio::fs::read_to_string(path).await?;
        Ok(toml::from_str(&cfg_str)?)
    }

    pub async fn read_default() -> Self {
        match Self::read_from_file(CONFIG_FILE_PATH).await {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Could not read {CONFIG_FILE_PATH} ({err}), using defaults");
                Self::default()
            }
        }
    }
}
