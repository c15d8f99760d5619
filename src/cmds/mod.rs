use clap::Args as ClapArgs;
use std::time::Duration;

use crate::api::ServerConfig;

pub mod list_releases;

/// Connection options shared by every command that talks to the server.
#[derive(Debug, ClapArgs)]
pub struct ServerArgs {
    /// Base URL of the Octopus server, e.g. `https://octopus.example.com`.
    #[arg(long, value_name = "URL", env = "OCTOPUS_URL")]
    pub server: String,

    /// API key to authenticate with.
    #[arg(long, env = "OCTOPUS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Id of the space to query, e.g. `Spaces-1`. Uses the default space if unset.
    #[arg(long, env = "OCTOPUS_SPACE")]
    pub space: Option<String>,

    /// Timeout in seconds for each request to the server.
    #[arg(long, value_name = "SECONDS", default_value_t = 600, env = "OCTOPUS_TIMEOUT")]
    pub timeout: u64,
}

impl ServerArgs {
    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            server: self.server.clone(),
            api_key: self.api_key.clone(),
            space: self.space.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
