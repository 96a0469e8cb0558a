//! Process configuration
//!
//! Read once at the process boundary and handed to the client constructor.

use crate::cli::ConnectionArgs;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub domain: String,
    pub api_token: String,
    pub tool_timeout: Duration,
}

impl Config {
    pub fn from_args(args: &ConnectionArgs) -> Self {
        Self {
            domain: args.domain.trim().to_string(),
            api_token: args.token.trim().to_string(),
            tool_timeout: Duration::from_secs(args.timeout.max(1)),
        }
    }

    /// Missing values are not fatal; DocBase rejects the first call instead
    pub fn warn_if_incomplete(&self) {
        if self.domain.is_empty() {
            warn!("DOCBASE_API_DOMAIN is not set; requests will fail");
        }
        if self.api_token.is_empty() {
            warn!("DOCBASE_API_TOKEN is not set; requests will be rejected");
        }
    }
}
