//! HTTP client utilities
//!
//! Provides the shared reqwest::Client used for every DocBase call, honoring
//! system proxy env vars

use crate::error::AppError;
use reqwest::{Client, Proxy};
use url::Url;

/// Build the shared reqwest Client.
///
/// No request timeout is set here; per-call deadlines are applied by the
/// tool dispatcher.
///
/// Recognized env vars:
/// - HTTP_PROXY / http_proxy
/// - HTTPS_PROXY / https_proxy
/// - ALL_PROXY / all_proxy
/// - NO_PROXY / no_proxy
pub fn build_client() -> Result<Client, AppError> {
    let mut builder = Client::builder();

    let https_proxy = getenv_first(&["HTTPS_PROXY", "https_proxy"])
        .or_else(|| getenv_first(&["ALL_PROXY", "all_proxy"]));
    let http_proxy = getenv_first(&["HTTP_PROXY", "http_proxy"])
        .or_else(|| getenv_first(&["ALL_PROXY", "all_proxy"]));
    let no_proxy_rules = parse_no_proxy(&getenv_first(&["NO_PROXY", "no_proxy"]).unwrap_or_default());

    if https_proxy.is_some() || http_proxy.is_some() {
        let proxy = Proxy::custom(move |url: &Url| {
            let host = url.host_str().unwrap_or("");
            if should_bypass_proxy(host, &no_proxy_rules) {
                return None;
            }
            match url.scheme() {
                "https" => https_proxy.clone().or_else(|| http_proxy.clone()),
                "http" => http_proxy.clone().or_else(|| https_proxy.clone()),
                _ => None,
            }
        });
        builder = builder.proxy(proxy);
    }

    builder
        .user_agent(concat!("docbase-mcp/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

fn getenv_first(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq)]
enum NoProxyRule {
    Wildcard,
    Domain(String), // suffix match
    Exact(String),
}

fn parse_no_proxy(val: &str) -> Vec<NoProxyRule> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|token| {
            if token == "*" {
                return NoProxyRule::Wildcard;
            }
            if let Some(domain) = token.strip_prefix('.') {
                return NoProxyRule::Domain(domain.to_ascii_lowercase());
            }
            let t = token.to_ascii_lowercase();
            if t == "localhost" || t.parse::<std::net::IpAddr>().is_ok() {
                NoProxyRule::Exact(t)
            } else {
                NoProxyRule::Domain(t)
            }
        })
        .collect()
}

fn should_bypass_proxy(host: &str, rules: &[NoProxyRule]) -> bool {
    if host.is_empty() {
        return false;
    }
    let host = host.to_ascii_lowercase();
    if is_loopback(&host) {
        return true;
    }
    rules.iter().any(|rule| match rule {
        NoProxyRule::Wildcard => true,
        NoProxyRule::Exact(ex) => host == *ex,
        NoProxyRule::Domain(suffix) => {
            host == *suffix || host.ends_with(&format!(".{}", suffix))
        }
    })
}

fn is_loopback(host: &str) -> bool {
    host == "localhost"
        || host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<std::net::IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false)
}
