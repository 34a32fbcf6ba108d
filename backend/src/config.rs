//! Server configuration read from the environment.
//!
//! | variable                  | default                         |
//! |---------------------------|---------------------------------|
//! | `ROSTER_HOST`             | `127.0.0.1`                     |
//! | `ROSTER_PORT`             | `8080`                          |
//! | `ROSTER_OPEN_BROWSER`     | `true`                          |
//! | `ROSTER_MAX_UPLOAD_BYTES` | `10485760` (10 MB)              |
//! | `ROSTER_INVITE_BASE_URL`  | `http://{host}:{port}/invite`   |
//! | `ROSTER_PROGRAMMES`       | `CS,SE,IS,DS`                   |
//! | `ROSTER_KNOWN_ACCOUNTS`   | empty                           |
//!
//! List values are comma separated. Values that fail to parse fall back to the
//! default and are logged.

use log::warn;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_PROGRAMMES: &str = "CS,SE,IS,DS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
    pub max_upload_bytes: usize,
    /// Invite links are `{invite_base_url}/{uuid}`.
    pub invite_base_url: String,
    /// Controlled vocabulary for single invites. CSV rows are not checked against it.
    pub programmes: Vec<String>,
    /// Emails that already have an account and are enrolled without an invite.
    pub known_accounts: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("ROSTER_HOST")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("ROSTER_PORT", lookup("ROSTER_PORT"), DEFAULT_PORT);
        let open_browser = parse_or("ROSTER_OPEN_BROWSER", lookup("ROSTER_OPEN_BROWSER"), true);
        let max_upload_bytes = parse_or(
            "ROSTER_MAX_UPLOAD_BYTES",
            lookup("ROSTER_MAX_UPLOAD_BYTES"),
            DEFAULT_MAX_UPLOAD_BYTES,
        );
        let invite_base_url = lookup("ROSTER_INVITE_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("http://{}:{}/invite", host, port));
        let programmes =
            split_list(&lookup("ROSTER_PROGRAMMES").unwrap_or_else(|| DEFAULT_PROGRAMMES.into()));
        let known_accounts = split_list(&lookup("ROSTER_KNOWN_ACCOUNTS").unwrap_or_default());

        Self {
            host,
            port,
            open_browser,
            max_upload_bytes,
            invite_base_url,
            programmes,
            known_accounts,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using the default", key, raw);
            default
        }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.url(), "http://127.0.0.1:8080");
        assert_eq!(config.invite_base_url, "http://127.0.0.1:8080/invite");
        assert_eq!(config.programmes, vec!["CS", "SE", "IS", "DS"]);
        assert!(config.known_accounts.is_empty());
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn reads_overrides_and_ignores_bad_numbers() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ROSTER_PORT", "not-a-port"),
            ("ROSTER_OPEN_BROWSER", "false"),
            ("ROSTER_INVITE_BASE_URL", "https://lms.example.edu/join/"),
            ("ROSTER_PROGRAMMES", " Computing , Law,,"),
            ("ROSTER_KNOWN_ACCOUNTS", "a@b.com"),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 8080);
        assert!(!config.open_browser);
        assert_eq!(config.invite_base_url, "https://lms.example.edu/join");
        assert_eq!(config.programmes, vec!["Computing", "Law"]);
        assert_eq!(config.known_accounts, vec!["a@b.com"]);
    }
}
