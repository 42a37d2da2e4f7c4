// src/config.rs
// =============================================================================
// Runtime configuration.
//
// Everything comes from command-line flags, and clap fills in the ones left
// out from environment variables:
// - DOCKER_FIND_HUB_URL   -> where the Docker Hub API lives
// - DOCKER_FIND_NAMESPACE -> which namespace to look in ("library")
// - PAGER                 -> program used to show the interactive listing
//
// Keeping this in one struct means the HTTP client and the pager session
// never reach for globals; tests just build a Config pointing at a mock server.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use url::Url;

pub const DEFAULT_HUB_URL: &str = "https://hub.docker.com";
pub const DEFAULT_NAMESPACE: &str = "library";
pub const DEFAULT_PAGER: &str = "less";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the registry API (no trailing path)
    pub hub_url: Url,
    /// Repository namespace, "library" for official images
    pub namespace: String,
    /// Raw pager command line, e.g. "less -R"
    pub pager: String,
}

impl Config {
    pub fn new(hub_url: &str, namespace: &str, pager: Option<&str>) -> Result<Self> {
        let hub_url = Url::parse(hub_url)
            .with_context(|| format!("invalid hub URL '{}'", hub_url))?;

        if hub_url.cannot_be_a_base() {
            return Err(anyhow!("hub URL '{}' cannot be used as a base URL", hub_url));
        }

        let namespace = namespace.trim_matches('/');
        if namespace.is_empty() {
            return Err(anyhow!("namespace must not be empty"));
        }

        Ok(Config {
            hub_url,
            namespace: namespace.to_string(),
            pager: pager.unwrap_or(DEFAULT_PAGER).to_string(),
        })
    }

    // Splits the pager command line into (program, args)
    //
    // An empty PAGER (e.g. `PAGER= docker-find ...`) falls back to less
    pub fn pager_command(&self) -> (String, Vec<String>) {
        let mut words = self.pager.split_whitespace();
        match words.next() {
            Some(program) => (program.to_string(), words.map(str::to_string).collect()),
            None => (DEFAULT_PAGER.to_string(), Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pager_command_with_args() {
        let config = Config::new(DEFAULT_HUB_URL, "library", Some("less -R -S")).unwrap();
        let (program, args) = config.pager_command();
        assert_eq!(program, "less");
        assert_eq!(args, vec!["-R", "-S"]);
    }

    #[test]
    fn test_empty_pager_falls_back_to_less() {
        let config = Config::new(DEFAULT_HUB_URL, "library", Some("   ")).unwrap();
        assert_eq!(config.pager_command(), ("less".to_string(), vec![]));

        let config = Config::new(DEFAULT_HUB_URL, "library", None).unwrap();
        assert_eq!(config.pager_command().0, "less");
    }

    #[test]
    fn test_rejects_bad_hub_url() {
        assert!(Config::new("not a url", "library", None).is_err());
        assert!(Config::new("mailto:someone@example.com", "library", None).is_err());
    }

    #[test]
    fn test_namespace_is_trimmed() {
        let config = Config::new(DEFAULT_HUB_URL, "/bitnami/", None).unwrap();
        assert_eq!(config.namespace, "bitnami");
        assert!(Config::new(DEFAULT_HUB_URL, "/", None).is_err());
    }
}
