use crate::CORS_ALLOW_HEADERS;
use crate::api::DEFAULT_IDENTITY_HEADER;
use crate::token::MIN_SECRET_LEN;
use anyhow::{anyhow, bail};
use axum::http::HeaderName;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Secret used only when `allow_dev_secret` is set. Never for production.
pub const DEV_SECRET: &[u8] = b"secure-media-development-secret-do-not-deploy";

/// Main configuration structure that can be loaded from CLI, config file, or environment
///
/// Example configuration file content
/// # Secure Media Configuration
///
/// listen_on_port = 32145
/// content_root = "/srv/media"
/// token_ttl_secs = 120
/// identity_header = "x-authenticated-user"
///
/// # At least 32 bytes. Prefer MEDIA_TOKEN_SECRET over writing it here.
/// token_secret = "..."
#[derive(Clone, Serialize, Deserialize, Parser)]
#[serde(default)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, env = "MEDIA_LISTEN_PORT", default_value_t = 32145)]
    #[serde(default = "default_port")]
    pub listen_on_port: u16,

    /// Root directory of the content store
    #[arg(short = 'r', long, env = "MEDIA_CONTENT_ROOT", default_value = "./content")]
    #[serde(default = "default_content_root")]
    pub content_root: String,

    /// Shared HMAC secret for media tokens (at least 32 bytes)
    #[arg(long, env = "MEDIA_TOKEN_SECRET", hide_env_values = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,

    /// Token lifetime in seconds
    #[arg(short = 't', long, env = "MEDIA_TOKEN_TTL_SECS", default_value_t = 120)]
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Request header carrying the authenticated caller identity.
    ///
    /// Trusted as-is. The identity proxy in front of this service must strip
    /// any client-supplied copy of it.
    #[arg(long, env = "MEDIA_IDENTITY_HEADER", default_value = DEFAULT_IDENTITY_HEADER)]
    #[serde(default = "default_identity_header")]
    pub identity_header: String,

    /// Fall back to a built-in development secret when none is configured
    #[arg(long)]
    pub allow_dev_secret: bool,

    /// Configuration file path
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen_on_port", &self.listen_on_port)
            .field("content_root", &self.content_root)
            .field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("identity_header", &self.identity_header)
            .field("allow_dev_secret", &self.allow_dev_secret)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_on_port: default_port(),
            content_root: default_content_root(),
            token_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            identity_header: default_identity_header(),
            allow_dev_secret: false,
            config: None,
        }
    }
}

impl Config {
    /// Load configuration from CLI args and environment, optionally merging with a config file
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Config::parse();

        if let Some(config_path) = &config.config {
            let file_config = Self::from_file(Path::new(config_path))?;
            config = config.merge_with_file(file_config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge with file config, CLI args take precedence
    fn merge_with_file(mut self, file_config: Config) -> Self {
        // If CLI value is default, use file value
        if self.listen_on_port == default_port() {
            self.listen_on_port = file_config.listen_on_port;
        }
        if self.content_root == default_content_root() {
            self.content_root = file_config.content_root;
        }
        if self.token_ttl_secs == default_token_ttl_secs() {
            self.token_ttl_secs = file_config.token_ttl_secs;
        }
        if self.identity_header == default_identity_header() {
            self.identity_header = file_config.identity_header;
        }
        if !self.allow_dev_secret {
            self.allow_dev_secret = file_config.allow_dev_secret;
        }

        if self.token_secret.is_none() {
            self.token_secret = file_config.token_secret;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        match &self.token_secret {
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                bail!(
                    "Token secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                    secret.len()
                );
            }
            Some(_) => {}
            None if self.allow_dev_secret => {}
            None => {
                bail!("Token secret is required. Set MEDIA_TOKEN_SECRET or --token-secret");
            }
        }

        if self.token_ttl_secs == 0 {
            bail!("Token TTL must be greater than zero");
        }

        let identity_header = self.identity_header_name()?;
        if CORS_ALLOW_HEADERS.contains(&identity_header) {
            bail!("Identity header '{identity_header}' collides with a standard request header");
        }

        if self.content_root.is_empty() {
            bail!("Content root cannot be empty");
        }

        Ok(())
    }

    /// Effective signing secret, falling back to [`DEV_SECRET`] only when allowed
    pub fn signing_secret(&self) -> anyhow::Result<&[u8]> {
        match &self.token_secret {
            Some(secret) => Ok(secret.as_bytes()),
            None if self.allow_dev_secret => Ok(DEV_SECRET),
            None => Err(anyhow!("Token secret is not configured")),
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.token_secret.is_none() && self.allow_dev_secret
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn identity_header_name(&self) -> anyhow::Result<HeaderName> {
        HeaderName::from_bytes(self.identity_header.to_ascii_lowercase().as_bytes()).map_err(
            |error| anyhow!("Invalid identity header '{}': {error}", self.identity_header),
        )
    }
}

// Default value functions
fn default_port() -> u16 {
    32145
}

fn default_content_root() -> String {
    "./content".to_string()
}

fn default_token_ttl_secs() -> u64 {
    120
}

fn default_identity_header() -> String {
    DEFAULT_IDENTITY_HEADER.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_args_from_cli() {
        let cli_content = [
            "CLI",
            "--listen-on-port",
            "8080",
            "--content-root",
            "/srv/media",
            "--token-secret",
            SECRET,
            "--token-ttl-secs",
            "300",
            "--identity-header",
            "X-User",
        ];

        let config = Config::try_parse_from(cli_content).unwrap();

        assert_eq!(config.listen_on_port, 8080);
        assert_eq!(config.content_root, "/srv/media");
        assert_eq!(config.token_secret.as_deref(), Some(SECRET));
        assert_eq!(config.token_ttl(), Duration::from_secs(300));
        assert_eq!(config.identity_header_name().unwrap(), "x-user");
        assert!(!config.allow_dev_secret);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = format!(
            r#"
            listen_on_port = 9000
            content_root = "/tmp/content"
            token_secret = "{SECRET}"
        "#
        );

        let config: Config = toml::from_str(&toml_content).unwrap();

        assert_eq!(config.listen_on_port, 9000);
        assert_eq!(config.content_root, "/tmp/content");
        assert_eq!(config.token_ttl_secs, 120);
        assert_eq!(config.identity_header, DEFAULT_IDENTITY_HEADER);
        assert_eq!(config.signing_secret().unwrap(), SECRET.as_bytes());
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let config = Config::default();
        assert!(config.validate().is_err());
        assert!(config.signing_secret().is_err());
    }

    #[test]
    fn test_dev_secret_requires_opt_in() {
        let config = Config {
            allow_dev_secret: true,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.uses_dev_secret());
        assert_eq!(config.signing_secret().unwrap(), DEV_SECRET);
        assert!(DEV_SECRET.len() >= MIN_SECRET_LEN);

        // A configured secret always wins
        let config = Config {
            allow_dev_secret: true,
            token_secret: Some(SECRET.into()),
            ..Default::default()
        };
        assert!(!config.uses_dev_secret());
        assert_eq!(config.signing_secret().unwrap(), SECRET.as_bytes());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let short = Config {
            token_secret: Some("short".into()),
            ..Default::default()
        };
        assert!(short.validate().is_err());

        let zero_ttl = Config {
            token_secret: Some(SECRET.into()),
            token_ttl_secs: 0,
            ..Default::default()
        };
        assert!(zero_ttl.validate().is_err());

        let bad_header = Config {
            token_secret: Some(SECRET.into()),
            identity_header: "bad header".into(),
            ..Default::default()
        };
        assert!(bad_header.validate().is_err());

        let browser_header = Config {
            token_secret: Some(SECRET.into()),
            identity_header: "Authorization".into(),
            ..Default::default()
        };
        assert!(browser_header.validate().is_err());
    }

    #[test]
    fn test_config_merge_with_file() {
        let file_config = Config {
            content_root: "/srv/media".into(),
            token_secret: Some(SECRET.into()),
            token_ttl_secs: 60,
            ..Default::default()
        };

        let cli_config = Config {
            listen_on_port: 9000,
            token_ttl_secs: 30,
            ..Default::default()
        };

        let merged = cli_config.merge_with_file(file_config);

        assert_eq!(merged.listen_on_port, 9000); // CLI value takes precedence
        assert_eq!(merged.token_ttl_secs, 30);
        assert_eq!(merged.content_root, "/srv/media"); // File value used when CLI is default
        assert_eq!(merged.token_secret.as_deref(), Some(SECRET));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config {
            token_secret: Some(SECRET.into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("<redacted>"));
    }
}
