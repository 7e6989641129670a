//! Tool configuration.
//!
//! Values are read from a TOML file; command-line flags take precedence.
//!
//! # Configuration File Format
//!
//! ```toml
//! # Size of the application slot in flash, checked by `verify`.
//! max_payload_size = 0x1C000
//! # Run the bootloader check on every signed image.
//! verify_after_sign = true
//! ```

use std::path::Path;

use anyhow::Context;
use appheader::ImageSigner;
use serde::Deserialize;

/// Configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "appsign.toml";

/// Settings shared by all subcommands.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SignConfig {
    /// Largest payload the bootloader accepts. Defaults to the 112 KiB slot.
    pub max_payload_size: Option<u32>,
    /// Verify the output after signing.
    pub verify_after_sign: bool,
}

impl SignConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
    /// used if present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("can not open config file: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        info!("Using config {}", path.display());
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Builds a signer, letting `max_size` override the configured limit.
    pub fn signer(&self, max_size: Option<u32>) -> ImageSigner {
        let signer = ImageSigner::new();
        match max_size.or(self.max_payload_size) {
            Some(max) => signer.with_max_payload_size(max),
            None => signer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appheader::APP_MAX_SIZE;
    use std::io::Write;

    #[test]
    fn test_parse_full() {
        let config = SignConfig::parse("max_payload_size = 0x8000\nverify_after_sign = true\n")
            .unwrap();
        assert_eq!(
            config,
            SignConfig {
                max_payload_size: Some(0x8000),
                verify_after_sign: true,
            }
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(SignConfig::parse("").unwrap(), SignConfig::default());
    }

    #[test]
    fn test_parse_unknown_key() {
        assert!(SignConfig::parse("magic = 1\n").is_err());
    }

    #[test]
    fn test_signer_limits() {
        let config = SignConfig {
            max_payload_size: Some(0x8000),
            verify_after_sign: false,
        };
        assert_eq!(config.signer(None).max_payload_size(), 0x8000);
        assert_eq!(config.signer(Some(16)).max_payload_size(), 16);
        assert_eq!(
            SignConfig::default().signer(None).max_payload_size(),
            APP_MAX_SIZE
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "verify_after_sign = true").unwrap();

        let config = SignConfig::load(Some(file.path())).unwrap();
        assert!(config.verify_after_sign);
        assert_eq!(config.max_payload_size, None);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SignConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("can not open config file"));
    }
}
