//! Extension pour lire la configuration de la radio depuis pmoconfig
//!
//! ```rust,ignore
//! use pmoconfig::get_config;
//! use pmoradio::RadioConfigExt;
//!
//! let radio = get_config().get_radio_config()?;
//! println!("{} ({})", radio.name, radio.source.kind);
//! ```

use crate::config::RadioConfig;
use anyhow::{Context, Result};
use pmoconfig::Config;
use serde_yaml::Value;

const RADIO_SECTION: &[&str] = &["radio"];

/// Trait d'extension pour gérer la configuration de la radio dans pmoconfig
pub trait RadioConfigExt {
    /// Section `radio` complète, typée
    ///
    /// Une section absente donne la configuration par défaut ; une section
    /// invalide (discipline inconnue, type incorrect...) est une erreur.
    fn get_radio_config(&self) -> Result<RadioConfig>;
}

impl RadioConfigExt for Config {
    fn get_radio_config(&self) -> Result<RadioConfig> {
        match self.get_value(RADIO_SECTION) {
            Ok(Value::Null) | Err(_) => Ok(RadioConfig::default()),
            Ok(value) => serde_yaml::from_value(value).context("Invalid `radio` configuration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;
    use pmoplaylist::RotationDiscipline;

    #[test]
    fn test_embedded_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        let radio = config.get_radio_config().unwrap();
        assert_eq!(radio.name, "Madrid Rock Radio");
        assert_eq!(radio.playlist.len(), 7);
        assert_eq!(radio.rotation, RotationDiscipline::RotateToTail);
        assert_eq!(radio.source.kind, SourceKind::Youtube);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_yaml(
            r#"
radio:
  name: Test FM
  rotation: cyclic
  source:
    kind: direct
  playlist:
    - locator: https://files.example/one.mp3
"#,
        )
        .unwrap();

        let radio = config.get_radio_config().unwrap();
        assert_eq!(radio.name, "Test FM");
        assert_eq!(radio.rotation, RotationDiscipline::Cyclic);
        assert_eq!(radio.playlist.len(), 1);
        assert_eq!(radio.source.kind, SourceKind::Direct);
    }

    #[test]
    fn test_invalid_section_is_an_error() {
        let config = Config::from_yaml("radio:\n  catch_up: sometimes\n").unwrap();
        assert!(config.get_radio_config().is_err());
    }
}
