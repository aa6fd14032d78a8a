//! Per-identity settings resolution and typed field handling.

use std::env;
use std::fmt;
use std::str::FromStr;

use brain_core::SamplingParams;
use database::{settings as settings_store, Database, Settings, SettingsUpdate};
use tracing::info;

use crate::error::{OrchestratorError, Result};

/// Model assigned to new identities.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// System prompt assigned to new identities.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "Your role is to respond to texts like Eric Cartman from South Park.";

/// Values a fresh settings record starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDefaults {
    pub model: String,
    pub system_prompt: String,
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl SettingsDefaults {
    /// Read `DEFAULT_MODEL` and `DEFAULT_SYSTEM_PROMPT`, falling back to the
    /// built-in defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model: env::var("DEFAULT_MODEL").unwrap_or(defaults.model),
            system_prompt: env::var("DEFAULT_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
        }
    }

    /// The complete default record.
    pub fn to_settings(&self) -> Settings {
        Settings {
            model: Some(self.model.clone()),
            system_prompt: Some(self.system_prompt.clone()),
            stop_sequence: None,
            max_tokens: None,
            temperature: 1.0,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// A user-settable settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    Model,
    SystemPrompt,
    StopSequence,
    MaxTokens,
    Temperature,
    TopP,
    FrequencyPenalty,
    PresencePenalty,
}

impl SettingField {
    /// Every field, in display order.
    pub const ALL: [SettingField; 8] = [
        Self::Model,
        Self::SystemPrompt,
        Self::StopSequence,
        Self::MaxTokens,
        Self::Temperature,
        Self::TopP,
        Self::FrequencyPenalty,
        Self::PresencePenalty,
    ];

    /// Key used in commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::SystemPrompt => "system_prompt",
            Self::StopSequence => "stop_sequence",
            Self::MaxTokens => "max_tokens",
            Self::Temperature => "temperature",
            Self::TopP => "top_p",
            Self::FrequencyPenalty => "frequency_penalty",
            Self::PresencePenalty => "presence_penalty",
        }
    }

    /// Render this field of a record the way replies show it.
    pub fn display(&self, settings: &Settings) -> String {
        match self {
            Self::Model => display_option(settings.model.as_deref()),
            Self::SystemPrompt => display_option(settings.system_prompt.as_deref()),
            Self::StopSequence => display_option(settings.stop_sequence.as_deref()),
            Self::MaxTokens => display_option(settings.max_tokens),
            Self::Temperature => format!("{:?}", settings.temperature),
            Self::TopP => format!("{:?}", settings.top_p),
            Self::FrequencyPenalty => format!("{:?}", settings.frequency_penalty),
            Self::PresencePenalty => format!("{:?}", settings.presence_penalty),
        }
    }

    /// Parse a user-supplied value into a store update.
    ///
    /// `none` (any case) clears the nullable fields. Sampling values must lie
    /// in the range the provider accepts.
    pub fn parse_value(&self, value: &str) -> Result<SettingsUpdate> {
        let value = value.trim();
        let invalid = || OrchestratorError::InvalidValue {
            field: self.as_str(),
            value: value.to_string(),
        };
        let is_none = value.eq_ignore_ascii_case("none");

        let update = match self {
            Self::Model if !value.is_empty() && !is_none => SettingsUpdate::Model(value.to_string()),
            Self::SystemPrompt if !value.is_empty() && !is_none => {
                SettingsUpdate::SystemPrompt(value.to_string())
            }
            Self::Model | Self::SystemPrompt => return Err(invalid()),
            Self::StopSequence if is_none => SettingsUpdate::StopSequence(None),
            Self::StopSequence if value.is_empty() => return Err(invalid()),
            Self::StopSequence => SettingsUpdate::StopSequence(Some(value.to_string())),
            Self::MaxTokens if is_none => SettingsUpdate::MaxTokens(None),
            Self::MaxTokens => {
                let tokens = value.parse::<u32>().map_err(|_| invalid())?;
                if tokens == 0 {
                    return Err(invalid());
                }
                SettingsUpdate::MaxTokens(Some(i64::from(tokens)))
            }
            Self::Temperature => SettingsUpdate::Temperature(parse_in_range(value, 0.0, 2.0).ok_or_else(invalid)?),
            Self::TopP => SettingsUpdate::TopP(parse_in_range(value, 0.0, 1.0).ok_or_else(invalid)?),
            Self::FrequencyPenalty => {
                SettingsUpdate::FrequencyPenalty(parse_in_range(value, -2.0, 2.0).ok_or_else(invalid)?)
            }
            Self::PresencePenalty => {
                SettingsUpdate::PresencePenalty(parse_in_range(value, -2.0, 2.0).ok_or_else(invalid)?)
            }
        };

        Ok(update)
    }
}

impl FromStr for SettingField {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn display_option<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "None".to_string(), |v| v.to_string())
}

fn parse_in_range(value: &str, min: f64, max: f64) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (min..=max).contains(v))
}

/// Sampling parameters for a completion under the given settings.
pub fn sampling_params(settings: &Settings, defaults: &SettingsDefaults) -> SamplingParams {
    SamplingParams {
        model: settings
            .model
            .clone()
            .unwrap_or_else(|| defaults.model.clone()),
        stop: settings.stop_sequence.clone(),
        max_tokens: settings.max_tokens.and_then(|t| u32::try_from(t).ok()),
        temperature: Some(settings.temperature),
        top_p: Some(settings.top_p),
        frequency_penalty: Some(settings.frequency_penalty),
        presence_penalty: Some(settings.presence_penalty),
    }
}

/// Maps identities to their effective settings, creating defaults on first
/// contact.
#[derive(Debug, Clone)]
pub struct SettingsResolver {
    db: Database,
    defaults: SettingsDefaults,
}

impl SettingsResolver {
    pub fn new(db: Database, defaults: SettingsDefaults) -> Self {
        Self { db, defaults }
    }

    pub fn defaults(&self) -> &SettingsDefaults {
        &self.defaults
    }

    /// Get the settings for an identity, inserting defaults if it has none.
    ///
    /// Safe to call concurrently for the same identity: the store ignores a
    /// second insert, and both callers read back the same row.
    pub async fn resolve(&self, identity: &str) -> Result<Settings> {
        if let Some(settings) = settings_store::get_settings(self.db.pool(), identity).await? {
            return Ok(settings);
        }

        let inserted = settings_store::insert_settings_if_absent(
            self.db.pool(),
            identity,
            &self.defaults.to_settings(),
        )
        .await?;
        if inserted {
            info!("Created default settings for {}", identity);
        }

        settings_store::get_settings(self.db.pool(), identity)
            .await?
            .ok_or_else(|| {
                OrchestratorError::Database(database::DatabaseError::NotFound {
                    entity: "Settings",
                    id: identity.to_string(),
                })
            })
    }

    /// Parse and persist one field. Returns the stored value as displayed.
    pub async fn update(&self, identity: &str, field: SettingField, value: &str) -> Result<String> {
        let update = field.parse_value(value)?;
        self.resolve(identity).await?;
        settings_store::update_settings(self.db.pool(), identity, &update).await?;

        let settings = self.resolve(identity).await?;
        Ok(field.display(&settings))
    }

    /// Re-apply the defaults to every field.
    pub async fn reset(&self, identity: &str) -> Result<()> {
        self.resolve(identity).await?;
        settings_store::replace_settings(self.db.pool(), identity, &self.defaults.to_settings())
            .await?;
        info!("Settings reset to defaults for {}", identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in SettingField::ALL {
            assert_eq!(field.as_str().parse::<SettingField>(), Ok(field));
        }
        assert!("settings".parse::<SettingField>().is_err());
    }

    #[test]
    fn test_display_defaults() {
        let settings = SettingsDefaults::default().to_settings();
        assert_eq!(SettingField::Temperature.display(&settings), "1.0");
        assert_eq!(SettingField::FrequencyPenalty.display(&settings), "0.0");
        assert_eq!(SettingField::StopSequence.display(&settings), "None");
        assert_eq!(SettingField::MaxTokens.display(&settings), "None");
        assert_eq!(SettingField::Model.display(&settings), DEFAULT_MODEL);
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(
            SettingField::MaxTokens.parse_value("256").unwrap(),
            SettingsUpdate::MaxTokens(Some(256))
        );
        assert_eq!(
            SettingField::MaxTokens.parse_value("None").unwrap(),
            SettingsUpdate::MaxTokens(None)
        );
        assert_eq!(
            SettingField::Temperature.parse_value("0.7").unwrap(),
            SettingsUpdate::Temperature(0.7)
        );
        assert_eq!(
            SettingField::StopSequence.parse_value("END").unwrap(),
            SettingsUpdate::StopSequence(Some("END".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(SettingField::MaxTokens.parse_value("lots").is_err());
        assert!(SettingField::MaxTokens.parse_value("0").is_err());
        assert!(SettingField::Temperature.parse_value("3.5").is_err());
        assert!(SettingField::TopP.parse_value("NaN").is_err());
        assert!(SettingField::Model.parse_value("none").is_err());

        let err = SettingField::TopP.parse_value("high").unwrap_err();
        assert_eq!(err.to_string(), "high is not a valid value for top_p");
    }

    #[test]
    fn test_sampling_params_from_settings() {
        let defaults = SettingsDefaults::default();
        let mut settings = defaults.to_settings();
        settings.max_tokens = Some(100);
        settings.stop_sequence = Some("###".to_string());

        let params = sampling_params(&settings, &defaults);
        assert_eq!(params.model, DEFAULT_MODEL);
        assert_eq!(params.max_tokens, Some(100));
        assert_eq!(params.stop.as_deref(), Some("###"));
        assert_eq!(params.temperature, Some(1.0));
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let db = Database::in_memory().await.unwrap();
        let resolver = SettingsResolver::new(db.clone(), SettingsDefaults::default());

        let first = resolver.resolve("+1user").await.unwrap();
        let second = resolver.resolve("+1user").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, SettingsDefaults::default().to_settings());

        let inserted_again = settings_store::insert_settings_if_absent(
            db.pool(),
            "+1user",
            &SettingsDefaults::default().to_settings(),
        )
        .await
        .unwrap();
        assert!(!inserted_again);
    }

    #[tokio::test]
    async fn test_update_and_reset() {
        let db = Database::in_memory().await.unwrap();
        let resolver = SettingsResolver::new(db, SettingsDefaults::default());

        let shown = resolver
            .update("+1user", SettingField::Temperature, "0.25")
            .await
            .unwrap();
        assert_eq!(shown, "0.25");

        resolver.reset("+1user").await.unwrap();
        let settings = resolver.resolve("+1user").await.unwrap();
        assert_eq!(settings.temperature, 1.0);
    }
}
