use crate::domain::model::{AnalysisSettings, TrackFormat};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, TrackError};
use crate::utils::validation::Validate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub track: TrackConfig,
    pub analysis: Option<AnalysisConfig>,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackConfig {
    pub input: String,
    pub format: Option<String>,
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub min_speed_kmh: Option<f64>,
    pub min_stop_minutes: Option<i64>,
    pub smoothing_interval_secs: Option<i64>,
    pub utc_offset_hours: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub bundle: Option<bool>,
    pub map_link_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

const DEFAULT_MAP_LINK_BASE: &str = "https://maps.google.com/maps";

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TrackError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` occurrences with the environment value; unknown
    /// variables are left untouched.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static regex");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.track.input
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn format(&self) -> Option<TrackFormat> {
        self.track.format.as_deref().and_then(|s| s.parse().ok())
    }

    fn settings(&self) -> AnalysisSettings {
        let defaults = AnalysisSettings::default();
        match &self.analysis {
            Some(analysis) => AnalysisSettings {
                min_speed_kmh: analysis.min_speed_kmh.unwrap_or(defaults.min_speed_kmh),
                min_stop_minutes: analysis
                    .min_stop_minutes
                    .unwrap_or(defaults.min_stop_minutes),
                smoothing_interval_secs: analysis
                    .smoothing_interval_secs
                    .unwrap_or(defaults.smoothing_interval_secs),
                utc_offset_hours: analysis
                    .utc_offset_hours
                    .unwrap_or(defaults.utc_offset_hours),
            },
            None => defaults,
        }
    }

    fn start_time(&self) -> Option<DateTime<Utc>> {
        self.track
            .start_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn map_link_base(&self) -> &str {
        self.output
            .map_link_base
            .as_deref()
            .unwrap_or(DEFAULT_MAP_LINK_BASE)
    }

    fn bundle(&self) -> bool {
        self.output.bundle.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_path("track.input", &self.track.input)?;
        validate_path("output.path", &self.output.path)?;

        match &self.track.format {
            Some(format) => {
                format
                    .parse::<TrackFormat>()
                    .map_err(|reason| TrackError::InvalidConfigValueError {
                        field: "track.format".to_string(),
                        value: format.clone(),
                        reason,
                    })?;
            }
            None => validate_file_extension("track.input", &self.track.input, &["fit", "json"])?,
        }

        if let Some(start_time) = &self.track.start_time {
            DateTime::parse_from_rfc3339(start_time).map_err(|e| {
                TrackError::InvalidConfigValueError {
                    field: "track.start_time".to_string(),
                    value: start_time.clone(),
                    reason: format!("not an RFC 3339 timestamp: {}", e),
                }
            })?;
        }

        let settings = self.settings();
        validate_positive_number("analysis.min_stop_minutes", settings.min_stop_minutes, 1)?;
        validate_range("analysis.min_speed_kmh", settings.min_speed_kmh, 0.1, 100.0)?;
        validate_range(
            "analysis.smoothing_interval_secs",
            settings.smoothing_interval_secs,
            1,
            600,
        )?;
        validate_range("analysis.utc_offset_hours", settings.utc_offset_hours, -12, 14)?;
        validate_url("output.map_link_base", self.map_link_base())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parse_basic_config() {
        let toml_content = r#"
[track]
input = "ride.fit"

[analysis]
min_stop_minutes = 10

[output]
path = "./maps"
bundle = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.input_path(), "ride.fit");
        assert_eq!(config.output_path(), "./maps");
        assert!(config.bundle());
        assert_eq!(config.settings().min_stop_minutes, 10);
        // unspecified settings fall back to defaults
        assert_eq!(config.settings().min_speed_kmh, 5.0);
        assert_eq!(config.map_link_base(), DEFAULT_MAP_LINK_BASE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_var_substitution() {
        std::env::set_var("TEST_TRACK_INPUT", "from-env.fit");

        let toml_content = r#"
[track]
input = "${TEST_TRACK_INPUT}"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input_path(), "from-env.fit");

        std::env::remove_var("TEST_TRACK_INPUT");
    }

    #[test]
    fn unknown_env_var_left_untouched() {
        let toml_content = r#"
[track]
input = "${DOES_NOT_EXIST_12345}"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input_path(), "${DOES_NOT_EXIST_12345}");
    }

    #[test]
    fn validation_rejects_unknown_format() {
        let toml_content = r#"
[track]
input = "ride.dat"
format = "gpx"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn start_time_is_parsed() {
        let toml_content = r#"
[track]
input = "streams.json"
start_time = "2023-08-20T20:30:00Z"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        let anchor = config.start_time().unwrap();
        assert_eq!(anchor.to_rfc3339(), "2023-08-20T20:30:00+00:00");
    }

    #[test]
    fn config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[track]
input = "ride.fit"

[output]
path = "./output"

[monitoring]
enabled = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.input_path(), "ride.fit");
        assert!(config.monitoring_enabled());
    }
}
