use crate::domain::model::{AnalysisSettings, TrackFormat};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{Result, TrackError};
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub input_key: String,
    pub s3_bucket: String,
    pub s3_prefix: String,
    pub s3_region: String,
    pub format: Option<String>,
    pub start_time: Option<String>,
    pub settings: AnalysisSettings,
    pub map_link_base: String,
    pub bundle: bool,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = AnalysisSettings::default();

        Ok(Self {
            input_key: env::var("INPUT_KEY").map_err(|_| TrackError::MissingConfigError {
                field: "INPUT_KEY".to_string(),
            })?,
            s3_bucket: env::var("S3_BUCKET").map_err(|_| TrackError::MissingConfigError {
                field: "S3_BUCKET".to_string(),
            })?,
            s3_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| "rest-with-gps".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            format: env::var("TRACK_FORMAT").ok(),
            start_time: env::var("START_TIME").ok(),
            settings: AnalysisSettings {
                min_speed_kmh: env_parsed("MIN_SPEED_KMH", defaults.min_speed_kmh),
                min_stop_minutes: env_parsed("MIN_STOP_MINUTES", defaults.min_stop_minutes),
                smoothing_interval_secs: env_parsed(
                    "SMOOTHING_INTERVAL_SECS",
                    defaults.smoothing_interval_secs,
                ),
                utc_offset_hours: env_parsed("UTC_OFFSET_HOURS", defaults.utc_offset_hours),
            },
            map_link_base: env::var("MAP_LINK_BASE")
                .unwrap_or_else(|_| "https://maps.google.com/maps".to_string()),
            bundle: env::var("BUNDLE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl ConfigProvider for LambdaConfig {
    fn input_path(&self) -> &str {
        &self.input_key
    }

    fn output_path(&self) -> &str {
        &self.s3_prefix
    }

    fn format(&self) -> Option<TrackFormat> {
        self.format.as_deref().and_then(|s| s.parse().ok())
    }

    fn settings(&self) -> AnalysisSettings {
        self.settings
    }

    fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn map_link_base(&self) -> &str {
        &self.map_link_base
    }

    fn bundle(&self) -> bool {
        self.bundle
    }
}

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("INPUT_KEY", &self.input_key)?;
        validate_s3_bucket_name("S3_BUCKET", &self.s3_bucket)?;
        validate_non_empty_string("S3_PREFIX", &self.s3_prefix)?;
        validate_aws_region("S3_REGION", &self.s3_region)?;
        validate_positive_number("MIN_STOP_MINUTES", self.settings.min_stop_minutes, 1)?;
        validate_range("MIN_SPEED_KMH", self.settings.min_speed_kmh, 0.1, 100.0)?;
        validate_url("MAP_LINK_BASE", &self.map_link_base)?;

        tracing::info!("Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    if bucket_name.is_empty() {
        return Err(TrackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name cannot be empty".to_string(),
        });
    }

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(TrackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name must be between 3 and 63 characters".to_string(),
        });
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(TrackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots"
                .to_string(),
        });
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(TrackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: bucket_name.to_string(),
            reason: "S3 bucket name cannot start or end with a hyphen".to_string(),
        });
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    crate::utils::validation::validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(TrackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// S3 backend: reads the recording from and writes outputs to one bucket.
/// Reads take the key as given; written keys land under `prefix`.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    fn output_key(&self, path: &str) -> String {
        prefixed_key(&self.prefix, path)
    }
}

fn prefixed_key(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", prefix.trim_end_matches('/'), path)
    }
}

impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| TrackError::StorageError {
                message: format!("Failed to read s3://{}/{}: {}", self.bucket, path, e),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| TrackError::StorageError {
                message: format!("Failed to collect S3 body for {}: {}", path, e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let key = self.output_key(path);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| TrackError::StorageError {
                message: format!("Failed to write s3://{}/{}: {}", self.bucket, key, e),
            })?;

        Ok(())
    }
}
