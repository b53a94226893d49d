//! Configuration module
//!
//! Configuration is read from the environment (a `.env` file is honoured) into
//! [`IngestConfig`], wrapped by [`Config`] which exposes accessors to the rest of the
//! application. Parsing goes through a lookup function so tests never have to touch the
//! process environment.

use std::env;

use crate::constants::DEFAULT_DURATION_TOLERANCE_SECS;
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8080;
const MAX_UPLOAD_SIZE_MB: usize = 500;
const MAX_CONCURRENT_TRANSCODES: usize = 2;
const TRANSCODE_CRF: u8 = 30;
const MAX_CRF: u8 = 51;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: String,
}

/// Ingestion configuration: storage backend, external tools and transcode settings
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, R2, etc.)
    pub s3_public_base_url: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Media processing configuration
    pub max_upload_size_bytes: usize,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub max_concurrent_transcodes: usize,
    pub duration_tolerance_secs: f64,
    pub transcode_video_codec: String,
    pub transcode_crf: u8,
    pub transcode_preset: String,
    pub scratch_dir: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    fn as_ingest(&self) -> &IngestConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_ingest().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production(&self.as_ingest().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.as_ingest().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_ingest().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_ingest().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.as_ingest().base.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_ingest().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_ingest().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_ingest().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_ingest().s3_endpoint.as_deref()
    }

    pub fn s3_public_base_url(&self) -> Option<&str> {
        self.as_ingest().s3_public_base_url.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_ingest().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_ingest().local_storage_base_url.as_deref()
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.as_ingest().max_upload_size_bytes
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.as_ingest().ffmpeg_path
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.as_ingest().ffprobe_path
    }

    pub fn max_concurrent_transcodes(&self) -> usize {
        self.as_ingest().max_concurrent_transcodes
    }

    pub fn duration_tolerance_secs(&self) -> f64 {
        self.as_ingest().duration_tolerance_secs
    }

    pub fn transcode_video_codec(&self) -> &str {
        &self.as_ingest().transcode_video_codec
    }

    pub fn transcode_crf(&self) -> u8 {
        self.as_ingest().transcode_crf
    }

    pub fn transcode_preset(&self) -> &str {
        &self.as_ingest().transcode_preset
    }

    pub fn scratch_dir(&self) -> Option<&str> {
        self.as_ingest().scratch_dir.as_deref()
    }
}

fn is_production(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: match var("PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            cors_origins,
            environment,
            log_format: var("LOG_FORMAT")
                .unwrap_or_else(|| "text".to_string())
                .to_lowercase(),
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::S3,
        };

        let duration_tolerance_secs = match var("DURATION_TOLERANCE_SECS") {
            Some(s) => s
                .parse()
                .map_err(|_| anyhow::anyhow!("DURATION_TOLERANCE_SECS must be a number"))?,
            None => DEFAULT_DURATION_TOLERANCE_SECS,
        };

        let transcode_crf = match var("TRANSCODE_CRF") {
            Some(s) => s
                .parse()
                .map_err(|_| anyhow::anyhow!("TRANSCODE_CRF must be an integer"))?,
            None => TRANSCODE_CRF,
        };

        let config = IngestConfig {
            base,
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            s3_public_base_url: var("S3_PUBLIC_BASE_URL"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            max_upload_size_bytes: var("MAX_UPLOAD_SIZE_MB")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(MAX_UPLOAD_SIZE_MB)
                * 1024
                * 1024,
            ffmpeg_path: var("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            ffprobe_path: var("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            max_concurrent_transcodes: var("MAX_CONCURRENT_TRANSCODES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONCURRENT_TRANSCODES),
            duration_tolerance_secs,
            transcode_video_codec: var("TRANSCODE_VIDEO_CODEC")
                .unwrap_or_else(|| "libx264".to_string()),
            transcode_crf,
            transcode_preset: var("TRANSCODE_PRESET").unwrap_or_else(|| "veryfast".to_string()),
            scratch_dir: var("SCRATCH_DIR"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_concurrent_transcodes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_CONCURRENT_TRANSCODES must be at least 1"
            ));
        }

        if !self.duration_tolerance_secs.is_finite() || self.duration_tolerance_secs < 0.0 {
            return Err(anyhow::anyhow!(
                "DURATION_TOLERANCE_SECS must be a non-negative number"
            ));
        }

        if self.transcode_crf > MAX_CRF {
            return Err(anyhow::anyhow!(
                "TRANSCODE_CRF must be between 0 and {}",
                MAX_CRF
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn local_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/mediagate"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:8080/media"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = IngestConfig::from_lookup(lookup(&local_env())).unwrap();
        assert_eq!(config.base.server_port, 8080);
        assert_eq!(config.base.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.storage_backend, StorageBackend::Local);
        assert_eq!(config.duration_tolerance_secs, 0.2);
        assert_eq!(config.transcode_crf, 30);
        assert_eq!(config.transcode_preset, "veryfast");
        assert_eq!(config.transcode_video_codec, "libx264");
        assert_eq!(config.max_concurrent_transcodes, 2);
        assert_eq!(config.max_upload_size_bytes, 500 * 1024 * 1024);
        assert_eq!(config.ffprobe_path, "ffprobe");
    }

    #[test]
    fn test_s3_requires_bucket_and_region() {
        let err = IngestConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));

        let err = IngestConfig::from_lookup(lookup(&[("S3_BUCKET", "media")])).unwrap_err();
        assert!(err.to_string().contains("S3_REGION"));

        let config = IngestConfig::from_lookup(lookup(&[
            ("S3_BUCKET", "media"),
            ("AWS_REGION", "eu-west-1"),
        ]))
        .unwrap();
        assert_eq!(config.s3_region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_production_rejects_wildcard_cors() {
        let mut env = local_env();
        env.push(("ENVIRONMENT", "production"));
        let err = IngestConfig::from_lookup(lookup(&env)).unwrap_err();
        assert!(err.to_string().contains("CORS_ORIGINS"));

        env.push(("CORS_ORIGINS", "https://app.example.com, https://admin.example.com"));
        let config = Config(Box::new(IngestConfig::from_lookup(lookup(&env)).unwrap()));
        assert!(config.is_production());
        assert_eq!(config.cors_origins().len(), 2);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut env = local_env();
        env.push(("TRANSCODE_CRF", "60"));
        assert!(IngestConfig::from_lookup(lookup(&env)).is_err());

        let mut env = local_env();
        env.push(("DURATION_TOLERANCE_SECS", "-0.5"));
        assert!(IngestConfig::from_lookup(lookup(&env)).is_err());

        let mut env = local_env();
        env.push(("MAX_CONCURRENT_TRANSCODES", "0"));
        assert!(IngestConfig::from_lookup(lookup(&env)).is_err());

        let mut env = local_env();
        env.push(("PORT", "http"));
        assert!(IngestConfig::from_lookup(lookup(&env)).is_err());
    }

    #[test]
    fn test_overrides() {
        let mut env = local_env();
        env.extend([
            ("PORT", "9000"),
            ("DURATION_TOLERANCE_SECS", "0.5"),
            ("TRANSCODE_PRESET", "fast"),
            ("MAX_UPLOAD_SIZE_MB", "10"),
            ("SCRATCH_DIR", "/var/tmp/mediagate"),
        ]);
        let config = IngestConfig::from_lookup(lookup(&env)).unwrap();
        assert_eq!(config.base.server_port, 9000);
        assert_eq!(config.duration_tolerance_secs, 0.5);
        assert_eq!(config.transcode_preset, "fast");
        assert_eq!(config.max_upload_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.scratch_dir.as_deref(), Some("/var/tmp/mediagate"));
    }
}
