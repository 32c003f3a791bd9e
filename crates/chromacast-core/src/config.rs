//! Configuration module
//!
//! Server, media cloud credentials and the composition constants, all read
//! from the environment (a `.env` file is loaded first when present).

use std::env;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::models::{CompositionRequest, Gravity};

// Common constants
const SERVER_PORT: u16 = 3000;
const UPSTREAM_TIMEOUT_SECS: u64 = 120;
const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";
const CLOUDINARY_FOLDER: &str = "videos";
const CLOUDINARY_LIST_MAX_RESULTS: u32 = 100;

// Composition defaults
const FOREGROUND_VIDEO_PATH: &str = "static/videos/foreground.mp4";
const BACKGROUND_VIDEO_PATH: &str = "static/videos/background.mp4";
const CHROMA_KEY_COLOR: &str = "#6adb47";
const OVERLAY_TARGET_WIDTH: u32 = 500;
const OVERLAY_SCALE: f64 = 0.6;
const CHROMA_KEY_TOLERANCE: u32 = 20;
const OUTPUT_DURATION_SECS: f64 = 15.0;

/// What to do when deleting the temporary foreground asset fails after the
/// composited asset was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupFailurePolicy {
    /// Fail the whole request with the delete error (discards the result)
    #[default]
    Fatal,
    /// Return the result and report the orphaned asset as a warning
    Warn,
}

impl std::str::FromStr for CleanupFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fatal" => Ok(CleanupFailurePolicy::Fatal),
            "warn" => Ok(CleanupFailurePolicy::Warn),
            other => Err(anyhow::anyhow!(
                "CLEANUP_FAILURE_POLICY must be 'fatal' or 'warn', got '{}'",
                other
            )),
        }
    }
}

/// HTTP server settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Media cloud account and API settings
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
    /// Folder used for assets uploaded with folder grouping
    pub folder: String,
    pub list_max_results: u32,
    /// Upper bound for any single call to the media cloud
    pub timeout: Duration,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("folder", &self.folder)
            .field("list_max_results", &self.list_max_results)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Inputs and constants of the overlay composition
#[derive(Clone, Debug, PartialEq)]
pub struct CompositionConfig {
    pub foreground_path: String,
    pub background_path: String,
    /// Solid background colour of the foreground clip, `#RRGGBB`
    pub chroma_key_color: String,
    /// Width in pixels the background is scaled to
    pub target_width: u32,
    /// Overlay width relative to the base, in (0, 1]
    pub overlay_scale: f64,
    /// Colour distance tolerated by the transparency effect, 0-100
    pub transparency_tolerance: u32,
    pub gravity: Gravity,
    pub output_duration_secs: f64,
    pub cleanup_failure_policy: CleanupFailurePolicy,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            foreground_path: FOREGROUND_VIDEO_PATH.to_string(),
            background_path: BACKGROUND_VIDEO_PATH.to_string(),
            chroma_key_color: CHROMA_KEY_COLOR.to_string(),
            target_width: OVERLAY_TARGET_WIDTH,
            overlay_scale: OVERLAY_SCALE,
            transparency_tolerance: CHROMA_KEY_TOLERANCE,
            gravity: Gravity::North,
            output_duration_secs: OUTPUT_DURATION_SECS,
            cleanup_failure_policy: CleanupFailurePolicy::Fatal,
        }
    }
}

impl CompositionConfig {
    /// The request described by the configured source files and colour.
    pub fn request(&self) -> CompositionRequest {
        CompositionRequest {
            foreground_path: self.foreground_path.clone(),
            foreground_chroma_key: self.chroma_key_color.clone(),
            background_path: self.background_path.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !is_hex_color(&self.chroma_key_color) {
            return Err(anyhow::anyhow!(
                "CHROMA_KEY_COLOR must be a #RRGGBB hex colour, got '{}'",
                self.chroma_key_color
            ));
        }
        if self.target_width == 0 {
            return Err(anyhow::anyhow!("OVERLAY_TARGET_WIDTH must be positive"));
        }
        if !(self.overlay_scale > 0.0 && self.overlay_scale <= 1.0) {
            return Err(anyhow::anyhow!(
                "OVERLAY_SCALE must be in (0, 1], got {}",
                self.overlay_scale
            ));
        }
        if self.transparency_tolerance > 100 {
            return Err(anyhow::anyhow!(
                "CHROMA_KEY_TOLERANCE must be at most 100, got {}",
                self.transparency_tolerance
            ));
        }
        if !(self.output_duration_secs > 0.0) {
            return Err(anyhow::anyhow!("OUTPUT_DURATION_SECS must be positive"));
        }
        if self.foreground_path.trim().is_empty() || self.background_path.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "FOREGROUND_VIDEO_PATH and BACKGROUND_VIDEO_PATH must not be empty"
            ));
        }
        Ok(())
    }
}

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid colour pattern"));

/// Checks the `#RRGGBB` form accepted by the transparency effect.
pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub cloudinary: CloudinaryConfig,
    pub composition: CompositionConfig,
}

impl Config {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = parse_or(var("SERVER_PORT").or_else(|| var("PORT")), SERVER_PORT)?;

        let base = BaseConfig {
            server_port,
            cors_origins,
            environment,
        };

        let cloudinary = CloudinaryConfig {
            cloud_name: var("CLOUDINARY_CLOUD_NAME")
                .ok_or_else(|| anyhow::anyhow!("CLOUDINARY_CLOUD_NAME must be set"))?,
            api_key: var("CLOUDINARY_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("CLOUDINARY_API_KEY must be set"))?,
            api_secret: var("CLOUDINARY_API_SECRET")
                .ok_or_else(|| anyhow::anyhow!("CLOUDINARY_API_SECRET must be set"))?,
            api_base: var("CLOUDINARY_API_BASE")
                .unwrap_or_else(|| CLOUDINARY_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            folder: var("CLOUDINARY_FOLDER").unwrap_or_else(|| CLOUDINARY_FOLDER.to_string()),
            list_max_results: parse_or(
                var("CLOUDINARY_LIST_MAX_RESULTS"),
                CLOUDINARY_LIST_MAX_RESULTS,
            )?,
            timeout: Duration::from_secs(parse_or(
                var("UPSTREAM_TIMEOUT_SECS"),
                UPSTREAM_TIMEOUT_SECS,
            )?),
        };

        let defaults = CompositionConfig::default();
        let composition = CompositionConfig {
            foreground_path: var("FOREGROUND_VIDEO_PATH").unwrap_or(defaults.foreground_path),
            background_path: var("BACKGROUND_VIDEO_PATH").unwrap_or(defaults.background_path),
            chroma_key_color: var("CHROMA_KEY_COLOR").unwrap_or(defaults.chroma_key_color),
            target_width: parse_or(var("OVERLAY_TARGET_WIDTH"), defaults.target_width)?,
            overlay_scale: parse_or(var("OVERLAY_SCALE"), defaults.overlay_scale)?,
            transparency_tolerance: parse_or(
                var("CHROMA_KEY_TOLERANCE"),
                defaults.transparency_tolerance,
            )?,
            gravity: match var("OVERLAY_GRAVITY") {
                Some(g) => g.parse::<Gravity>().map_err(anyhow::Error::msg)?,
                None => defaults.gravity,
            },
            output_duration_secs: parse_or(
                var("OUTPUT_DURATION_SECS"),
                defaults.output_duration_secs,
            )?,
            cleanup_failure_policy: match var("CLEANUP_FAILURE_POLICY") {
                Some(p) => p.parse::<CleanupFailurePolicy>()?,
                None => defaults.cleanup_failure_policy,
            },
        };

        Ok(Config {
            base,
            cloudinary,
            composition,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        if self.cloudinary.timeout.is_zero() {
            return Err(anyhow::anyhow!("UPSTREAM_TIMEOUT_SECS must be positive"));
        }
        if self.cloudinary.list_max_results == 0 || self.cloudinary.list_max_results > 500 {
            return Err(anyhow::anyhow!(
                "CLOUDINARY_LIST_MAX_RESULTS must be between 1 and 500"
            ));
        }
        self.composition.validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }
}

fn parse_or<T>(raw: Option<String>, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value '{}': {}", value, e)),
        None => Ok(default),
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

    const CREDENTIALS: [(&str, &str); 3] = [
        ("CLOUDINARY_CLOUD_NAME", "demo"),
        ("CLOUDINARY_API_KEY", "123456"),
        ("CLOUDINARY_API_SECRET", "shh"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&CREDENTIALS)).unwrap();
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.cloudinary.api_base, "https://api.cloudinary.com");
        assert_eq!(config.cloudinary.folder, "videos");
        assert_eq!(config.cloudinary.timeout, Duration::from_secs(120));
        assert_eq!(config.composition, CompositionConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_credentials() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("CLOUDINARY_CLOUD_NAME"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.extend([
            ("CHROMA_KEY_COLOR", "#00FF00"),
            ("OVERLAY_SCALE", "0.4"),
            ("OVERLAY_GRAVITY", "south_east"),
            ("CLEANUP_FAILURE_POLICY", "warn"),
            ("CLOUDINARY_API_BASE", "http://localhost:9000/"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.composition.chroma_key_color, "#00FF00");
        assert_eq!(config.composition.overlay_scale, 0.4);
        assert_eq!(config.composition.gravity, Gravity::SouthEast);
        assert_eq!(
            config.composition.cleanup_failure_policy,
            CleanupFailurePolicy::Warn
        );
        assert_eq!(config.cloudinary.api_base, "http://localhost:9000");
    }

    #[test]
    fn test_unparseable_number_is_an_error() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("OVERLAY_TARGET_WIDTH", "wide"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_hex_color_check() {
        for _ in 0..3 {
            assert!(is_hex_color("#6adb47"));
            assert!(is_hex_color("#00FF00"));
        }
        assert!(!is_hex_color("6adb47"));
        assert!(!is_hex_color("#6adb4"));
        assert!(!is_hex_color("#6adb47 "));
        assert!(!is_hex_color("#gggggg"));
    }

    #[test]
    fn test_validation_rejects_bad_composition() {
        let mut composition = CompositionConfig::default();
        composition.chroma_key_color = "green".to_string();
        assert!(composition.validate().is_err());

        let mut composition = CompositionConfig::default();
        composition.overlay_scale = 1.5;
        assert!(composition.validate().is_err());

        let mut composition = CompositionConfig::default();
        composition.transparency_tolerance = 101;
        assert!(composition.validate().is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut pairs = CREDENTIALS.to_vec();
        pairs.push(("ENVIRONMENT", "production"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let config = Config::from_lookup(lookup(&CREDENTIALS)).unwrap();
        let debug = format!("{:?}", config.cloudinary);
        assert!(!debug.contains("shh"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_request_from_config() {
        let request = CompositionConfig::default().request();
        assert_eq!(request.foreground_path, "static/videos/foreground.mp4");
        assert_eq!(request.foreground_chroma_key, "#6adb47");
        assert_eq!(request.background_path, "static/videos/background.mp4");
    }
}
