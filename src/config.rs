//! Build-time configuration.
//!
//! The app is a static WASM bundle, so settings are baked in when it is
//! built: `PROGRAM_MAP_API_URL` points at the data service and
//! `PROGRAM_MAP_LOG` sets the console log level.

use log::Level;

use crate::api::ApiConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOG_LEVEL: Level = Level::Debug;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	pub api: ApiConfig,
	pub log_level: Level,
}

impl AppConfig {
	pub fn from_env() -> Self {
		Self::from_values(option_env!("PROGRAM_MAP_API_URL"), option_env!("PROGRAM_MAP_LOG"))
	}

	fn from_values(api_url: Option<&str>, log_level: Option<&str>) -> Self {
		let api_url = api_url
			.map(str::trim)
			.filter(|url| !url.is_empty())
			.unwrap_or(DEFAULT_API_URL);
		Self {
			api: ApiConfig::new(api_url),
			log_level: log_level
				.and_then(|level| level.trim().parse().ok())
				.unwrap_or(DEFAULT_LOG_LEVEL),
		}
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self::from_values(None, None)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_when_unset() {
		let config = AppConfig::default();
		assert_eq!(config.api.base_url(), DEFAULT_API_URL);
		assert_eq!(config.log_level, Level::Debug);
	}

	#[test]
	fn reads_values() {
		let config = AppConfig::from_values(Some("https://data.example.edu/"), Some("warn"));
		assert_eq!(config.api.base_url(), "https://data.example.edu");
		assert_eq!(config.log_level, Level::Warn);
	}

	#[test]
	fn bad_values_fall_back() {
		let config = AppConfig::from_values(Some("  "), Some("loud"));
		assert_eq!(config.api.base_url(), DEFAULT_API_URL);
		assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
	}
}
