use std::{ env, fmt::Display, path::PathBuf, str::FromStr };

use anyhow::{ anyhow, Result };
use chrono::NaiveDate;
use tracing::{ info, warn };

#[derive(Debug, Clone)]
pub struct Config {
	pub host: String,
	pub port: u16,
	pub fixtures_dir: PathBuf,
	pub database_path: PathBuf,
	pub demo: DemoSettings,
}

/// Shape of the generated dataset used when no fixtures are present.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoSettings {
	pub restaurants: usize,
	pub orders: usize,
	pub start: NaiveDate,
	pub days: u32,
	pub seed: u64,
}

impl Config {
	/// Reads `.env` if present, then the `DASHBOARD_*` variables.
	pub fn load() -> Result<Self> {
		// Usually already loaded by init_tracing; existing variables win
		dotenvy::dotenv().ok();

		Ok(Self {
			host: try_load("DASHBOARD_HOST", "0.0.0.0")?,
			port: try_load("DASHBOARD_PORT", "8000")?,
			fixtures_dir: try_load("DASHBOARD_FIXTURES_DIR", "./data/mock-data")?,
			database_path: try_load("DASHBOARD_DATABASE_PATH", "./data/dashboard.db")?,
			demo: DemoSettings {
				restaurants: try_load("DASHBOARD_DEMO_RESTAURANTS", "8")?,
				orders: try_load("DASHBOARD_DEMO_ORDERS", "500")?,
				start: try_load("DASHBOARD_DEMO_START", "2024-01-01")?,
				days: try_load("DASHBOARD_DEMO_DAYS", "30")?,
				seed: try_load("DASHBOARD_DEMO_SEED", "42")?,
			},
		})
	}

	pub fn address(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}
}

fn var(key: &str) -> Option<String> {
	match env::var(key) {
		Ok(value) => Some(value),
		Err(env::VarError::NotPresent) => None,
		Err(e) => {
			warn!("Ignoring {key}: {e}");
			None
		}
	}
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T> where T::Err: Display {
	let raw = var(key).unwrap_or_else(|| {
		info!("{key} not set, using default: {default}");
		default.to_string()
	});

	parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> where T::Err: Display {
	raw.trim()
		.parse()
		.map_err(|e| anyhow!("Invalid {key} value '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn values_parse_into_their_types() {
		let port: u16 = parse_value("DASHBOARD_PORT", " 8080 ").unwrap();
		let start: NaiveDate = parse_value("DASHBOARD_DEMO_START", "2024-03-01").unwrap();

		assert_eq!(port, 8080);
		assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
	}

	#[test]
	fn malformed_values_name_the_variable() {
		let err = parse_value::<u16>("DASHBOARD_PORT", "eighty").unwrap_err();
		assert!(err.to_string().contains("DASHBOARD_PORT"));
	}
}
