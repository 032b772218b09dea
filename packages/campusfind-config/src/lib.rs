mod error;
mod types;

pub use error::{Error, Result};
pub use types::{ChatConfig, Config, MatcherConfig, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.matcher.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "matcher.api_base must be non-empty.".to_string(),
		});
	}
	if !cfg.matcher.api_base.starts_with("http://") && !cfg.matcher.api_base.starts_with("https://")
	{
		return Err(Error::Validation {
			message: "matcher.api_base must be an http(s) URL.".to_string(),
		});
	}
	if cfg.matcher.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "matcher.api_key must be non-empty.".to_string(),
		});
	}
	if !cfg.matcher.path.starts_with('/') {
		return Err(Error::Validation {
			message: "matcher.path must start with '/'.".to_string(),
		});
	}
	if cfg.matcher.connect_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "matcher.connect_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.matcher.read_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "matcher.read_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.chat.channel_capacity == 0 {
		return Err(Error::Validation {
			message: "chat.channel_capacity must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	while cfg.matcher.api_base.ends_with('/') {
		cfg.matcher.api_base.pop();
	}
}
