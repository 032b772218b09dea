use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub matcher: MatcherConfig,
	#[serde(default)]
	pub chat: ChatConfig,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

/// Remote matcher endpoint. The connect/read timeouts default to the
/// values the matcher deployment is provisioned for.
#[derive(Debug, Deserialize)]
pub struct MatcherConfig {
	pub api_base: String,
	pub api_key: String,
	#[serde(default = "default_matcher_path")]
	pub path: String,
	#[serde(default = "default_connect_timeout_ms")]
	pub connect_timeout_ms: u64,
	#[serde(default = "default_read_timeout_ms")]
	pub read_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
	/// Snapshot buffer per live conversation subscription.
	pub channel_capacity: usize,
}
impl Default for ChatConfig {
	fn default() -> Self {
		Self { channel_capacity: 16 }
	}
}

fn default_matcher_path() -> String {
	"/api/v1/match".to_string()
}

fn default_connect_timeout_ms() -> u64 {
	10_000
}

fn default_read_timeout_ms() -> u64 {
	15_000
}
