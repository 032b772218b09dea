use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use campusfind_config::Error;

const SAMPLE_CONFIG: &str = r#"
[service]
log_level = "info"

[matcher]
api_base = "https://matcher.example.edu/"
api_key = "test-key"
"#;

fn write_temp_config(payload: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("campusfind_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load(payload: &str) -> campusfind_config::Result<campusfind_config::Config> {
	let path = write_temp_config(payload);
	let result = campusfind_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

#[test]
fn sample_config_loads_with_defaults() {
	let cfg = load(SAMPLE_CONFIG).expect("Expected sample config to load.");

	assert_eq!(cfg.matcher.path, "/api/v1/match");
	assert_eq!(cfg.matcher.connect_timeout_ms, 10_000);
	assert_eq!(cfg.matcher.read_timeout_ms, 15_000);
	assert_eq!(cfg.chat.channel_capacity, 16);
}

#[test]
fn api_base_is_normalized_without_trailing_slash() {
	let cfg = load(SAMPLE_CONFIG).expect("Expected sample config to load.");

	assert_eq!(cfg.matcher.api_base, "https://matcher.example.edu");
}

#[test]
fn empty_api_key_is_rejected() {
	let payload = SAMPLE_CONFIG.replace("test-key", " ");
	let err = load(&payload).expect_err("Expected api_key validation error.");

	assert!(matches!(err, Error::Validation { .. }));
	assert!(err.to_string().contains("matcher.api_key"));
}

#[test]
fn non_http_api_base_is_rejected() {
	let payload = SAMPLE_CONFIG.replace("https://matcher.example.edu/", "matcher.example.edu");
	let err = load(&payload).expect_err("Expected api_base validation error.");

	assert!(err.to_string().contains("matcher.api_base"));
}

#[test]
fn zero_timeout_is_rejected() {
	let payload = format!("{SAMPLE_CONFIG}connect_timeout_ms = 0\n");
	let err = load(&payload).expect_err("Expected timeout validation error.");

	assert!(err.to_string().contains("connect_timeout_ms"));
}
