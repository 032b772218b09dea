pub mod matcher;

use color_eyre::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

pub fn api_headers(api_key: &str) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();
	headers.insert(API_KEY_HEADER, HeaderValue::from_str(api_key)?);
	Ok(headers)
}
