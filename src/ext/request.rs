//! Access to the raw auth code submitted with the inbound request.

// crates.io
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Reads raw string values from the inbound request parameters.
pub trait RequestParamSource
where
	Self: Send + Sync,
{
	/// Returns the parameter `name`, nested under `prefix` when one is given.
	fn get(&self, name: &str, prefix: Option<&str>) -> Option<String>;
}

/// Decoded query/form parameters with bracket nesting (`prefix[name]=value`).
///
/// When a key repeats, the last occurrence wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);
impl QueryParams {
	/// Parses an `application/x-www-form-urlencoded` string such as a URL query.
	pub fn parse(query: &str) -> Self {
		Self(form_urlencoded::parse(query.trim_start_matches('?').as_bytes()).into_owned().collect())
	}

	/// Collects the query parameters of `url`.
	pub fn from_url(url: &Url) -> Self {
		Self(url.query_pairs().into_owned().collect())
	}

	/// Appends a parameter.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.push((key.into(), value.into()));

		self
	}
}
impl RequestParamSource for QueryParams {
	fn get(&self, name: &str, prefix: Option<&str>) -> Option<String> {
		let key = match prefix.map(str::trim).filter(|p| !p.is_empty()) {
			Some(prefix) => format!("{prefix}[{name}]"),
			None => name.to_owned(),
		};

		self.0.iter().rev().find(|(k, _)| *k == key).map(|(_, v)| v.clone())
	}
}
