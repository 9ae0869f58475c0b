//! Route path patterns.
//!
//! A pattern is a path in which segments written `:name` match any
//! non-empty text without `/`. Everything else matches literally.

use std::collections::HashMap;
use std::fmt;

use gestor_core::error_log;
use regex::Regex;

/// A compiled route path.
#[derive(Clone)]
pub struct PathPattern {
	path: String,
	param_names: Vec<String>,
	matcher: Option<Regex>,
}

impl fmt::Debug for PathPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PathPattern")
			.field("path", &self.path)
			.field("param_names", &self.param_names)
			.finish()
	}
}

fn is_name_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

impl PathPattern {
	/// Compiles `path`.
	///
	/// Paths without parameters never build a matcher and only match
	/// exactly. If the matcher cannot be built the error is logged and the
	/// pattern only matches exactly.
	pub fn new(path: &str) -> Self {
		let mut param_names = Vec::new();
		let mut source = String::from("^");
		let mut literal = String::new();
		let mut chars = path.chars().peekable();

		while let Some(c) = chars.next() {
			if c == ':' && chars.peek().copied().is_some_and(is_name_char) {
				let mut name = String::new();
				while let Some(&next) = chars.peek() {
					if !is_name_char(next) {
						break;
					}
					name.push(next);
					chars.next();
				}
				source.push_str(&regex::escape(&literal));
				literal.clear();
				source.push_str("([^/]+)");
				param_names.push(name);
			} else {
				literal.push(c);
			}
		}
		source.push_str(&regex::escape(&literal));
		source.push('$');

		let matcher = if param_names.is_empty() {
			None
		} else {
			match Regex::new(&source) {
				Ok(regex) => Some(regex),
				Err(e) => {
					error_log!("Invalid route pattern '{}': {}", path, e);
					None
				}
			}
		};

		Self {
			path: path.to_string(),
			param_names,
			matcher,
		}
	}

	/// The path as registered.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Parameter names in order of appearance.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns true when the pattern declares `:name` segments.
	pub fn has_params(&self) -> bool {
		!self.param_names.is_empty()
	}

	/// Returns true when `path` is exactly the registered path.
	pub fn matches_exactly(&self, path: &str) -> bool {
		self.path == path
	}

	/// Matches `path` against the parameter segments and returns the
	/// captured values. Always `None` for patterns without parameters.
	pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
		let captures = self.matcher.as_ref()?.captures(path)?;
		Some(
			self.param_names
				.iter()
				.zip(captures.iter().skip(1))
				.filter_map(|(name, value)| Some((name.clone(), value?.as_str().to_string())))
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_static_path_has_no_matcher() {
		let pattern = PathPattern::new("/dashboard");
		assert!(!pattern.has_params());
		assert!(pattern.matches_exactly("/dashboard"));
		assert_eq!(pattern.captures("/dashboard"), None);
	}

	#[rstest]
	fn test_single_param() {
		let pattern = PathPattern::new("/trabajos/:id");
		assert_eq!(pattern.param_names(), ["id"]);
		let params = pattern.captures("/trabajos/abc123").unwrap();
		assert_eq!(params.get("id").map(String::as_str), Some("abc123"));
	}

	#[rstest]
	fn test_multiple_params() {
		let pattern = PathPattern::new("/empresas/:empresa_id/clientes/:id");
		let params = pattern.captures("/empresas/9/clientes/42").unwrap();
		assert_eq!(params["empresa_id"], "9");
		assert_eq!(params["id"], "42");
	}

	#[rstest]
	#[case("/trabajos/")]
	#[case("/trabajos/1/editar")]
	#[case("/trabajos")]
	#[case("x/trabajos/1")]
	fn test_param_does_not_cross_segments(#[case] path: &str) {
		assert_eq!(PathPattern::new("/trabajos/:id").captures(path), None);
	}

	#[rstest]
	fn test_literal_metacharacters_are_escaped() {
		let pattern = PathPattern::new("/files.v2/:name");
		assert!(pattern.captures("/files.v2/a").is_some());
		assert!(pattern.captures("/filesXv2/a").is_none());
	}

	#[rstest]
	fn test_colon_without_name_is_literal() {
		let pattern = PathPattern::new("/time/:/:h");
		assert_eq!(pattern.param_names(), ["h"]);
		assert!(pattern.captures("/time/:/10").is_some());
	}
}
