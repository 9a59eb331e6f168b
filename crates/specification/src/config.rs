//! Engine configuration, deserialized from TOML.
//!
//! Every field has a default, so an empty document is a valid configuration.

use std::collections::BTreeMap;
use std::path::Path;

use metaspec_facets::TypeKey;
use serde::Deserialize;
use thiserror::Error;


/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error reading '{path}': {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetamodelConfig {
	pub introspection: IntrospectionConfig,
	pub naming: NamingConfig,
	pub ordering: OrderingConfig,
	/// Per-type layout overrides, keyed by type key.
	pub layouts: BTreeMap<String, TypeLayout>,
}

impl MetamodelConfig {
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(source)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.display().to_string(),
			source,
		})?;
		Self::from_toml_str(&source)
	}

	pub fn is_excluded(&self, key: &TypeKey) -> bool {
		self.introspection
			.excluded_types
			.iter()
			.any(|excluded| excluded == key.as_str())
	}

	pub fn member_layout(&self, owner: &TypeKey, member: &str) -> Option<&MemberLayout> {
		self.layouts.get(owner.as_str())?.members.get(member)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntrospectionConfig {
	pub policy: IntrospectionPolicy,
	pub excluded_types: Vec<String>,
}

/// Which declared members become faceted methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntrospectionPolicy {
	/// Every declared member is introspected.
	#[default]
	AnnotationOptional,
	/// Only members annotated `Property`, `Collection` or `Action`.
	AnnotationRequired,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
	pub infer_plural: bool,
}

impl Default for NamingConfig {
	fn default() -> Self {
		Self { infer_plural: true }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderingConfig {
	/// Group for members without an explicit group.
	pub default_group: String,
}

impl Default for OrderingConfig {
	fn default() -> Self {
		Self {
			default_group: "General".to_string(),
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeLayout {
	pub members: BTreeMap<String, MemberLayout>,
}

/// Layout override for one member. Applied at high precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemberLayout {
	pub group: Option<String>,
	pub sequence: Option<String>,
	pub hidden: Option<bool>,
	pub named: Option<String>,
}
