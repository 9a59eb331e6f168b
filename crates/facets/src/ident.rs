//! Identities for domain types and facet holders.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Stable identity of a domain type, usually its fully-qualified path.
///
/// Cheap to clone. Hashes and compares like the underlying string so maps
/// keyed by `TypeKey` can be queried with `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Arc<str>);

impl TypeKey {
	pub fn new(key: impl Into<Arc<str>>) -> Self {
		Self(key.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the last path segment (`demo::CustomerOrder` -> `CustomerOrder`).
	pub fn simple_name(&self) -> &str {
		self.0.rsplit("::").next().unwrap_or(&self.0)
	}
}

impl Borrow<str> for TypeKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for TypeKey {
	fn from(key: &str) -> Self {
		Self::new(key)
	}
}

impl From<String> for TypeKey {
	fn from(key: String) -> Self {
		Self::new(key)
	}
}

impl From<&TypeKey> for TypeKey {
	fn from(key: &TypeKey) -> Self {
		key.clone()
	}
}

impl fmt::Display for TypeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Identifier of one facet holder.
///
/// Type-level holders use the type key; members append `#member`, parameters
/// append `#member[index]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HolderId(Arc<str>);

impl HolderId {
	pub fn new(id: impl Into<Arc<str>>) -> Self {
		Self(id.into())
	}

	pub fn for_type(key: &TypeKey) -> Self {
		Self(Arc::clone(&key.0))
	}

	pub fn for_member(owner: &TypeKey, member: &str) -> Self {
		Self::new(format!("{owner}#{member}"))
	}

	pub fn for_parameter(owner: &TypeKey, member: &str, index: usize) -> Self {
		Self::new(format!("{owner}#{member}[{index}]"))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for HolderId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
