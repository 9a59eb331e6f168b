use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

/// Set of opaque qualifier strings, kept sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QualifierSet(SmallVec<[Arc<str>; 2]>);

impl QualifierSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a comma-separated list, ignoring blank entries.
	pub fn parse(list: &str) -> Self {
		list.split(',').map(str::trim).filter(|q| !q.is_empty()).collect()
	}

	pub fn insert(&mut self, qualifier: impl Into<Arc<str>>) {
		let qualifier = qualifier.into();
		if let Err(pos) = self.0.binary_search(&qualifier) {
			self.0.insert(pos, qualifier);
		}
	}

	pub fn contains(&self, qualifier: &str) -> bool {
		self.0.iter().any(|q| &**q == qualifier)
	}

	pub fn intersects(&self, other: &QualifierSet) -> bool {
		self.0.iter().any(|q| other.contains(q))
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|q| &**q)
	}
}

impl<S: Into<Arc<str>>> FromIterator<S> for QualifierSet {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		let mut set = Self::new();
		for q in iter {
			set.insert(q);
		}
		set
	}
}

impl fmt::Display for QualifierSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{{")?;
		for (i, q) in self.0.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			f.write_str(q)?;
		}
		write!(f, "}}")
	}
}

/// The qualifier algebra: does a candidate offering `offered` serve a request
/// accepting `accepted`?
///
/// A generic request never picks a qualified candidate and a qualified request
/// never falls back to a generic one.
pub fn qualifiers_match(accepted: &QualifierSet, offered: &QualifierSet) -> bool {
	match (accepted.is_empty(), offered.is_empty()) {
		(true, true) => true,
		(true, false) | (false, true) => false,
		(false, false) => accepted.intersects(offered),
	}
}
