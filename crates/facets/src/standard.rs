//! Facet payloads understood by the engine itself.
//!
//! Everything else (UI hints, persistence mapping, validation) is contributed
//! by downstream crates through [`crate::define_facet!`].

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::FacetError;
use crate::define_facet;

/// Display name of a type or member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedFacet {
	name: String,
}

impl NamedFacet {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

define_facet!(NamedFacet, "named");

/// Plural display name of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralFacet {
	plural: String,
}

impl PluralFacet {
	pub fn new(plural: impl Into<String>) -> Self {
		Self {
			plural: plural.into(),
		}
	}

	pub fn plural(&self) -> &str {
		&self.plural
	}
}

define_facet!(PluralFacet, "plural");

/// Whether a member is hidden from consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HiddenFacet {
	hidden: bool,
}

impl HiddenFacet {
	pub const fn new(hidden: bool) -> Self {
		Self { hidden }
	}

	pub const fn is_hidden(&self) -> bool {
		self.hidden
	}
}

define_facet!(HiddenFacet, "hidden");

/// Free-text description of a type or member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribedAsFacet {
	description: String,
}

impl DescribedAsFacet {
	pub fn new(description: impl Into<String>) -> Self {
		Self {
			description: description.into(),
		}
	}

	pub fn description(&self) -> &str {
		&self.description
	}
}

define_facet!(DescribedAsFacet, "described-as");

/// Dewey-decimal position (`1`, `1.2`, `1.10.3`).
///
/// Ordered component-wise; a prefix sorts before its extensions (`1.2 < 1.2.1`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeweySequence(SmallVec<[u32; 4]>);

impl DeweySequence {
	pub fn components(&self) -> &[u32] {
		&self.0
	}
}

impl FromStr for DeweySequence {
	type Err = FacetError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		if trimmed.is_empty() {
			return Err(FacetError::InvalidSequence(s.to_string()));
		}
		trimmed
			.split('.')
			.map(|part| part.trim().parse::<u32>())
			.collect::<Result<SmallVec<_>, _>>()
			.map(Self)
			.map_err(|_| FacetError::InvalidSequence(s.to_string()))
	}
}

impl fmt::Display for DeweySequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, part) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(".")?;
			}
			write!(f, "{part}")?;
		}
		Ok(())
	}
}

/// Layout group and position of a member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberOrderFacet {
	sequence: Option<DeweySequence>,
	group: Option<String>,
}

impl MemberOrderFacet {
	pub fn new(sequence: Option<DeweySequence>, group: Option<String>) -> Self {
		Self { sequence, group }
	}

	/// Parses `sequence` when present.
	pub fn parse(sequence: Option<&str>, group: Option<&str>) -> Result<Self, FacetError> {
		let sequence = sequence.map(str::parse).transpose()?;
		Ok(Self {
			sequence,
			group: group.map(str::to_string),
		})
	}

	pub fn sequence(&self) -> Option<&DeweySequence> {
		self.sequence.as_ref()
	}

	pub fn group(&self) -> Option<&str> {
		self.group.as_deref()
	}
}

define_facet!(MemberOrderFacet, "member-order");
