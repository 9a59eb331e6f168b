//! Facet kinds and the facet trait.
//!
//! Lookup never compares concrete Rust types directly: every facet reports an
//! explicit [`FacetKind`] tag, holders key their map by that tag, and only the
//! final typed accessor downcasts.

use std::any::Any;
use std::fmt;

/// Tag identifying one kind of facet. At most one facet per kind lives on a holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FacetKind(&'static str);

impl FacetKind {
	pub const fn new(name: &'static str) -> Self {
		Self(name)
	}

	pub const fn name(self) -> &'static str {
		self.0
	}
}

impl fmt::Display for FacetKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

/// One immutable semantic trait attached to a facet holder.
pub trait Facet: Any + Send + Sync + fmt::Debug {
	/// The tag this facet is stored under.
	fn kind(&self) -> FacetKind;
}

/// Statically known facet kind, enabling typed lookups such as
/// `holder.facet::<NamedFacet>()`.
pub trait FacetType: Facet + Sized {
	const KIND: FacetKind;
}

/// Implements [`Facet`] and [`FacetType`] for a payload type.
///
/// ```ignore
/// #[derive(Debug)]
/// pub struct AuditedFacet;
/// metaspec_facets::define_facet!(AuditedFacet, "audited");
/// ```
#[macro_export]
macro_rules! define_facet {
	($ty:ty, $kind:literal) => {
		impl $crate::Facet for $ty {
			fn kind(&self) -> $crate::FacetKind {
				<$ty as $crate::FacetType>::KIND
			}
		}

		impl $crate::FacetType for $ty {
			const KIND: $crate::FacetKind = $crate::FacetKind::new($kind);
		}
	};
}
