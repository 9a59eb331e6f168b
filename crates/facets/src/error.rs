use thiserror::Error;

use crate::{FacetKind, HolderId};

/// Errors raised by the facet model itself.
///
/// Precedence conflicts are not errors; they resolve silently through
/// [`crate::FacetHolder::add_facet`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacetError {
	/// A facet was contributed after the holder finished introspection.
	#[error("holder '{holder}' is sealed; cannot install facet '{kind}'")]
	Sealed { holder: HolderId, kind: FacetKind },
	/// A member-order sequence did not parse as dot-separated integers.
	#[error("invalid member order sequence '{0}'")]
	InvalidSequence(String),
}
