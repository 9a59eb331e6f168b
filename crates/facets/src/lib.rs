//! Facet model shared by every metaspec crate.
//!
//! A facet is one immutable semantic trait (a display name, a hidden policy, a
//! value-semantics candidate set, ...) attached to a [`FacetHolder`]. Holders
//! keep at most one facet per [`FacetKind`]; competing contributions are
//! resolved by [`Precedence`].
//!
//! # Precedence Contract
//!
//! 1. No facet of the kind yet: the candidate is installed.
//! 2. Strictly higher precedence: the candidate replaces the incumbent.
//! 3. Strictly lower precedence: the candidate is discarded.
//! 4. Equal precedence: the later candidate wins unless the incumbent was
//!    installed as non-replaceable.
//!
//! - Enforced in: [`precedence::challenger_wins`], [`FacetHolder::add_facet`]
//! - Tested by: `holder::tests`
//! - Failure symptom: a generic default clobbers an explicit choice, or a
//!   layout override is ignored.

mod error;
pub mod feature;
pub mod holder;
pub mod ident;
pub mod kind;
pub mod naming;
pub mod precedence;
pub mod standard;

pub use error::FacetError;
pub use feature::FeatureKind;
pub use holder::{
	FacetCandidate, FacetContention, FacetHolder, InstallAction, InstalledFacet, Resolution,
};
pub use ident::{HolderId, TypeKey};
pub use kind::{Facet, FacetKind, FacetType};
pub use naming::{natural_name, plural_name};
pub use precedence::Precedence;
pub use standard::{
	DescribedAsFacet, DeweySequence, HiddenFacet, MemberOrderFacet, NamedFacet, PluralFacet,
};
