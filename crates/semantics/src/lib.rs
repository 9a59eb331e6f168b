//! Value semantics: parsing, rendering, encoding and ordering of value types.
//!
//! A value type's specification carries a [`ValueFacet`] listing every
//! [`ValueSemanticsProvider`] registered for it, each optionally restricted by
//! qualifiers. A requesting feature (a property or parameter) may carry a
//! [`ValueSemanticsSelectingFacet`] naming the qualifiers it accepts.
//!
//! # Selection Contract
//!
//! For each semantics kind independently, the first candidate (in candidate
//! order) that matches the qualifier algebra and offers that kind wins:
//!
//! | accepted | offered | match |
//! |----------|---------|-------|
//! | empty | empty | yes |
//! | empty | non-empty | no |
//! | non-empty | empty | no |
//! | non-empty | non-empty | iff the sets intersect |
//!
//! When nothing matches, a [`PseudoProvider`] carrying a diagnostic is
//! returned instead of absence.

pub mod builtins;
mod error;
mod facet;
pub mod provider;
mod pseudo;
mod qualifier;
mod registry;
mod value;

pub use error::SemanticsError;
pub use facet::{SemanticsCandidate, ValueFacet, ValueSemanticsSelectingFacet};
pub use provider::{EncoderDecoder, OrderRelation, Parser, Renderer, ValueSemanticsProvider};
pub use pseudo::PseudoProvider;
pub use qualifier::{QualifierSet, qualifiers_match};
pub use registry::ValueSemanticsRegistry;
pub use value::Value;
