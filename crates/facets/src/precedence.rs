//! Precedence tiers and the override rule.

use std::cmp::Ordering;
use std::fmt;

/// Ranking used to decide which contributed facet of a kind wins.
///
/// Ordered `Fallback < Default < Inferred < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Precedence {
	/// Only guarantees that a kind is never absent; anything else overrides it.
	Fallback,
	/// Contributed from an annotation or a configured default.
	#[default]
	Default,
	/// Synthesized by the engine from other information (e.g. a type's name).
	Inferred,
	/// Authoritative sources such as explicit layout configuration.
	High,
}

impl Precedence {
	pub const fn is_fallback(self) -> bool {
		matches!(self, Self::Fallback)
	}

	pub const fn rank(self) -> u8 {
		match self {
			Self::Fallback => 0,
			Self::Default => 1,
			Self::Inferred => 2,
			Self::High => 3,
		}
	}
}

impl fmt::Display for Precedence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Fallback => write!(f, "fallback"),
			Self::Default => write!(f, "default"),
			Self::Inferred => write!(f, "inferred"),
			Self::High => write!(f, "high"),
		}
	}
}

/// Returns `true` if a challenger of precedence `challenger` replaces an
/// incumbent of precedence `incumbent`.
///
/// Equal precedence is last-contributor-wins unless the incumbent is not
/// replaceable.
pub fn challenger_wins(
	incumbent: Precedence,
	incumbent_replaceable: bool,
	challenger: Precedence,
) -> bool {
	match challenger.cmp(&incumbent) {
		Ordering::Greater => true,
		Ordering::Less => false,
		Ordering::Equal => incumbent_replaceable,
	}
}
