use std::fmt;

/// The kind of feature a facet holder represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
	/// A whole domain type.
	Object,
	/// A scalar-valued or reference-valued member.
	Property,
	/// A member holding many references.
	Collection,
	/// An invocable member.
	Action,
	/// One parameter of an action.
	ActionParameter,
}

impl FeatureKind {
	/// Every kind, in declaration order.
	pub const ALL: &'static [FeatureKind] = &[
		Self::Object,
		Self::Property,
		Self::Collection,
		Self::Action,
		Self::ActionParameter,
	];

	/// Member kinds: properties, collections and actions.
	pub const MEMBERS: &'static [FeatureKind] = &[Self::Property, Self::Collection, Self::Action];

	/// Properties and collections.
	pub const fn is_association(self) -> bool {
		matches!(self, Self::Property | Self::Collection)
	}

	pub const fn is_action(self) -> bool {
		matches!(self, Self::Action)
	}

	pub const fn is_member(self) -> bool {
		matches!(self, Self::Property | Self::Collection | Self::Action)
	}
}

impl fmt::Display for FeatureKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Object => write!(f, "object"),
			Self::Property => write!(f, "property"),
			Self::Collection => write!(f, "collection"),
			Self::Action => write!(f, "action"),
			Self::ActionParameter => write!(f, "action-parameter"),
		}
	}
}
