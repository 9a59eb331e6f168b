use std::sync::Arc;

use metaspec_facets::TypeKey;
use rustc_hash::FxHashMap;

use crate::builtins::{BoolSemantics, FloatSemantics, IntSemantics, TextSemantics};
use crate::{QualifierSet, SemanticsCandidate, ValueFacet, ValueSemanticsProvider};

/// Providers registered per value type, in registration order.
#[derive(Default, Clone)]
pub struct ValueSemanticsRegistry {
	by_type: FxHashMap<TypeKey, Vec<SemanticsCandidate>>,
}

impl ValueSemanticsRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry pre-populated with [`crate::builtins`] for `bool`, `i64`,
	/// `f64` and `String`.
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry.register("bool", Arc::new(BoolSemantics), QualifierSet::new());
		registry.register("i64", Arc::new(IntSemantics), QualifierSet::new());
		registry.register("f64", Arc::new(FloatSemantics), QualifierSet::new());
		registry.register("String", Arc::new(TextSemantics), QualifierSet::new());
		registry
	}

	pub fn register(
		&mut self,
		value_type: impl Into<TypeKey>,
		provider: Arc<dyn ValueSemanticsProvider>,
		qualifiers: QualifierSet,
	) -> &mut Self {
		self.by_type
			.entry(value_type.into())
			.or_default()
			.push(SemanticsCandidate::new(provider, qualifiers));
		self
	}

	pub fn candidates(&self, value_type: &TypeKey) -> &[SemanticsCandidate] {
		self.by_type
			.get(value_type)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	pub fn is_value_type(&self, value_type: &TypeKey) -> bool {
		self.by_type.contains_key(value_type)
	}

	/// Builds the facet carrying every candidate for `value_type`.
	pub fn value_facet(&self, value_type: &TypeKey) -> ValueFacet {
		ValueFacet::new(value_type.clone(), self.candidates(value_type).to_vec())
	}

	pub fn len(&self) -> usize {
		self.by_type.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_type.is_empty()
	}
}

impl std::fmt::Debug for ValueSemanticsRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut types: Vec<_> = self.by_type.keys().map(TypeKey::as_str).collect();
		types.sort_unstable();
		f.debug_struct("ValueSemanticsRegistry")
			.field("types", &types)
			.finish()
	}
}
