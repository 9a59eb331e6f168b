//! Value facets and the selection algebra.

use std::fmt;
use std::sync::Arc;

use metaspec_facets::{FacetHolder, TypeKey, define_facet};

use crate::{
	EncoderDecoder, OrderRelation, Parser, PseudoProvider, QualifierSet, Renderer,
	ValueSemanticsProvider, qualifiers_match,
};


/// One provider registered for a value type, with the qualifiers it serves.
#[derive(Clone)]
pub struct SemanticsCandidate {
	provider: Arc<dyn ValueSemanticsProvider>,
	qualifiers: QualifierSet,
}

impl SemanticsCandidate {
	pub fn new(provider: Arc<dyn ValueSemanticsProvider>, qualifiers: QualifierSet) -> Self {
		Self {
			provider,
			qualifiers,
		}
	}

	pub fn provider(&self) -> &Arc<dyn ValueSemanticsProvider> {
		&self.provider
	}

	pub fn qualifiers(&self) -> &QualifierSet {
		&self.qualifiers
	}
}

impl fmt::Debug for SemanticsCandidate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SemanticsCandidate")
			.field("provider", &self.provider.id())
			.field("qualifiers", &self.qualifiers)
			.finish()
	}
}

/// Marks a type as a value type and carries its ordered candidate set.
#[derive(Debug, Clone)]
pub struct ValueFacet {
	value_type: TypeKey,
	candidates: Vec<SemanticsCandidate>,
}

define_facet!(ValueFacet, "value");

/// Qualifiers a property or parameter accepts when selecting semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSemanticsSelectingFacet {
	accepted: QualifierSet,
}

impl ValueSemanticsSelectingFacet {
	pub fn new(accepted: QualifierSet) -> Self {
		Self { accepted }
	}

	pub fn accepted(&self) -> &QualifierSet {
		&self.accepted
	}
}

define_facet!(ValueSemanticsSelectingFacet, "value-semantics-selecting");

impl ValueFacet {
	pub fn new(value_type: TypeKey, candidates: Vec<SemanticsCandidate>) -> Self {
		Self {
			value_type,
			candidates,
		}
	}

	pub fn value_type(&self) -> &TypeKey {
		&self.value_type
	}

	pub fn candidates(&self) -> &[SemanticsCandidate] {
		&self.candidates
	}

	/// Qualifiers accepted by `feature`; empty when it carries no selecting facet.
	pub fn accepted_qualifiers(feature: &FacetHolder) -> QualifierSet {
		feature
			.facet::<ValueSemanticsSelectingFacet>()
			.map(|selecting| selecting.accepted().clone())
			.unwrap_or_default()
	}

	/// Candidates serving `accepted`, in candidate order.
	pub fn matching<'a>(
		&'a self,
		accepted: &'a QualifierSet,
	) -> impl Iterator<Item = &'a SemanticsCandidate> + 'a {
		self.candidates
			.iter()
			.filter(move |candidate| qualifiers_match(accepted, &candidate.qualifiers))
	}

	pub fn select_parser(&self, feature: &FacetHolder) -> Arc<dyn Parser> {
		self.select(feature, "parser", |p| p.parser())
			.unwrap_or_else(|pseudo| Arc::new(pseudo) as Arc<dyn Parser>)
	}

	pub fn select_renderer(&self, feature: &FacetHolder) -> Arc<dyn Renderer> {
		self.select(feature, "renderer", |p| p.renderer())
			.unwrap_or_else(|pseudo| Arc::new(pseudo) as Arc<dyn Renderer>)
	}

	pub fn select_encoder_decoder(&self, feature: &FacetHolder) -> Arc<dyn EncoderDecoder> {
		self.select(feature, "encoder/decoder", |p| p.encoder_decoder())
			.unwrap_or_else(|pseudo| Arc::new(pseudo) as Arc<dyn EncoderDecoder>)
	}

	pub fn select_order_relation(&self, feature: &FacetHolder) -> Arc<dyn OrderRelation> {
		self.select(feature, "order relation", |p| p.order_relation())
			.unwrap_or_else(|pseudo| Arc::new(pseudo) as Arc<dyn OrderRelation>)
	}

	fn select<T: ?Sized>(
		&self,
		feature: &FacetHolder,
		semantics: &'static str,
		offer: impl Fn(&dyn ValueSemanticsProvider) -> Option<Arc<T>>,
	) -> Result<Arc<T>, PseudoProvider> {
		let accepted = Self::accepted_qualifiers(feature);
		if let Some(found) = self
			.matching(&accepted)
			.find_map(|candidate| offer(&*candidate.provider))
		{
			return Ok(found);
		}

		let diagnostic = format!(
			"no {semantics} for value type '{}' matches feature '{}' (accepted qualifiers {accepted})",
			self.value_type,
			feature.id()
		);
		tracing::warn!(
			value_type = %self.value_type,
			feature = %feature.id(),
			semantics,
			"value semantics selection degraded to pseudo-provider"
		);
		Err(PseudoProvider::new(diagnostic))
	}
}
