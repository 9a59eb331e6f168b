//! Builtin facet factories.
//!
//! Annotation vocabulary understood here:
//!
//! | annotation | attributes | facet |
//! |---|---|---|
//! | `Named` | `value` | [`NamedFacet`] |
//! | `Plural` | `value` | [`PluralFacet`] (types only) |
//! | `Hidden` | `value` (optional, `"false"` to unhide) | [`HiddenFacet`] |
//! | `DescribedAs` | `value` | [`DescribedAsFacet`] |
//! | `MemberOrder` | `sequence`, `group` | [`MemberOrderFacet`] |
//! | `Value` | none | [`ValueFacet`](metaspec_semantics::ValueFacet) |
//! | `ValueSemantics` | `qualifiers` (comma separated) | [`ValueSemanticsSelectingFacet`] |

use std::sync::Arc;

use metaspec_facets::{
	DescribedAsFacet, DeweySequence, FacetCandidate, FeatureKind, HiddenFacet, MemberOrderFacet,
	NamedFacet, PluralFacet, natural_name,
};
use metaspec_semantics::{QualifierSet, ValueSemanticsRegistry, ValueSemanticsSelectingFacet};

use super::{ClassContext, FacetFactory, MemberContext, ParameterContext, ProcessingStage};
use crate::{Annotations, ContributorError};

const MEMBERS_AND_PARAMETERS: &[FeatureKind] = &[
	FeatureKind::Property,
	FeatureKind::Collection,
	FeatureKind::Action,
	FeatureKind::ActionParameter,
];

const EVERYTHING: &[FeatureKind] = FeatureKind::ALL;

fn value_of<'a>(annotations: &'a Annotations, name: &str) -> Option<&'a str> {
	annotations.get(name)?.attribute("value")
}

/// Guarantees every member and parameter has a name and a hidden policy.
#[derive(Debug, Clone, Copy)]
pub struct FallbackFactory;

impl FacetFactory for FallbackFactory {
	fn id(&self) -> &'static str {
		"fallback"
	}

	fn stage(&self) -> ProcessingStage {
		ProcessingStage::Fallback
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		MEMBERS_AND_PARAMETERS
	}

	fn process_member(&self, cx: &mut MemberContext<'_>) -> Result<(), ContributorError> {
		cx.holder
			.add_facet(FacetCandidate::fallback(NamedFacet::new(natural_name(&cx.member.id))))?;
		cx.holder
			.add_facet(FacetCandidate::fallback(HiddenFacet::new(false)))?;
		Ok(())
	}

	fn process_parameter(&self, cx: &mut ParameterContext<'_>) -> Result<(), ContributorError> {
		cx.holder.add_facet(FacetCandidate::fallback(NamedFacet::new(natural_name(
			&cx.parameter.name,
		))))?;
		Ok(())
	}
}

/// `Named` and `Plural` annotations.
#[derive(Debug, Clone, Copy)]
pub struct NamedAnnotationFactory;

impl FacetFactory for NamedAnnotationFactory {
	fn id(&self) -> &'static str {
		"named-annotation"
	}

	fn stage(&self) -> ProcessingStage {
		ProcessingStage::Naming
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		EVERYTHING
	}

	fn process_class(&self, cx: &mut ClassContext<'_>) -> Result<(), ContributorError> {
		let annotations = &cx.descriptor.annotations;
		if let Some(name) = value_of(annotations, "Named") {
			cx.holder.add_facet(FacetCandidate::at_default(NamedFacet::new(name)))?;
		}
		if let Some(plural) = value_of(annotations, "Plural") {
			cx.holder
				.add_facet(FacetCandidate::at_default(PluralFacet::new(plural)))?;
		}
		Ok(())
	}

	fn process_member(&self, cx: &mut MemberContext<'_>) -> Result<(), ContributorError> {
		if let Some(name) = value_of(&cx.member.annotations, "Named") {
			cx.holder.add_facet(FacetCandidate::at_default(NamedFacet::new(name)))?;
		}
		Ok(())
	}

	fn process_parameter(&self, cx: &mut ParameterContext<'_>) -> Result<(), ContributorError> {
		if let Some(name) = value_of(&cx.parameter.annotations, "Named") {
			cx.holder.add_facet(FacetCandidate::at_default(NamedFacet::new(name)))?;
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Copy)]
pub struct HiddenAnnotationFactory;

impl FacetFactory for HiddenAnnotationFactory {
	fn id(&self) -> &'static str {
		"hidden-annotation"
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		FeatureKind::MEMBERS
	}

	fn process_member(&self, cx: &mut MemberContext<'_>) -> Result<(), ContributorError> {
		let Some(annotation) = cx.member.annotations.get("Hidden") else {
			return Ok(());
		};
		let hidden = match annotation.attribute("value") {
			None => true,
			Some(value) => value.trim().parse::<bool>()?,
		};
		cx.holder
			.add_facet(FacetCandidate::at_default(HiddenFacet::new(hidden)))?;
		Ok(())
	}
}

#[derive(Debug, Clone, Copy)]
pub struct DescribedAsAnnotationFactory;

impl FacetFactory for DescribedAsAnnotationFactory {
	fn id(&self) -> &'static str {
		"described-as-annotation"
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		EVERYTHING
	}

	fn process_class(&self, cx: &mut ClassContext<'_>) -> Result<(), ContributorError> {
		if let Some(text) = value_of(&cx.descriptor.annotations, "DescribedAs") {
			cx.holder
				.add_facet(FacetCandidate::at_default(DescribedAsFacet::new(text)))?;
		}
		Ok(())
	}

	fn process_member(&self, cx: &mut MemberContext<'_>) -> Result<(), ContributorError> {
		if let Some(text) = value_of(&cx.member.annotations, "DescribedAs") {
			cx.holder
				.add_facet(FacetCandidate::at_default(DescribedAsFacet::new(text)))?;
		}
		Ok(())
	}

	fn process_parameter(&self, cx: &mut ParameterContext<'_>) -> Result<(), ContributorError> {
		if let Some(text) = value_of(&cx.parameter.annotations, "DescribedAs") {
			cx.holder
				.add_facet(FacetCandidate::at_default(DescribedAsFacet::new(text)))?;
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Copy)]
pub struct MemberOrderAnnotationFactory;

impl FacetFactory for MemberOrderAnnotationFactory {
	fn id(&self) -> &'static str {
		"member-order-annotation"
	}

	fn stage(&self) -> ProcessingStage {
		ProcessingStage::Members
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		FeatureKind::MEMBERS
	}

	fn process_member(&self, cx: &mut MemberContext<'_>) -> Result<(), ContributorError> {
		let Some(annotation) = cx.member.annotations.get("MemberOrder") else {
			return Ok(());
		};
		let facet = MemberOrderFacet::parse(
			annotation.attribute("sequence"),
			annotation.attribute("group"),
		)?;
		cx.holder.add_facet(FacetCandidate::at_default(facet))?;
		Ok(())
	}
}

/// Marks value types with their candidate set.
///
/// A type is a value type when the registry knows it or when it carries a
/// `Value` annotation. Annotated types without registered providers get an
/// empty candidate set, so every selection degrades to a pseudo-provider.
#[derive(Debug, Clone)]
pub struct ValueFactory {
	registry: Arc<ValueSemanticsRegistry>,
}

impl ValueFactory {
	pub fn new(registry: Arc<ValueSemanticsRegistry>) -> Self {
		Self { registry }
	}
}

impl FacetFactory for ValueFactory {
	fn id(&self) -> &'static str {
		"value"
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		&[FeatureKind::Object]
	}

	fn process_class(&self, cx: &mut ClassContext<'_>) -> Result<(), ContributorError> {
		let key = &cx.descriptor.key;
		if self.registry.is_value_type(key) || cx.descriptor.annotations.has("Value") {
			cx.holder
				.add_facet(FacetCandidate::at_default(self.registry.value_facet(key)))?;
		}
		Ok(())
	}
}

/// `ValueSemantics(qualifiers = "...")` on properties and parameters.
#[derive(Debug, Clone, Copy)]
pub struct ValueSemanticsAnnotationFactory;

impl ValueSemanticsAnnotationFactory {
	fn selecting(annotations: &Annotations) -> Option<ValueSemanticsSelectingFacet> {
		let qualifiers = annotations.get("ValueSemantics")?.attribute("qualifiers")?;
		Some(ValueSemanticsSelectingFacet::new(QualifierSet::parse(qualifiers)))
	}
}

impl FacetFactory for ValueSemanticsAnnotationFactory {
	fn id(&self) -> &'static str {
		"value-semantics-annotation"
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		&[FeatureKind::Property, FeatureKind::ActionParameter]
	}

	fn process_member(&self, cx: &mut MemberContext<'_>) -> Result<(), ContributorError> {
		if let Some(facet) = Self::selecting(&cx.member.annotations) {
			cx.holder.add_facet(FacetCandidate::at_default(facet))?;
		}
		Ok(())
	}

	fn process_parameter(&self, cx: &mut ParameterContext<'_>) -> Result<(), ContributorError> {
		if let Some(facet) = Self::selecting(&cx.parameter.annotations) {
			cx.holder.add_facet(FacetCandidate::at_default(facet))?;
		}
		Ok(())
	}
}

/// Applies `[layouts]` configuration at high precedence.
///
/// A layout naming only a group keeps any sequence contributed earlier, and
/// vice versa.
#[derive(Debug, Clone, Copy)]
pub struct LayoutFactory;

impl FacetFactory for LayoutFactory {
	fn id(&self) -> &'static str {
		"layout"
	}

	fn stage(&self) -> ProcessingStage {
		ProcessingStage::Layout
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		FeatureKind::MEMBERS
	}

	fn process_member(&self, cx: &mut MemberContext<'_>) -> Result<(), ContributorError> {
		let Some(layout) = cx.config.member_layout(&cx.owner.key, &cx.member.id) else {
			return Ok(());
		};

		if layout.group.is_some() || layout.sequence.is_some() {
			let existing = cx.holder.facet::<MemberOrderFacet>();
			let sequence = match &layout.sequence {
				Some(text) => Some(text.parse::<DeweySequence>()?),
				None => existing.and_then(|f| f.sequence().cloned()),
			};
			let group = layout
				.group
				.clone()
				.or_else(|| existing.and_then(|f| f.group().map(str::to_string)));
			cx.holder
				.add_facet(FacetCandidate::high(MemberOrderFacet::new(sequence, group)))?;
		}
		if let Some(hidden) = layout.hidden {
			cx.holder.add_facet(FacetCandidate::high(HiddenFacet::new(hidden)))?;
		}
		if let Some(name) = &layout.named {
			cx.holder
				.add_facet(FacetCandidate::high(NamedFacet::new(name.as_str())))?;
		}
		Ok(())
	}
}
