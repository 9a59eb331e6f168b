//! Facet contribution pipeline.
//!
//! A [`ProgrammingModel`] is the fixed, ordered list of [`FacetFactory`]
//! contributors invoked once per holder during introspection. Factories are
//! ordered by [`ProcessingStage`], then by registration order.

use std::sync::Arc;

use metaspec_facets::{FacetHolder, FeatureKind};
use metaspec_semantics::ValueSemanticsRegistry;

use crate::{
	ContributorError, MemberDescriptor, MetamodelConfig, MetamodelError, MetamodelResult,
	ParameterDescriptor, TypeDescriptor,
};

pub mod standard;

/// Coarse ordering of factories. Later stages run later and so win ties at
/// equal precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ProcessingStage {
	/// Facets that only guarantee a kind is never absent.
	Fallback,
	#[default]
	Defaults,
	Naming,
	Members,
	/// Authoritative layout sources.
	Layout,
	Finally,
}

/// Class-level hook input.
pub struct ClassContext<'a> {
	pub descriptor: &'a TypeDescriptor,
	pub config: &'a MetamodelConfig,
	pub holder: &'a mut FacetHolder,
}

/// Member-level hook input.
pub struct MemberContext<'a> {
	pub owner: &'a TypeDescriptor,
	pub member: &'a MemberDescriptor,
	pub config: &'a MetamodelConfig,
	pub holder: &'a mut FacetHolder,
}

/// Parameter-level hook input.
pub struct ParameterContext<'a> {
	pub owner: &'a TypeDescriptor,
	pub member: &'a MemberDescriptor,
	pub index: usize,
	pub parameter: &'a ParameterDescriptor,
	pub config: &'a MetamodelConfig,
	pub holder: &'a mut FacetHolder,
}

/// External contributor of facets.
///
/// Each hook inspects its own source (annotations, configuration, registries)
/// and may add facets to `cx.holder`. Hooks are invoked only for holders whose
/// feature kind appears in [`Self::feature_kinds`].
pub trait FacetFactory: Send + Sync {
	fn id(&self) -> &'static str;

	fn stage(&self) -> ProcessingStage {
		ProcessingStage::Defaults
	}

	fn feature_kinds(&self) -> &'static [FeatureKind];

	fn process_class(&self, _cx: &mut ClassContext<'_>) -> Result<(), ContributorError> {
		Ok(())
	}

	fn process_member(&self, _cx: &mut MemberContext<'_>) -> Result<(), ContributorError> {
		Ok(())
	}

	fn process_parameter(&self, _cx: &mut ParameterContext<'_>) -> Result<(), ContributorError> {
		Ok(())
	}
}

/// Ordered set of facet factories.
#[derive(Clone, Default)]
pub struct ProgrammingModel {
	factories: Vec<Arc<dyn FacetFactory>>,
}

impl ProgrammingModel {
	/// Empty model; every holder receives only inferred facets.
	pub fn new() -> Self {
		Self::default()
	}

	/// Model with the builtin factories from [`standard`].
	pub fn standard(registry: Arc<ValueSemanticsRegistry>) -> Self {
		let mut model = Self::new();
		model
			.add(standard::FallbackFactory)
			.add(standard::DescribedAsAnnotationFactory)
			.add(standard::HiddenAnnotationFactory)
			.add(standard::ValueFactory::new(registry))
			.add(standard::ValueSemanticsAnnotationFactory)
			.add(standard::NamedAnnotationFactory)
			.add(standard::MemberOrderAnnotationFactory)
			.add(standard::LayoutFactory);
		model
	}

	/// Inserts `factory` after every factory of the same or an earlier stage.
	pub fn add(&mut self, factory: impl FacetFactory + 'static) -> &mut Self {
		self.add_shared(Arc::new(factory))
	}

	pub fn add_shared(&mut self, factory: Arc<dyn FacetFactory>) -> &mut Self {
		let stage = factory.stage();
		let at = self.factories.partition_point(|f| f.stage() <= stage);
		self.factories.insert(at, factory);
		self
	}

	pub fn with(mut self, factory: impl FacetFactory + 'static) -> Self {
		self.add(factory);
		self
	}

	/// Factory ids in invocation order.
	pub fn factory_ids(&self) -> Vec<&'static str> {
		self.factories.iter().map(|f| f.id()).collect()
	}

	pub fn len(&self) -> usize {
		self.factories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}

	fn applicable(&self, kind: FeatureKind) -> impl Iterator<Item = &Arc<dyn FacetFactory>> {
		self.factories
			.iter()
			.filter(move |f| f.feature_kinds().contains(&kind))
	}

	pub fn process_class(
		&self,
		descriptor: &TypeDescriptor,
		config: &MetamodelConfig,
		holder: &mut FacetHolder,
	) -> MetamodelResult<()> {
		for factory in self.applicable(FeatureKind::Object) {
			let mut cx = ClassContext {
				descriptor,
				config,
				holder: &mut *holder,
			};
			factory
				.process_class(&mut cx)
				.map_err(|source| contributor_failed(factory.id(), holder, source))?;
		}
		Ok(())
	}

	pub fn process_member(
		&self,
		owner: &TypeDescriptor,
		member: &MemberDescriptor,
		config: &MetamodelConfig,
		holder: &mut FacetHolder,
	) -> MetamodelResult<()> {
		for factory in self.applicable(member.feature) {
			let mut cx = MemberContext {
				owner,
				member,
				config,
				holder: &mut *holder,
			};
			factory
				.process_member(&mut cx)
				.map_err(|source| contributor_failed(factory.id(), holder, source))?;
		}
		Ok(())
	}

	/// Runs parameter hooks for `parameter`, the `index`th parameter of `member`.
	pub fn process_parameter(
		&self,
		owner: &TypeDescriptor,
		member: &MemberDescriptor,
		index: usize,
		parameter: &ParameterDescriptor,
		config: &MetamodelConfig,
		holder: &mut FacetHolder,
	) -> MetamodelResult<()> {
		for factory in self.applicable(FeatureKind::ActionParameter) {
			let mut cx = ParameterContext {
				owner,
				member,
				index,
				parameter,
				config,
				holder: &mut *holder,
			};
			factory
				.process_parameter(&mut cx)
				.map_err(|source| contributor_failed(factory.id(), holder, source))?;
		}
		Ok(())
	}
}

fn contributor_failed(
	factory: &'static str,
	holder: &FacetHolder,
	source: ContributorError,
) -> MetamodelError {
	MetamodelError::Contributor {
		factory,
		holder: holder.id().clone(),
		source,
	}
}

impl std::fmt::Debug for ProgrammingModel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProgrammingModel")
			.field("factories", &self.factory_ids())
			.finish()
	}
}
