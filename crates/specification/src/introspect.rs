//! Turns a type descriptor into a populated specification body.

use std::sync::Arc;

use metaspec_facets::{
	FacetCandidate, FacetHolder, HolderId, NamedFacet, PluralFacet, TypeKey, natural_name,
	plural_name,
};
use metaspec_semantics::ValueFacet;
use rustc_hash::FxHashSet;

use crate::config::IntrospectionPolicy;
use crate::object::SpecBody;
use crate::ordering::{OrderedGroup, order_members};
use crate::{
	Association, FacetedMethod, FacetedMethodParameter, LayoutGroup, MetamodelError,
	MetamodelResult, ObjectAction, ObjectSpecification, SpecLink, SpecificationLoader,
	TypeDescriptor,
};

/// Annotations that mark a member as introspectable under
/// [`IntrospectionPolicy::AnnotationRequired`].
const MEMBER_ANNOTATIONS: [&str; 3] = ["Property", "Collection", "Action"];

pub(crate) struct Introspector<'a> {
	loader: &'a SpecificationLoader,
	spec: &'a Arc<ObjectSpecification>,
	descriptor: &'a TypeDescriptor,
}

impl<'a> Introspector<'a> {
	pub(crate) fn new(
		loader: &'a SpecificationLoader,
		spec: &'a Arc<ObjectSpecification>,
		descriptor: &'a TypeDescriptor,
	) -> Self {
		Self {
			loader,
			spec,
			descriptor,
		}
	}

	/// Runs every step and publishes the result on the specification.
	///
	/// The caller has already marked the specification `Introspecting`, so
	/// recursive loads of this type observe it in progress.
	pub(crate) fn run(self) -> MetamodelResult<()> {
		let key = &self.descriptor.key;
		let already = self.spec.facets().is_some();
		debug_assert!(!already, "specification '{key}' introspected twice");
		if already {
			return Err(MetamodelError::AlreadyIntrospected(key.clone()));
		}
		tracing::debug!(ty = %key, "introspection started");

		let config = self.loader.config();
		let mut holder = FacetHolder::new(HolderId::for_type(key));
		self.loader
			.model()
			.process_class(self.descriptor, config, &mut holder)?;
		self.infer_names(&mut holder)?;

		let methods = if holder.contains_facet::<ValueFacet>() {
			Vec::new()
		} else {
			self.discover_members()?
		};

		let superclass = self.link_superclass()?;
		let interfaces = self.link_interfaces()?;

		let (associations, actions): (Vec<_>, Vec<_>) = methods
			.into_iter()
			.partition(|method| method.feature().is_association());
		let default_group = config.ordering.default_group.as_str();
		let (associations, association_groups) = flatten(order_members(
			associations,
			default_group,
			FacetedMethod::member_order,
		));
		let (actions, action_groups) = flatten(order_members(
			actions,
			default_group,
			FacetedMethod::member_order,
		));

		let associations: Vec<_> = associations
			.into_iter()
			.filter_map(Association::from_method)
			.collect();
		let actions: Vec<_> = actions.into_iter().map(ObjectAction::from_method).collect();

		holder.seal();
		tracing::debug!(
			ty = %key,
			associations = associations.len(),
			actions = actions.len(),
			"introspection finished"
		);
		self.spec.publish(SpecBody {
			holder,
			shape: self.descriptor.shape,
			superclass,
			interfaces,
			associations,
			actions,
			association_groups,
			action_groups,
		})
	}

	/// Adds a name, and a plural when configured, unless contributed.
	fn infer_names(&self, holder: &mut FacetHolder) -> MetamodelResult<()> {
		if !holder.contains_facet::<NamedFacet>() {
			holder.add_facet(FacetCandidate::inferred(NamedFacet::new(natural_name(
				self.descriptor.simple_name(),
			))))?;
		}
		if self.loader.config().naming.infer_plural && !holder.contains_facet::<PluralFacet>() {
			let plural = holder
				.facet::<NamedFacet>()
				.map(|named| plural_name(named.name()))
				.unwrap_or_default();
			holder.add_facet(FacetCandidate::inferred(PluralFacet::new(plural)))?;
		}
		Ok(())
	}

	fn discover_members(&self) -> MetamodelResult<Vec<FacetedMethod>> {
		let config = self.loader.config();
		let model = self.loader.model();
		let owner = &self.descriptor.key;
		let mut methods = Vec::with_capacity(self.descriptor.members.len());

		for (index, member) in self.descriptor.members.iter().enumerate() {
			if config.introspection.policy == IntrospectionPolicy::AnnotationRequired
				&& !MEMBER_ANNOTATIONS.iter().any(|a| member.annotations.has(a))
			{
				tracing::trace!(ty = %owner, member = %member.id, "member skipped, not annotated");
				continue;
			}

			let mut method = FacetedMethod::new(owner.clone(), member.clone(), index);
			model.process_member(self.descriptor, member, config, method.holder_mut())?;
			if let Some(ty) = &member.ty {
				method.set_type_link(self.link(ty)?);
			}

			for (position, parameter) in member.parameters.iter().enumerate() {
				let mut faceted = FacetedMethodParameter::new(
					owner,
					&member.id,
					position,
					parameter.clone(),
					self.link(&parameter.ty)?,
				);
				model.process_parameter(
					self.descriptor,
					member,
					position,
					parameter,
					config,
					faceted.holder_mut(),
				)?;
				method.push_parameter(faceted);
			}

			method.seal();
			methods.push(method);
		}
		Ok(methods)
	}

	fn link_superclass(&self) -> MetamodelResult<Option<SpecLink>> {
		let Some(superclass) = &self.descriptor.superclass else {
			return Ok(None);
		};
		let link = self.link(superclass)?;
		if !link.is_resolved() {
			return Ok(None);
		}
		self.register_as_subtype(&link);
		Ok(Some(link))
	}

	/// Links each distinct interface once, in declaration order.
	fn link_interfaces(&self) -> MetamodelResult<Vec<SpecLink>> {
		let mut seen = FxHashSet::default();
		let mut links = Vec::with_capacity(self.descriptor.interfaces.len());
		for interface in &self.descriptor.interfaces {
			let link = self.link(interface)?;
			if !seen.insert(link.key().clone()) {
				continue;
			}
			self.register_as_subtype(&link);
			links.push(link);
		}
		Ok(links)
	}

	fn register_as_subtype(&self, link: &SpecLink) {
		if let Some(parent) = link.get() {
			parent.register_subtype(SpecLink::to(self.spec));
		}
	}

	/// Loads `ty` and links it. The target may still be introspecting when it
	/// sits on a cycle through this type. Excluded types stay unresolved.
	fn link(&self, ty: &TypeKey) -> MetamodelResult<SpecLink> {
		match self.loader.load_specification(ty) {
			Ok(spec) => Ok(SpecLink::to(&spec)),
			Err(MetamodelError::ExcludedType(_)) => Ok(SpecLink::unresolved(ty.clone())),
			Err(err) => Err(err),
		}
	}
}

/// Concatenates ordered groups, keeping the group layout by member id.
fn flatten(groups: Vec<OrderedGroup<FacetedMethod>>) -> (Vec<FacetedMethod>, Vec<LayoutGroup>) {
	let mut methods = Vec::new();
	let mut layout = Vec::with_capacity(groups.len());
	for group in groups {
		layout.push(LayoutGroup {
			name: group.name,
			members: group.members.iter().map(|m| m.id().to_string()).collect(),
		});
		methods.extend(group.members);
	}
	(methods, layout)
}
