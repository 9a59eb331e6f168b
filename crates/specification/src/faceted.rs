//! Introspection-time representation of declared members.

use metaspec_facets::{FacetHolder, FeatureKind, HolderId, MemberOrderFacet, TypeKey};

use crate::{MemberDescriptor, ParameterDescriptor, SpecLink};

/// One declared member with the facets contributed to it.
///
/// Built once per discovered member, then wrapped into an
/// [`crate::Association`] or [`crate::ObjectAction`].
#[derive(Debug)]
pub struct FacetedMethod {
	owner: TypeKey,
	descriptor: MemberDescriptor,
	declaration_index: usize,
	holder: FacetHolder,
	ty: Option<SpecLink>,
	parameters: Vec<FacetedMethodParameter>,
}

impl FacetedMethod {
	pub(crate) fn new(owner: TypeKey, descriptor: MemberDescriptor, declaration_index: usize) -> Self {
		let holder = FacetHolder::new(HolderId::for_member(&owner, &descriptor.id));
		Self {
			owner,
			descriptor,
			declaration_index,
			holder,
			ty: None,
			parameters: Vec::new(),
		}
	}

	pub fn id(&self) -> &str {
		&self.descriptor.id
	}

	pub fn owner(&self) -> &TypeKey {
		&self.owner
	}

	pub fn feature(&self) -> FeatureKind {
		self.descriptor.feature
	}

	pub fn descriptor(&self) -> &MemberDescriptor {
		&self.descriptor
	}

	/// Position among the owner's declared members.
	pub fn declaration_index(&self) -> usize {
		self.declaration_index
	}

	pub fn holder(&self) -> &FacetHolder {
		&self.holder
	}

	pub(crate) fn holder_mut(&mut self) -> &mut FacetHolder {
		&mut self.holder
	}

	/// Property type, collection element type or action return type.
	pub fn type_link(&self) -> Option<&SpecLink> {
		self.ty.as_ref()
	}

	pub(crate) fn set_type_link(&mut self, link: SpecLink) {
		self.ty = Some(link);
	}

	pub fn parameters(&self) -> &[FacetedMethodParameter] {
		&self.parameters
	}

	pub(crate) fn push_parameter(&mut self, parameter: FacetedMethodParameter) {
		self.parameters.push(parameter);
	}

	pub(crate) fn take_parameters(&mut self) -> Vec<FacetedMethodParameter> {
		std::mem::take(&mut self.parameters)
	}

	pub fn member_order(&self) -> Option<&MemberOrderFacet> {
		self.holder.facet::<MemberOrderFacet>()
	}

	pub(crate) fn seal(&mut self) {
		self.holder.seal();
		for parameter in &mut self.parameters {
			parameter.seal();
		}
	}
}

/// One action parameter with its own facet holder.
#[derive(Debug)]
pub struct FacetedMethodParameter {
	index: usize,
	descriptor: ParameterDescriptor,
	holder: FacetHolder,
	ty: SpecLink,
}

impl FacetedMethodParameter {
	pub(crate) fn new(
		owner: &TypeKey,
		member: &str,
		index: usize,
		descriptor: ParameterDescriptor,
		ty: SpecLink,
	) -> Self {
		Self {
			index,
			holder: FacetHolder::new(HolderId::for_parameter(owner, member, index)),
			descriptor,
			ty,
		}
	}

	pub fn index(&self) -> usize {
		self.index
	}

	pub fn name(&self) -> &str {
		&self.descriptor.name
	}

	pub fn descriptor(&self) -> &ParameterDescriptor {
		&self.descriptor
	}

	pub fn holder(&self) -> &FacetHolder {
		&self.holder
	}

	pub(crate) fn holder_mut(&mut self) -> &mut FacetHolder {
		&mut self.holder
	}

	pub fn type_link(&self) -> &SpecLink {
		&self.ty
	}

	pub(crate) fn seal(&mut self) {
		self.holder.seal();
	}
}
