//! Object specifications.

use std::sync::{Arc, OnceLock, Weak};
use std::thread::ThreadId;

use metaspec_facets::{FacetHolder, FacetType, InstalledFacet, NamedFacet, PluralFacet, TypeKey};
use metaspec_semantics::ValueFacet;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashSet;

use crate::{ActionParameter, Association, MetamodelError, ObjectAction, ObjectMember, TypeShape};

/// Lifecycle of a specification.
///
/// `NotIntrospected -> Introspecting -> Introspected` is the normal path. A
/// failed introspection ends in `Failed` until the loader evicts the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrospectionState {
	NotIntrospected,
	Introspecting,
	Introspected,
	Failed,
}

impl IntrospectionState {
	pub fn is_terminal(self) -> bool {
		matches!(self, Self::Introspected | Self::Failed)
	}
}

/// Non-owning reference to another specification.
///
/// The loader owns every specification; links never keep one alive, so
/// cyclic type graphs do not leak. An unresolved link (for an excluded type)
/// carries only the key.
#[derive(Debug, Clone)]
pub struct SpecLink {
	key: TypeKey,
	spec: Weak<ObjectSpecification>,
}

impl SpecLink {
	pub fn to(spec: &Arc<ObjectSpecification>) -> Self {
		Self {
			key: spec.key().clone(),
			spec: Arc::downgrade(spec),
		}
	}

	pub fn unresolved(key: TypeKey) -> Self {
		Self {
			key,
			spec: Weak::new(),
		}
	}

	pub fn key(&self) -> &TypeKey {
		&self.key
	}

	/// The linked specification, unless it was never resolved or has since
	/// been evicted from the loader.
	pub fn get(&self) -> Option<Arc<ObjectSpecification>> {
		self.spec.upgrade()
	}

	pub fn is_resolved(&self) -> bool {
		self.spec.strong_count() > 0
	}
}

/// Members of one layout group, by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutGroup {
	pub name: String,
	pub members: Vec<String>,
}

/// Everything introspection produces. Published once.
#[derive(Debug)]
pub(crate) struct SpecBody {
	pub(crate) holder: FacetHolder,
	pub(crate) shape: TypeShape,
	pub(crate) superclass: Option<SpecLink>,
	pub(crate) interfaces: Vec<SpecLink>,
	pub(crate) associations: Vec<Association>,
	pub(crate) actions: Vec<ObjectAction>,
	pub(crate) association_groups: Vec<LayoutGroup>,
	pub(crate) action_groups: Vec<LayoutGroup>,
}

/// Introspection progress, kept in the entry itself.
#[derive(Debug, Clone)]
pub(crate) enum Phase {
	Pending,
	/// Introspection is running on the given thread.
	Running(ThreadId),
	Done,
	Failed(Arc<MetamodelError>),
}

impl Phase {
	pub(crate) fn state(&self) -> IntrospectionState {
		match self {
			Self::Pending => IntrospectionState::NotIntrospected,
			Self::Running(_) => IntrospectionState::Introspecting,
			Self::Done => IntrospectionState::Introspected,
			Self::Failed(_) => IntrospectionState::Failed,
		}
	}

	pub(crate) fn owner(&self) -> Option<ThreadId> {
		match self {
			Self::Running(thread) => Some(*thread),
			_ => None,
		}
	}
}

/// Runtime descriptor of one domain type.
///
/// While introspecting, only [`Self::key`] and [`Self::state`] are
/// meaningful; every other query answers as if the type had no facets and no
/// members. Once [`IntrospectionState::Introspected`], the specification is
/// read-only.
#[derive(Debug)]
pub struct ObjectSpecification {
	key: TypeKey,
	pub(crate) phase: Mutex<Phase>,
	body: OnceLock<SpecBody>,
	subtypes: RwLock<Vec<SpecLink>>,
}

impl ObjectSpecification {
	pub(crate) fn new(key: TypeKey) -> Self {
		Self {
			key,
			phase: Mutex::new(Phase::Pending),
			body: OnceLock::new(),
			subtypes: RwLock::new(Vec::new()),
		}
	}

	/// Publishes the introspection result. Fails if one was already published.
	pub(crate) fn publish(&self, body: SpecBody) -> Result<(), MetamodelError> {
		self.body
			.set(body)
			.map_err(|_| MetamodelError::AlreadyIntrospected(self.key.clone()))
	}

	pub(crate) fn register_subtype(&self, subtype: SpecLink) {
		let mut subtypes = self.subtypes.write();
		match subtypes.iter_mut().find(|link| link.key == subtype.key) {
			Some(existing) => *existing = subtype,
			None => subtypes.push(subtype),
		}
	}

	pub fn key(&self) -> &TypeKey {
		&self.key
	}

	pub fn state(&self) -> IntrospectionState {
		self.phase.lock().state()
	}

	pub fn is_introspected(&self) -> bool {
		self.state() == IntrospectionState::Introspected
	}

	fn body(&self) -> Option<&SpecBody> {
		self.body.get()
	}

	pub fn facet<F: FacetType>(&self) -> Option<&F> {
		self.body()?.holder.facet::<F>()
	}

	pub fn contains_facet<F: FacetType>(&self) -> bool {
		self.facet::<F>().is_some()
	}

	/// The type-level facet holder, once introspected.
	pub fn facets(&self) -> Option<&FacetHolder> {
		self.body().map(|body| &body.holder)
	}

	pub fn installed_facets(&self) -> impl Iterator<Item = &InstalledFacet> {
		self.facets().into_iter().flat_map(FacetHolder::iter)
	}

	/// Display name; the simple type name until introspected.
	pub fn name(&self) -> &str {
		self.facet::<NamedFacet>()
			.map(NamedFacet::name)
			.unwrap_or_else(|| self.key.simple_name())
	}

	pub fn plural_name(&self) -> Option<&str> {
		self.facet::<PluralFacet>().map(PluralFacet::plural)
	}

	pub fn value_facet(&self) -> Option<&ValueFacet> {
		self.facet::<ValueFacet>()
	}

	pub fn is_value(&self) -> bool {
		self.value_facet().is_some()
	}

	pub fn shape(&self) -> Option<TypeShape> {
		self.body().map(|body| body.shape)
	}

	pub fn is_interface(&self) -> bool {
		self.shape() == Some(TypeShape::Interface)
	}

	pub fn is_abstract(&self) -> bool {
		matches!(
			self.shape(),
			Some(TypeShape::Abstract | TypeShape::Interface)
		)
	}

	pub fn superclass(&self) -> Option<&SpecLink> {
		self.body()?.superclass.as_ref()
	}

	pub fn interfaces(&self) -> &[SpecLink] {
		self.body().map(|body| body.interfaces.as_slice()).unwrap_or_default()
	}

	/// Every outgoing link: supertypes, member types and parameter types.
	pub(crate) fn links(&self) -> Vec<&SpecLink> {
		let Some(body) = self.body() else {
			return Vec::new();
		};
		let mut links: Vec<&SpecLink> = body.superclass.iter().chain(&body.interfaces).collect();
		for association in &body.associations {
			links.extend(association.method().type_link());
		}
		for action in &body.actions {
			links.extend(action.method().type_link());
			links.extend(action.parameters().iter().map(ActionParameter::type_link));
		}
		links
	}

	/// First specification reachable through links, directly or through
	/// others, for which `found` holds.
	pub(crate) fn find_linked(
		&self,
		mut found: impl FnMut(&ObjectSpecification) -> bool,
	) -> Option<Arc<ObjectSpecification>> {
		let mut seen = FxHashSet::default();
		let mut stack: Vec<_> = self.links().into_iter().filter_map(SpecLink::get).collect();
		while let Some(spec) = stack.pop() {
			if found(spec.as_ref()) {
				return Some(spec);
			}
			if seen.insert(Arc::as_ptr(&spec)) {
				stack.extend(spec.links().into_iter().filter_map(SpecLink::get));
			}
		}
		None
	}

	/// Specifications that named this one as superclass or interface.
	pub fn subtypes(&self) -> Vec<SpecLink> {
		self.subtypes.read().clone()
	}

	/// Whether this type is `key` or inherits from it.
	pub fn is_of_type(&self, key: &TypeKey) -> bool {
		let mut seen = FxHashSet::default();
		self.is_of_type_inner(key, &mut seen)
	}

	fn is_of_type_inner(&self, key: &TypeKey, seen: &mut FxHashSet<TypeKey>) -> bool {
		if &self.key == key {
			return true;
		}
		if !seen.insert(self.key.clone()) {
			return false;
		}
		self.superclass()
			.into_iter()
			.chain(self.interfaces())
			.any(|link| {
				link.key() == key
					|| link
						.get()
						.is_some_and(|spec| spec.is_of_type_inner(key, seen))
			})
	}

	pub fn associations(&self) -> &[Association] {
		self.body()
			.map(|body| body.associations.as_slice())
			.unwrap_or_default()
	}

	pub fn actions(&self) -> &[ObjectAction] {
		self.body().map(|body| body.actions.as_slice()).unwrap_or_default()
	}

	pub fn association(&self, id: &str) -> Option<&Association> {
		self.associations().iter().find(|a| a.id() == id)
	}

	pub fn action(&self, id: &str) -> Option<&ObjectAction> {
		self.actions().iter().find(|a| a.id() == id)
	}

	pub fn visible_associations(&self) -> impl Iterator<Item = &Association> {
		self.associations().iter().filter(|a| !a.is_hidden())
	}

	pub fn visible_actions(&self) -> impl Iterator<Item = &ObjectAction> {
		self.actions().iter().filter(|a| !a.is_hidden())
	}

	/// Association layout groups, default group first.
	pub fn association_groups(&self) -> &[LayoutGroup] {
		self.body()
			.map(|body| body.association_groups.as_slice())
			.unwrap_or_default()
	}

	pub fn action_groups(&self) -> &[LayoutGroup] {
		self.body()
			.map(|body| body.action_groups.as_slice())
			.unwrap_or_default()
	}

	/// The cached failure, when introspection failed.
	pub fn failure(&self) -> Option<Arc<MetamodelError>> {
		match &*self.phase.lock() {
			Phase::Failed(failure) => Some(Arc::clone(failure)),
			_ => None,
		}
	}
}
