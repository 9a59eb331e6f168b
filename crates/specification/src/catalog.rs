//! Runtime registry of type descriptors.

use std::sync::Arc;

use arc_swap::ArcSwap;
use metaspec_facets::TypeKey;
use rustc_hash::FxHashMap;

use crate::{MetamodelError, MetamodelResult, TypeDescriptor};

/// Static descriptor registration collected via `inventory`.
///
/// Submitted by [`crate::domain_type!`]; read by [`TypeCatalog::from_inventory`].
pub struct DomainTypeReg(pub fn() -> TypeDescriptor);

inventory::collect!(DomainTypeReg);

/// Submits a descriptor constructor for collection by
/// [`TypeCatalog::from_inventory`].
///
/// ```ignore
/// fn customer() -> TypeDescriptor {
///     TypeDescriptor::class("demo::Customer")
///         .member(MemberDescriptor::property("name", "String"))
/// }
/// metaspec_specification::domain_type!(customer);
/// ```
#[macro_export]
macro_rules! domain_type {
	($build:path) => {
		$crate::inventory::submit! { $crate::DomainTypeReg($build) }
	};
}

#[derive(Debug, Clone, Default)]
struct CatalogSnapshot {
	types: FxHashMap<TypeKey, Arc<TypeDescriptor>>,
}

/// Descriptor table published through atomic snapshots.
///
/// Readers never block; [`Self::register`] retries its compare-and-swap until
/// its own snapshot is the one installed.
#[derive(Debug, Default)]
pub struct TypeCatalog {
	snap: ArcSwap<CatalogSnapshot>,
}

impl TypeCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Catalog holding every descriptor submitted with [`crate::domain_type!`].
	pub fn from_inventory() -> Self {
		let catalog = Self::new();
		catalog.register_many(inventory::iter::<DomainTypeReg>.into_iter().map(|reg| (reg.0)()));
		catalog
	}

	/// Adds leaf descriptors for the builtin value types (`bool`, `i64`,
	/// `f64`, `String`).
	pub fn with_builtin_values(self) -> Self {
		self.register_many(
			["bool", "i64", "f64", "String"]
				.into_iter()
				.map(TypeDescriptor::class),
		);
		self
	}

	/// Registers `descriptor`, returning the one it replaced.
	pub fn register(&self, descriptor: TypeDescriptor) -> Option<Arc<TypeDescriptor>> {
		let descriptor = Arc::new(descriptor);
		loop {
			let cur = self.snap.load_full();
			let mut next = (*cur).clone();
			let previous = next
				.types
				.insert(descriptor.key.clone(), Arc::clone(&descriptor));

			let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
			if Arc::ptr_eq(&prev, &cur) {
				if previous.is_some() {
					tracing::debug!(ty = %descriptor.key, "type descriptor replaced");
				}
				return previous;
			}
		}
	}

	pub fn register_many(&self, descriptors: impl IntoIterator<Item = TypeDescriptor>) {
		let descriptors: Vec<_> = descriptors.into_iter().map(Arc::new).collect();
		if descriptors.is_empty() {
			return;
		}
		self.snap.rcu(|cur| {
			let mut next = (**cur).clone();
			for descriptor in &descriptors {
				next.types
					.insert(descriptor.key.clone(), Arc::clone(descriptor));
			}
			next
		});
	}

	pub fn get(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>> {
		self.snap.load().types.get(key).cloned()
	}

	pub fn contains(&self, key: &TypeKey) -> bool {
		self.snap.load().types.contains_key(key)
	}

	/// Looks up `key`, substituting proxy types for the type they stand for.
	pub fn resolve(&self, key: &TypeKey) -> MetamodelResult<Arc<TypeDescriptor>> {
		let snap = self.snap.load();
		let mut current = snap
			.types
			.get(key)
			.ok_or_else(|| MetamodelError::UnknownType(key.clone()))?;

		let mut hops = 0;
		while let Some(real) = &current.proxy_of {
			hops += 1;
			if hops > snap.types.len() {
				return Err(MetamodelError::ProxyCycle(key.clone()));
			}
			current = snap
				.types
				.get(real)
				.ok_or_else(|| MetamodelError::UnknownType(real.clone()))?;
		}
		Ok(Arc::clone(current))
	}

	/// Every registered key, sorted.
	pub fn keys(&self) -> Vec<TypeKey> {
		let mut keys: Vec<_> = self.snap.load().types.keys().cloned().collect();
		keys.sort_unstable();
		keys
	}

	pub fn len(&self) -> usize {
		self.snap.load().types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.load().types.is_empty()
	}
}
