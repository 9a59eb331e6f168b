use std::sync::Arc;

use metaspec_facets::{FacetError, HolderId, TypeKey};
use thiserror::Error;

use crate::config::ConfigError;

/// Error returned by a facet factory hook.
pub type ContributorError = Box<dyn std::error::Error + Send + Sync>;

pub type MetamodelResult<T> = Result<T, MetamodelError>;

#[derive(Error, Debug)]
pub enum MetamodelError {
	/// No descriptor is registered under the key.
	#[error("unknown type '{0}'")]
	UnknownType(TypeKey),

	/// The type is excluded from introspection by configuration.
	#[error("type '{0}' is excluded from introspection")]
	ExcludedType(TypeKey),

	/// Proxy substitution did not terminate.
	#[error("proxy chain starting at '{0}' is cyclic")]
	ProxyCycle(TypeKey),

	/// A facet factory failed; introspection of the holder was aborted.
	#[error("facet factory '{factory}' failed on '{holder}': {source}")]
	Contributor {
		factory: &'static str,
		holder: HolderId,
		#[source]
		source: ContributorError,
	},

	/// Installing a facet failed outside of a factory.
	#[error(transparent)]
	Facet(#[from] FacetError),

	/// Introspection of a type failed. Cached by the loader; every later
	/// request for the type observes the same `source`.
	#[error("introspection of '{ty}' failed: {source}")]
	Introspection {
		ty: TypeKey,
		#[source]
		source: Arc<MetamodelError>,
	},

	/// An introspected specification was introspected again.
	#[error("specification '{0}' is already introspected")]
	AlreadyIntrospected(TypeKey),

	#[error(transparent)]
	Config(#[from] ConfigError),
}
