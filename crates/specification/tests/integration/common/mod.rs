//! Fixtures shared by the integration tests.

use std::sync::Arc;

use metaspec_facets::TypeKey;
use metaspec_semantics::ValueSemanticsRegistry;
use metaspec_specification::{
	MetamodelConfig, ProgrammingModel, SpecificationLoader, TypeCatalog, TypeDescriptor,
};

pub fn key(key: &str) -> TypeKey {
	TypeKey::new(key)
}

/// Catalog with the builtin value types plus `descriptors`.
pub fn catalog(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Arc<TypeCatalog> {
	let catalog = TypeCatalog::new().with_builtin_values();
	catalog.register_many(descriptors);
	Arc::new(catalog)
}

pub fn standard_model() -> ProgrammingModel {
	ProgrammingModel::standard(Arc::new(ValueSemanticsRegistry::with_builtins()))
}

/// Loader with the standard model and default configuration.
pub fn loader(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> SpecificationLoader {
	loader_with(descriptors, standard_model(), MetamodelConfig::default())
}

pub fn loader_with(
	descriptors: impl IntoIterator<Item = TypeDescriptor>,
	model: ProgrammingModel,
	config: MetamodelConfig,
) -> SpecificationLoader {
	let _ = tracing_subscriber::fmt::try_init();
	SpecificationLoader::new(catalog(descriptors), model, config)
}
