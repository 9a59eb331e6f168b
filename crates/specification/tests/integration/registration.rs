use std::sync::Arc;

use metaspec_specification::{
	Annotation, MemberDescriptor, MetamodelConfig, SpecificationLoader, TypeCatalog, TypeDescriptor,
};

use crate::common::{key, standard_model};

fn ledger() -> TypeDescriptor {
	TypeDescriptor::class("registered::Ledger")
		.annotate(Annotation::new("DescribedAs").with("value", "Double-entry book"))
		.member(MemberDescriptor::collection("entries", "registered::Entry"))
}

fn entry() -> TypeDescriptor {
	TypeDescriptor::class("registered::Entry")
		.member(MemberDescriptor::property("amount", "i64"))
		.member(MemberDescriptor::property("ledger", "registered::Ledger"))
}

metaspec_specification::domain_type!(ledger);
metaspec_specification::domain_type!(entry);

#[test]
fn submitted_descriptors_are_collected() {
	let catalog = TypeCatalog::from_inventory();
	assert!(catalog.contains(&key("registered::Ledger")));
	assert!(catalog.contains(&key("registered::Entry")));
	assert!(!catalog.contains(&key("i64")));
	assert_eq!(
		catalog.get(&key("registered::Entry")).map(|d| d.members.len()),
		Some(2)
	);
}

#[test]
fn collected_catalog_loads_specifications() {
	let _ = tracing_subscriber::fmt::try_init();
	let catalog = Arc::new(TypeCatalog::from_inventory().with_builtin_values());
	let loader = SpecificationLoader::new(catalog, standard_model(), MetamodelConfig::default());

	let ledger = loader.load_specification(&key("registered::Ledger")).unwrap();
	let entries = ledger.association("entries").unwrap();
	let entry = entries.as_one_to_many().unwrap().element_spec().unwrap();
	assert_eq!(entry.plural_name(), Some("Entries"));
	assert!(Arc::ptr_eq(
		&entry.association("ledger").unwrap().spec().unwrap(),
		&ledger
	));
	assert_eq!(loader.introspection_count(), 3);
}

#[test]
fn later_registration_replaces_earlier() {
	let catalog = TypeCatalog::from_inventory();
	let previous = catalog.register(TypeDescriptor::interface("registered::Ledger"));
	assert_eq!(previous.map(|d| d.members.len()), Some(1));
	assert!(catalog.resolve(&key("registered::Ledger")).is_ok());
}
