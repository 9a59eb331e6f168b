use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use metaspec_facets::FeatureKind;
use metaspec_specification::factory::ClassContext;
use metaspec_specification::{
	ContributorError, FacetFactory, IntrospectionState, MemberDescriptor, MetamodelConfig,
	MetamodelError, TypeDescriptor,
};

use crate::common::{key, loader, loader_with, standard_model};

/// Fails on every type whose key ends in `Broken`.
struct Breaks;

impl FacetFactory for Breaks {
	fn id(&self) -> &'static str {
		"breaks"
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		&[FeatureKind::Object]
	}

	fn process_class(&self, cx: &mut ClassContext<'_>) -> Result<(), ContributorError> {
		if cx.descriptor.key.as_str().ends_with("Broken") {
			return Err(format!("cannot describe {}", cx.descriptor.key).into());
		}
		Ok(())
	}
}

fn broken_loader() -> metaspec_specification::SpecificationLoader {
	loader_with(
		[
			TypeDescriptor::class("demo::Broken"),
			TypeDescriptor::class("demo::Holder")
				.member(MemberDescriptor::property("broken", "demo::Broken")),
		],
		standard_model().with(Breaks),
		MetamodelConfig::default(),
	)
}

fn cached_source(err: MetamodelError) -> Arc<MetamodelError> {
	match err {
		MetamodelError::Introspection { source, .. } => source,
		other => panic!("expected introspection failure, got {other:?}"),
	}
}

#[test]
fn contributor_failure_is_fatal_and_cached() {
	let loader = broken_loader();

	let first = cached_source(loader.load_specification(&key("demo::Broken")).unwrap_err());
	match &*first {
		MetamodelError::Contributor {
			factory, holder, ..
		} => {
			assert_eq!(*factory, "breaks");
			assert_eq!(holder.as_str(), "demo::Broken");
		}
		other => panic!("expected contributor failure, got {other:?}"),
	}

	let second = cached_source(loader.load_specification(&key("demo::Broken")).unwrap_err());
	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(loader.introspection_count(), 1);
	assert!(loader.lookup(&key("demo::Broken")).is_none());
	assert!(loader.specifications().is_empty());
}

#[test]
fn failure_propagates_to_referencing_type() {
	let loader = broken_loader();
	let err = loader.load_specification(&key("demo::Holder")).unwrap_err();
	let MetamodelError::Introspection { ty, source } = err else {
		panic!("expected introspection failure");
	};
	assert_eq!(ty, key("demo::Holder"));
	assert!(matches!(
		&*source,
		MetamodelError::Introspection { ty, .. } if *ty == key("demo::Broken")
	));
}

#[test]
fn reset_allows_a_fresh_attempt() {
	let loader = broken_loader();
	assert!(loader.load_specification(&key("demo::Broken")).is_err());
	loader.reset();
	assert!(loader.is_empty());
	assert!(loader.load_specification(&key("demo::Broken")).is_err());
	assert_eq!(loader.introspection_count(), 2);
}

#[test]
fn evict_drops_a_single_entry() {
	let loader = broken_loader();
	assert!(loader.load_specification(&key("demo::Broken")).is_err());
	assert!(loader.evict(&key("demo::Broken")));
	assert!(!loader.evict(&key("demo::Broken")));
	assert!(loader.load_specification(&key("demo::Broken")).is_err());
	assert_eq!(loader.introspection_count(), 2);
}

#[test]
fn unknown_member_type_fails_the_owner() {
	let loader = loader([TypeDescriptor::class("demo::Dangling")
		.member(MemberDescriptor::property("ghost", "demo::Ghost"))]);
	let source = cached_source(loader.load_specification(&key("demo::Dangling")).unwrap_err());
	assert!(matches!(&*source, MetamodelError::UnknownType(k) if *k == key("demo::Ghost")));
	assert_eq!(loader.len(), 1);
}

#[test]
fn unknown_and_excluded_types_are_not_cached() {
	let config = MetamodelConfig::from_toml_str(
		r#"
		[introspection]
		excluded_types = ["demo::Hidden"]
		"#,
	)
	.unwrap();
	let loader = loader_with(
		[TypeDescriptor::class("demo::Hidden")],
		standard_model(),
		config,
	);

	assert!(matches!(
		loader.load_specification(&key("demo::Missing")),
		Err(MetamodelError::UnknownType(_))
	));
	assert!(matches!(
		loader.load_specification(&key("demo::Hidden")),
		Err(MetamodelError::ExcludedType(_))
	));
	assert!(loader.is_empty());
	assert_eq!(loader.introspection_count(), 0);
}

#[test]
fn failed_state_is_observable_on_the_entry() {
	let loader = broken_loader();
	let _ = loader.load_specification(&key("demo::Holder"));
	assert_eq!(loader.state(&key("demo::Broken")), Some(IntrospectionState::Failed));
	assert_eq!(loader.state(&key("demo::Holder")), Some(IntrospectionState::Failed));
	assert_eq!(loader.state(&key("demo::Missing")), None);
	assert!(loader.lookup(&key("demo::Holder")).is_none());
}

#[test]
fn type_finished_inside_a_failing_cycle_fails_with_it() {
	let loader = loader([
		TypeDescriptor::class("demo::Root")
			.member(MemberDescriptor::property("leaf", "demo::Leaf"))
			.member(MemberDescriptor::property("ghost", "demo::Ghost")),
		TypeDescriptor::class("demo::Leaf")
			.member(MemberDescriptor::property("root", "demo::Root")),
	]);

	let root = cached_source(loader.load_specification(&key("demo::Root")).unwrap_err());
	assert!(matches!(&*root, MetamodelError::UnknownType(k) if *k == key("demo::Ghost")));

	// Leaf finished while Root was in progress; it must not outlive Root's failure.
	assert_eq!(loader.state(&key("demo::Leaf")), Some(IntrospectionState::Failed));
	assert!(loader.lookup(&key("demo::Leaf")).is_none());
	let leaf = cached_source(loader.load_specification(&key("demo::Leaf")).unwrap_err());
	match &*leaf {
		MetamodelError::Introspection { ty, source } => {
			assert_eq!(*ty, key("demo::Root"));
			assert!(Arc::ptr_eq(source, &root));
		}
		other => panic!("expected inherited failure, got {other:?}"),
	}
	assert!(loader.specifications().is_empty());
	assert_eq!(loader.introspection_count(), 2);
}

#[test]
fn failing_cycle_root_fails_indirect_dependents() {
	let loader = loader([
		TypeDescriptor::class("demo::Root")
			.member(MemberDescriptor::property("mid", "demo::Mid"))
			.member(MemberDescriptor::property("ghost", "demo::Ghost")),
		TypeDescriptor::class("demo::Mid")
			.member(MemberDescriptor::property("leaf", "demo::Leaf")),
		TypeDescriptor::class("demo::Leaf")
			.member(MemberDescriptor::property("root", "demo::Root")),
	]);
	assert!(loader.load_specification(&key("demo::Root")).is_err());
	for ty in ["demo::Root", "demo::Mid", "demo::Leaf"] {
		assert_eq!(loader.state(&key(ty)), Some(IntrospectionState::Failed), "{ty}");
		assert!(loader.load_specification(&key(ty)).is_err(), "{ty}");
	}

	loader.reset();
	assert!(loader.load_specification(&key("demo::Mid")).is_err());
	assert_eq!(loader.state(&key("demo::Leaf")), Some(IntrospectionState::Failed));
}

#[test]
fn failure_outside_a_cycle_leaves_finished_types_alone() {
	let loader = loader([
		TypeDescriptor::class("demo::Owner")
			.member(MemberDescriptor::property("name", "String"))
			.member(MemberDescriptor::property("ghost", "demo::Ghost")),
	]);
	assert!(loader.load_specification(&key("demo::Owner")).is_err());
	assert_eq!(loader.state(&key("String")), Some(IntrospectionState::Introspected));
	assert!(loader.lookup(&key("String")).is_some());
}

/// Panics the first time it describes `demo::Fragile`.
struct PanicsOnce(AtomicBool);

impl FacetFactory for PanicsOnce {
	fn id(&self) -> &'static str {
		"panics-once"
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		&[FeatureKind::Object]
	}

	fn process_class(&self, cx: &mut ClassContext<'_>) -> Result<(), ContributorError> {
		if cx.descriptor.key.as_str() == "demo::Fragile" && !self.0.swap(true, Ordering::SeqCst) {
			panic!("factory bug while describing {}", cx.descriptor.key);
		}
		Ok(())
	}
}

#[test]
fn panicking_factory_leaves_the_type_retryable() {
	let loader = loader_with(
		[TypeDescriptor::class("demo::Fragile")],
		standard_model().with(PanicsOnce(AtomicBool::new(false))),
		MetamodelConfig::default(),
	);

	let unwound = panic::catch_unwind(AssertUnwindSafe(|| {
		loader.load_specification(&key("demo::Fragile"))
	}));
	assert!(unwound.is_err());
	assert_eq!(
		loader.state(&key("demo::Fragile")),
		Some(IntrospectionState::NotIntrospected)
	);

	let fragile = loader.load_specification(&key("demo::Fragile")).unwrap();
	assert_eq!(fragile.state(), IntrospectionState::Introspected);
	assert_eq!(fragile.name(), "Fragile");
	assert_eq!(loader.introspection_count(), 2);
}
