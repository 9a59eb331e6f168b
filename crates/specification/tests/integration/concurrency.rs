use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use metaspec_facets::FeatureKind;
use metaspec_specification::factory::ClassContext;
use metaspec_specification::{
	ContributorError, FacetFactory, IntrospectionState, MemberDescriptor, MetamodelConfig,
	MetamodelError, MetamodelResult, ObjectSpecification, TypeDescriptor,
};

use crate::common::{key, loader_with, standard_model};

/// Widens the window in which other threads observe the type mid-introspection.
struct Slow;

impl FacetFactory for Slow {
	fn id(&self) -> &'static str {
		"slow"
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		&[FeatureKind::Object]
	}

	fn process_class(&self, _cx: &mut ClassContext<'_>) -> Result<(), ContributorError> {
		thread::sleep(Duration::from_millis(20));
		Ok(())
	}
}

#[test]
fn concurrent_first_load_introspects_once() {
	const THREADS: usize = 8;

	let loader = loader_with(
		[
			TypeDescriptor::class("demo::Customer")
				.member(MemberDescriptor::property("name", "String"))
				.member(MemberDescriptor::collection("orders", "demo::Order")),
			TypeDescriptor::class("demo::Order")
				.member(MemberDescriptor::property("customer", "demo::Customer")),
		],
		standard_model().with(Slow),
		MetamodelConfig::default(),
	);
	let start = Barrier::new(THREADS);

	let specs: Vec<_> = thread::scope(|s| {
		let handles: Vec<_> = (0..THREADS)
			.map(|_| {
				s.spawn(|| {
					start.wait();
					loader.load_specification(&key("demo::Customer"))
				})
			})
			.collect();
		handles
			.into_iter()
			.map(|h| h.join().unwrap().unwrap())
			.collect()
	});

	// Customer, String and Order, each exactly once.
	assert_eq!(loader.introspection_count(), 3);
	let first = &specs[0];
	assert!(first.is_introspected());
	for spec in &specs {
		assert!(Arc::ptr_eq(spec, first));
	}
	assert_eq!(specs.len(), THREADS);
}

#[test]
fn concurrent_loads_of_distinct_types_share_dependencies() {
	let loader = loader_with(
		[
			TypeDescriptor::class("demo::Left")
				.member(MemberDescriptor::property("shared", "demo::Shared")),
			TypeDescriptor::class("demo::Right")
				.member(MemberDescriptor::property("shared", "demo::Shared")),
			TypeDescriptor::class("demo::Shared"),
		],
		standard_model().with(Slow),
		MetamodelConfig::default(),
	);

	let (left, right) = thread::scope(|s| {
		let left = s.spawn(|| loader.load_specification(&key("demo::Left")));
		let right = s.spawn(|| loader.load_specification(&key("demo::Right")));
		(left.join().unwrap().unwrap(), right.join().unwrap().unwrap())
	});

	let via_left = left.association("shared").unwrap().spec().unwrap();
	let via_right = right.association("shared").unwrap().spec().unwrap();
	assert!(Arc::ptr_eq(&via_left, &via_right));
	assert!(via_left.is_introspected());
	assert_eq!(loader.introspection_count(), 3);
}

/// Fails `demo::Doomed` once the waiting thread has been released.
struct FailsAfterRendezvous(Arc<Barrier>);

impl FacetFactory for FailsAfterRendezvous {
	fn id(&self) -> &'static str {
		"fails-after-rendezvous"
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		&[FeatureKind::Object]
	}

	fn process_class(&self, cx: &mut ClassContext<'_>) -> Result<(), ContributorError> {
		if cx.descriptor.key.as_str() != "demo::Doomed" {
			return Ok(());
		}
		self.0.wait();
		thread::sleep(Duration::from_millis(50));
		Err("doomed".into())
	}
}

fn cached_failure(result: MetamodelResult<Arc<ObjectSpecification>>) -> Arc<MetamodelError> {
	match result {
		Err(MetamodelError::Introspection { source, .. }) => source,
		other => panic!("expected introspection failure, got {other:?}"),
	}
}

#[test]
fn waiting_thread_receives_the_cached_failure() {
	let rendezvous = Arc::new(Barrier::new(2));
	let loader = loader_with(
		[TypeDescriptor::class("demo::Doomed")],
		standard_model().with(FailsAfterRendezvous(Arc::clone(&rendezvous))),
		MetamodelConfig::default(),
	);

	let (first, second) = thread::scope(|s| {
		let first = s.spawn(|| loader.load_specification(&key("demo::Doomed")));
		let second = s.spawn(|| {
			// Released only once the first thread owns the introspection.
			rendezvous.wait();
			loader.load_specification(&key("demo::Doomed"))
		});
		(first.join().unwrap(), second.join().unwrap())
	});

	let first = cached_failure(first);
	let second = cached_failure(second);
	assert!(Arc::ptr_eq(&first, &second));
	assert!(matches!(
		&*first,
		MetamodelError::Contributor { factory, .. } if *factory == "fails-after-rendezvous"
	));
	assert_eq!(loader.introspection_count(), 1);
	assert_eq!(
		loader.state(&key("demo::Doomed")),
		Some(IntrospectionState::Failed)
	);
}
