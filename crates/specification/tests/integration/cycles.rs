use std::sync::{Arc, Barrier};
use std::thread;

use metaspec_facets::FeatureKind;
use metaspec_specification::factory::ClassContext;
use metaspec_specification::{
	ContributorError, FacetFactory, IntrospectionState, MemberDescriptor, MetamodelConfig,
	ObjectMember, TypeDescriptor,
};

use crate::common::{key, loader, loader_with, standard_model};

fn parent_and_node() -> [TypeDescriptor; 2] {
	[
		TypeDescriptor::class("demo::Parent")
			.implements("demo::Node")
			.member(MemberDescriptor::property("name", "String")),
		TypeDescriptor::interface("demo::Node")
			.member(MemberDescriptor::property("parent", "demo::Parent")),
	]
}

#[test]
fn interface_returning_implementor_terminates() {
	let loader = loader(parent_and_node());

	let parent = loader.load_specification(&key("demo::Parent")).unwrap();
	assert_eq!(parent.state(), IntrospectionState::Introspected);

	let interfaces = parent.interfaces();
	assert_eq!(interfaces.len(), 1);
	assert_eq!(interfaces[0].key(), &key("demo::Node"));

	let node = interfaces[0].get().unwrap();
	assert!(node.is_introspected());
	assert!(node.is_interface());
	let back = node
		.association("parent")
		.and_then(|a| a.spec())
		.unwrap();
	assert!(Arc::ptr_eq(&back, &parent));

	let subtypes = node.subtypes();
	assert_eq!(subtypes.len(), 1);
	assert!(Arc::ptr_eq(&subtypes[0].get().unwrap(), &parent));
	assert!(parent.is_of_type(&key("demo::Node")));
	assert!(!node.is_of_type(&key("demo::Parent")));
	assert_eq!(loader.introspection_count(), 3);
}

#[test]
fn loading_from_the_interface_side_terminates() {
	let loader = loader(parent_and_node());
	let node = loader.load_specification(&key("demo::Node")).unwrap();
	let parent = node.association("parent").and_then(|a| a.spec()).unwrap();
	assert!(parent.is_introspected());
	assert_eq!(parent.interfaces().len(), 1);
	assert!(Arc::ptr_eq(&parent.interfaces()[0].get().unwrap(), &node));
}

#[test]
fn self_referential_type_links_to_itself() {
	let loader = loader([TypeDescriptor::class("demo::Category")
		.member(MemberDescriptor::property("parent", "demo::Category"))
		.member(MemberDescriptor::collection("children", "demo::Category"))]);

	let category = loader.load_specification(&key("demo::Category")).unwrap();
	let parent = category.association("parent").unwrap();
	let children = category.association("children").unwrap();
	assert!(!parent.is_collection());
	assert!(children.is_collection());
	assert!(Arc::ptr_eq(&parent.spec().unwrap(), &category));
	assert!(Arc::ptr_eq(
		&children.as_one_to_many().unwrap().element_spec().unwrap(),
		&category
	));
	assert_eq!(loader.introspection_count(), 1);
}

#[test]
fn duplicate_interfaces_are_linked_once() {
	let loader = loader([
		TypeDescriptor::class("demo::Widget")
			.implements("demo::Named")
			.implements("demo::Named"),
		TypeDescriptor::interface("demo::Named"),
	]);
	let widget = loader.load_specification(&key("demo::Widget")).unwrap();
	assert_eq!(widget.interfaces().len(), 1);
	let named = widget.interfaces()[0].get().unwrap();
	assert_eq!(named.subtypes().len(), 1);
}

/// Holds both introspections inside their class step until both have started.
struct Rendezvous(Barrier);

impl FacetFactory for Rendezvous {
	fn id(&self) -> &'static str {
		"rendezvous"
	}

	fn feature_kinds(&self) -> &'static [FeatureKind] {
		&[FeatureKind::Object]
	}

	fn process_class(&self, cx: &mut ClassContext<'_>) -> Result<(), ContributorError> {
		if cx.descriptor.key.as_str().starts_with("demo::Mutual") {
			self.0.wait();
		}
		Ok(())
	}
}

#[test]
fn mutual_references_on_two_threads_do_not_deadlock() {
	let model = standard_model().with(Rendezvous(Barrier::new(2)));
	let loader = loader_with(
		[
			TypeDescriptor::class("demo::MutualA")
				.member(MemberDescriptor::property("b", "demo::MutualB")),
			TypeDescriptor::class("demo::MutualB")
				.member(MemberDescriptor::property("a", "demo::MutualA")),
		],
		model,
		MetamodelConfig::default(),
	);

	let (a, b) = thread::scope(|s| {
		let a = s.spawn(|| loader.load_specification(&key("demo::MutualA")));
		let b = s.spawn(|| loader.load_specification(&key("demo::MutualB")));
		(a.join().unwrap().unwrap(), b.join().unwrap().unwrap())
	});

	assert!(a.is_introspected());
	assert!(b.is_introspected());
	assert_eq!(loader.introspection_count(), 2);
	assert!(Arc::ptr_eq(&a.association("b").unwrap().spec().unwrap(), &b));
	assert!(Arc::ptr_eq(&b.association("a").unwrap().spec().unwrap(), &a));
	assert_eq!(a.association("b").unwrap().name(), "B");
}
