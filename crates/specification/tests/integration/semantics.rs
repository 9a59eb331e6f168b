use std::cmp::Ordering;
use std::sync::Arc;

use metaspec_semantics::{
	QualifierSet, Renderer, SemanticsError, Value, ValueSemanticsProvider, ValueSemanticsRegistry,
};
use metaspec_specification::{
	Annotation, MemberDescriptor, MetamodelConfig, ProgrammingModel, TypeDescriptor,
};
use pretty_assertions::assert_eq;

use crate::common::{key, loader, loader_with};

/// Renders every value with a fixed prefix so tests can tell providers apart.
struct Tagged(&'static str);

impl Renderer for Tagged {
	fn title(&self, value: &Value) -> String {
		format!("{}:{value}", self.0)
	}
}

struct TaggedProvider(&'static str);

impl ValueSemanticsProvider for TaggedProvider {
	fn id(&self) -> &str {
		self.0
	}

	fn renderer(&self) -> Option<Arc<dyn Renderer>> {
		Some(Arc::new(Tagged(self.0)))
	}
}

fn money_loader() -> metaspec_specification::SpecificationLoader {
	let mut registry = ValueSemanticsRegistry::with_builtins();
	registry
		.register("demo::Money", Arc::new(TaggedProvider("A")), QualifierSet::new())
		.register("demo::Money", Arc::new(TaggedProvider("B")), QualifierSet::parse("x"));

	loader_with(
		[
			TypeDescriptor::class("demo::Money"),
			TypeDescriptor::class("demo::Invoice")
				.member(MemberDescriptor::property("net", "demo::Money"))
				.member(
					MemberDescriptor::property("gross", "demo::Money")
						.annotate(Annotation::new("ValueSemantics").with("qualifiers", "x")),
				)
				.member(
					MemberDescriptor::property("amount", "demo::Money")
						.annotate(Annotation::new("ValueSemantics").with("qualifiers", "y")),
				),
		],
		ProgrammingModel::standard(Arc::new(registry)),
		MetamodelConfig::default(),
	)
}

#[test]
fn unqualified_feature_selects_unqualified_provider() {
	let loader = money_loader();
	let invoice = loader.load_specification(&key("demo::Invoice")).unwrap();
	let net = invoice.association("net").unwrap().as_one_to_one().unwrap();
	let renderer = net.renderer().unwrap();
	assert!(!renderer.is_pseudo());
	assert_eq!(renderer.title(&Value::Int(5)), "A:5");
}

#[test]
fn qualified_feature_selects_intersecting_provider() {
	let loader = money_loader();
	let invoice = loader.load_specification(&key("demo::Invoice")).unwrap();
	let gross = invoice.association("gross").unwrap().as_one_to_one().unwrap();
	assert_eq!(gross.renderer().unwrap().title(&Value::Int(5)), "B:5");
}

#[test]
fn unmatched_qualifiers_degrade_to_pseudo_provider() {
	let loader = money_loader();
	let invoice = loader.load_specification(&key("demo::Invoice")).unwrap();
	let amount = invoice.association("amount").unwrap().as_one_to_one().unwrap();

	let renderer = amount.renderer().unwrap();
	assert!(renderer.is_pseudo());
	let title = renderer.title(&Value::Int(5));
	assert!(title.contains("demo::Invoice#amount"), "{title}");
	assert!(title.contains("demo::Money"), "{title}");

	// No candidate offers a parser at all, qualified or not.
	let parser = amount.parser().unwrap();
	assert!(parser.is_pseudo());
	assert!(matches!(
		parser.parse("12"),
		Err(SemanticsError::Unsupported { .. })
	));

	let order = amount.order_relation().unwrap();
	assert_eq!(order.compare(&Value::Int(1), &Value::Int(2)), Ordering::Equal);
	let codec = amount.encoder_decoder().unwrap();
	assert!(codec.encode(&Value::Int(1)).is_err());
	assert!(codec.decode("1").is_err());
}

#[test]
fn builtin_value_property_parses_and_renders() {
	let loader = loader([TypeDescriptor::class("demo::Order")
		.member(MemberDescriptor::property("quantity", "i64"))
		.member(MemberDescriptor::property("customer", "demo::Order"))]);
	let order = loader.load_specification(&key("demo::Order")).unwrap();

	let quantity = order.association("quantity").unwrap().as_one_to_one().unwrap();
	assert!(quantity.spec().unwrap().is_value());
	let parser = quantity.parser().unwrap();
	assert_eq!(parser.parse("1_000").unwrap(), Value::Int(1000));
	assert_eq!(quantity.renderer().unwrap().title(&Value::Int(7)), "7");
	let codec = quantity.encoder_decoder().unwrap();
	assert_eq!(codec.decode(&codec.encode(&Value::Int(-3)).unwrap()).unwrap(), Value::Int(-3));

	// Reference properties carry no value semantics.
	let customer = order.association("customer").unwrap().as_one_to_one().unwrap();
	assert!(customer.parser().is_none());
}

#[test]
fn action_parameters_select_semantics_from_their_own_holder() {
	let mut registry = ValueSemanticsRegistry::with_builtins();
	registry.register("demo::Money", Arc::new(TaggedProvider("B")), QualifierSet::parse("x"));
	let loader = loader_with(
		[
			TypeDescriptor::class("demo::Money"),
			TypeDescriptor::class("demo::Till").member(
				MemberDescriptor::action("deposit")
					.param("count", "i64")
					.with_param(
						metaspec_specification::ParameterDescriptor::new("cash", "demo::Money")
							.annotate(Annotation::new("ValueSemantics").with("qualifiers", "x")),
					)
					.param("note", "demo::Money"),
			),
		],
		ProgrammingModel::standard(Arc::new(registry)),
		MetamodelConfig::default(),
	);
	let till = loader.load_specification(&key("demo::Till")).unwrap();
	let deposit = till.action("deposit").unwrap();

	let count = deposit.parameter(0).unwrap();
	assert_eq!(count.parser().unwrap().parse(" 42 ").unwrap(), Value::Int(42));

	let cash = deposit.parameter(1).unwrap();
	assert_eq!(cash.renderer().unwrap().title(&Value::Int(1)), "B:1");

	// An unqualified parameter does not match the qualified candidate.
	let note = deposit.parameter(2).unwrap();
	let renderer = note.renderer().unwrap();
	assert!(renderer.is_pseudo());
	assert!(renderer.title(&Value::Int(1)).contains("demo::Till#deposit[2]"));
}
