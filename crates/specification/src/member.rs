//! Public member representations exposed by an introspected specification.

use std::sync::Arc;

use metaspec_facets::{DescribedAsFacet, FacetHolder, FeatureKind, HiddenFacet, NamedFacet};
use metaspec_semantics::{EncoderDecoder, OrderRelation, Parser, Renderer};

use crate::{FacetedMethod, FacetedMethodParameter, ObjectSpecification, SpecLink};

/// Shared queries over properties, collections and actions.
pub trait ObjectMember {
	fn id(&self) -> &str;

	fn feature(&self) -> FeatureKind;

	fn holder(&self) -> &FacetHolder;

	/// Display name; falls back to the member id.
	fn name(&self) -> &str {
		self.holder()
			.facet::<NamedFacet>()
			.map(NamedFacet::name)
			.unwrap_or_else(|| self.id())
	}

	fn description(&self) -> Option<&str> {
		self.holder()
			.facet::<DescribedAsFacet>()
			.map(DescribedAsFacet::description)
	}

	fn is_hidden(&self) -> bool {
		self.holder()
			.facet::<HiddenFacet>()
			.is_some_and(HiddenFacet::is_hidden)
	}
}

macro_rules! delegate_member {
	($ty:ty) => {
		impl ObjectMember for $ty {
			fn id(&self) -> &str {
				self.method.id()
			}

			fn feature(&self) -> FeatureKind {
				self.method.feature()
			}

			fn holder(&self) -> &FacetHolder {
				self.method.holder()
			}
		}
	};
}

/// Semantics selected for a value-typed feature.
///
/// `None` when the feature's type is not (yet) a value type. Otherwise the
/// selection never fails; a miss yields a pseudo-provider.
fn value_semantics<T: ?Sized>(
	ty: Option<&SpecLink>,
	feature: &FacetHolder,
	select: impl FnOnce(&metaspec_semantics::ValueFacet, &FacetHolder) -> Arc<T>,
) -> Option<Arc<T>> {
	let spec = ty?.get()?;
	let facet = spec.value_facet()?;
	Some(select(facet, feature))
}

/// A single-valued property.
#[derive(Debug)]
pub struct OneToOneAssociation {
	method: FacetedMethod,
}

delegate_member!(OneToOneAssociation);

impl OneToOneAssociation {
	pub fn method(&self) -> &FacetedMethod {
		&self.method
	}

	/// Specification of the property type.
	pub fn spec(&self) -> Option<Arc<ObjectSpecification>> {
		self.method.type_link()?.get()
	}

	pub fn parser(&self) -> Option<Arc<dyn Parser>> {
		value_semantics(self.method.type_link(), self.holder(), |f, h| f.select_parser(h))
	}

	pub fn renderer(&self) -> Option<Arc<dyn Renderer>> {
		value_semantics(self.method.type_link(), self.holder(), |f, h| f.select_renderer(h))
	}

	pub fn encoder_decoder(&self) -> Option<Arc<dyn EncoderDecoder>> {
		value_semantics(self.method.type_link(), self.holder(), |f, h| {
			f.select_encoder_decoder(h)
		})
	}

	pub fn order_relation(&self) -> Option<Arc<dyn OrderRelation>> {
		value_semantics(self.method.type_link(), self.holder(), |f, h| {
			f.select_order_relation(h)
		})
	}
}

/// A collection of references.
#[derive(Debug)]
pub struct OneToManyAssociation {
	method: FacetedMethod,
}

delegate_member!(OneToManyAssociation);

impl OneToManyAssociation {
	pub fn method(&self) -> &FacetedMethod {
		&self.method
	}

	/// Specification of the element type.
	pub fn element_spec(&self) -> Option<Arc<ObjectSpecification>> {
		self.method.type_link()?.get()
	}
}

/// A property or a collection.
#[derive(Debug)]
pub enum Association {
	OneToOne(OneToOneAssociation),
	OneToMany(OneToManyAssociation),
}

impl Association {
	/// Wraps a property or collection method; `None` for actions.
	pub(crate) fn from_method(method: FacetedMethod) -> Option<Self> {
		match method.feature() {
			FeatureKind::Property => Some(Self::OneToOne(OneToOneAssociation { method })),
			FeatureKind::Collection => Some(Self::OneToMany(OneToManyAssociation { method })),
			_ => None,
		}
	}

	pub fn method(&self) -> &FacetedMethod {
		match self {
			Self::OneToOne(a) => &a.method,
			Self::OneToMany(a) => &a.method,
		}
	}

	pub fn as_one_to_one(&self) -> Option<&OneToOneAssociation> {
		match self {
			Self::OneToOne(a) => Some(a),
			Self::OneToMany(_) => None,
		}
	}

	pub fn as_one_to_many(&self) -> Option<&OneToManyAssociation> {
		match self {
			Self::OneToMany(a) => Some(a),
			Self::OneToOne(_) => None,
		}
	}

	pub fn is_collection(&self) -> bool {
		matches!(self, Self::OneToMany(_))
	}

	pub fn spec(&self) -> Option<Arc<ObjectSpecification>> {
		self.method().type_link()?.get()
	}
}

impl ObjectMember for Association {
	fn id(&self) -> &str {
		self.method().id()
	}

	fn feature(&self) -> FeatureKind {
		self.method().feature()
	}

	fn holder(&self) -> &FacetHolder {
		self.method().holder()
	}
}

/// An invocable member.
#[derive(Debug)]
pub struct ObjectAction {
	method: FacetedMethod,
	parameters: Vec<ActionParameter>,
}

delegate_member!(ObjectAction);

impl ObjectAction {
	pub(crate) fn from_method(mut method: FacetedMethod) -> Self {
		let parameters = method
			.take_parameters()
			.into_iter()
			.map(|parameter| ActionParameter { parameter })
			.collect();
		Self { method, parameters }
	}

	pub fn method(&self) -> &FacetedMethod {
		&self.method
	}

	/// Specification of the return type; `None` for actions returning nothing.
	pub fn return_spec(&self) -> Option<Arc<ObjectSpecification>> {
		self.method.type_link()?.get()
	}

	pub fn parameters(&self) -> &[ActionParameter] {
		&self.parameters
	}

	pub fn parameter(&self, index: usize) -> Option<&ActionParameter> {
		self.parameters.get(index)
	}

	pub fn parameter_count(&self) -> usize {
		self.parameters.len()
	}
}

#[derive(Debug)]
pub struct ActionParameter {
	parameter: FacetedMethodParameter,
}

impl ActionParameter {
	pub fn index(&self) -> usize {
		self.parameter.index()
	}

	pub fn id(&self) -> &str {
		self.parameter.name()
	}

	pub fn holder(&self) -> &FacetHolder {
		self.parameter.holder()
	}

	pub fn name(&self) -> &str {
		self.holder()
			.facet::<NamedFacet>()
			.map(NamedFacet::name)
			.unwrap_or_else(|| self.parameter.name())
	}

	pub fn type_link(&self) -> &SpecLink {
		self.parameter.type_link()
	}

	pub fn spec(&self) -> Option<Arc<ObjectSpecification>> {
		self.parameter.type_link().get()
	}

	pub fn parser(&self) -> Option<Arc<dyn Parser>> {
		value_semantics(Some(self.parameter.type_link()), self.holder(), |f, h| {
			f.select_parser(h)
		})
	}

	pub fn renderer(&self) -> Option<Arc<dyn Renderer>> {
		value_semantics(Some(self.parameter.type_link()), self.holder(), |f, h| {
			f.select_renderer(h)
		})
	}
}
