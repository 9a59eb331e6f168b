//! Statically declared structure of domain types.
//!
//! Member discovery never reflects over foreign code: every domain type is
//! described by a [`TypeDescriptor`] built with the builder methods below and
//! registered in a [`crate::TypeCatalog`].

use metaspec_facets::{FeatureKind, TypeKey};

/// Whether a type can be instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeShape {
	#[default]
	Class,
	Interface,
	Abstract,
}

/// Opaque annotation. The engine never interprets these; facet factories do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
	name: String,
	attributes: Vec<(String, String)>,
}

impl Annotation {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			attributes: Vec::new(),
		}
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.push((key.into(), value.into()));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// First value recorded for `key`.
	pub fn attribute(&self, key: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
		self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

/// Annotations in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations(Vec<Annotation>);

impl Annotations {
	pub fn push(&mut self, annotation: Annotation) {
		self.0.push(annotation);
	}

	pub fn get(&self, name: &str) -> Option<&Annotation> {
		self.0.iter().find(|a| a.name == name)
	}

	pub fn has(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
		self.0.iter()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
	pub name: String,
	pub ty: TypeKey,
	pub annotations: Annotations,
}

impl ParameterDescriptor {
	pub fn new(name: impl Into<String>, ty: impl Into<TypeKey>) -> Self {
		Self {
			name: name.into(),
			ty: ty.into(),
			annotations: Annotations::default(),
		}
	}

	pub fn annotate(mut self, annotation: Annotation) -> Self {
		self.annotations.push(annotation);
		self
	}
}

/// One declared member: a property getter, a collection accessor or an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
	pub id: String,
	pub feature: FeatureKind,
	/// Property type, collection element type or action return type.
	pub ty: Option<TypeKey>,
	pub parameters: Vec<ParameterDescriptor>,
	pub annotations: Annotations,
}

impl MemberDescriptor {
	fn new(id: impl Into<String>, feature: FeatureKind, ty: Option<TypeKey>) -> Self {
		Self {
			id: id.into(),
			feature,
			ty,
			parameters: Vec::new(),
			annotations: Annotations::default(),
		}
	}

	pub fn property(id: impl Into<String>, ty: impl Into<TypeKey>) -> Self {
		Self::new(id, FeatureKind::Property, Some(ty.into()))
	}

	pub fn collection(id: impl Into<String>, element: impl Into<TypeKey>) -> Self {
		Self::new(id, FeatureKind::Collection, Some(element.into()))
	}

	/// An action returning nothing; see [`Self::returns`].
	pub fn action(id: impl Into<String>) -> Self {
		Self::new(id, FeatureKind::Action, None)
	}

	pub fn returns(mut self, ty: impl Into<TypeKey>) -> Self {
		self.ty = Some(ty.into());
		self
	}

	pub fn param(self, name: impl Into<String>, ty: impl Into<TypeKey>) -> Self {
		self.with_param(ParameterDescriptor::new(name, ty))
	}

	pub fn with_param(mut self, param: ParameterDescriptor) -> Self {
		self.parameters.push(param);
		self
	}

	pub fn annotate(mut self, annotation: Annotation) -> Self {
		self.annotations.push(annotation);
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
	pub key: TypeKey,
	pub shape: TypeShape,
	pub superclass: Option<TypeKey>,
	pub interfaces: Vec<TypeKey>,
	/// Set on synthetic proxy types; names the real type they stand for.
	pub proxy_of: Option<TypeKey>,
	pub members: Vec<MemberDescriptor>,
	pub annotations: Annotations,
}

impl TypeDescriptor {
	fn new(key: impl Into<TypeKey>, shape: TypeShape) -> Self {
		Self {
			key: key.into(),
			shape,
			superclass: None,
			interfaces: Vec::new(),
			proxy_of: None,
			members: Vec::new(),
			annotations: Annotations::default(),
		}
	}

	pub fn class(key: impl Into<TypeKey>) -> Self {
		Self::new(key, TypeShape::Class)
	}

	pub fn interface(key: impl Into<TypeKey>) -> Self {
		Self::new(key, TypeShape::Interface)
	}

	pub fn abstract_class(key: impl Into<TypeKey>) -> Self {
		Self::new(key, TypeShape::Abstract)
	}

	pub fn extends(mut self, superclass: impl Into<TypeKey>) -> Self {
		self.superclass = Some(superclass.into());
		self
	}

	pub fn implements(mut self, interface: impl Into<TypeKey>) -> Self {
		self.interfaces.push(interface.into());
		self
	}

	pub fn proxy_for(mut self, real: impl Into<TypeKey>) -> Self {
		self.proxy_of = Some(real.into());
		self
	}

	pub fn member(mut self, member: MemberDescriptor) -> Self {
		self.members.push(member);
		self
	}

	pub fn annotate(mut self, annotation: Annotation) -> Self {
		self.annotations.push(annotation);
		self
	}

	pub fn simple_name(&self) -> &str {
		self.key.simple_name()
	}
}
