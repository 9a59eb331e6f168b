//! Object specifications built by introspecting statically described domain
//! types.
//!
//! ```ignore
//! let catalog = Arc::new(TypeCatalog::from_inventory().with_builtin_values());
//! let registry = Arc::new(ValueSemanticsRegistry::with_builtins());
//! let loader = SpecificationLoader::new(
//!     catalog,
//!     ProgrammingModel::standard(registry),
//!     MetamodelConfig::default(),
//! );
//! let customer = loader.load_specification(&TypeKey::new("demo::Customer"))?;
//! for association in customer.visible_associations() {
//!     println!("{}", association.name());
//! }
//! ```
//!
//! Introspection order for one type:
//!
//! 1. class-level facet factories;
//! 2. inferred name and plural when none were contributed;
//! 3. member discovery with member and parameter factories, skipped for
//!    value types; member types are loaded and linked here;
//! 4. superclass and interface linking, with subtype registration;
//! 5. member ordering, separately for associations and actions;
//! 6. wrapping into [`Association`]s and [`ObjectAction`]s, then publication.

mod catalog;
pub mod config;
mod descriptor;
mod error;
pub mod factory;
mod faceted;
mod introspect;
mod loader;
mod member;
mod object;
pub mod ordering;

pub use catalog::{DomainTypeReg, TypeCatalog};
pub use config::{ConfigError, IntrospectionPolicy, MemberLayout, MetamodelConfig};
pub use descriptor::{
	Annotation, Annotations, MemberDescriptor, ParameterDescriptor, TypeDescriptor, TypeShape,
};
pub use error::{ContributorError, MetamodelError, MetamodelResult};
pub use factory::{FacetFactory, ProcessingStage, ProgrammingModel};
pub use faceted::{FacetedMethod, FacetedMethodParameter};
#[doc(hidden)]
pub use inventory;
pub use loader::SpecificationLoader;
pub use member::{
	ActionParameter, Association, ObjectAction, ObjectMember, OneToManyAssociation,
	OneToOneAssociation,
};
pub use object::{IntrospectionState, LayoutGroup, ObjectSpecification, SpecLink};
