#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
//! Tag-keyed field access for Rust records.
//!
//! Given a reference to a record, `tagreflect` lists the record's external field names (declared with
//! `#[tag("...")]`) and produces either their values or mutable references to them, keyed by tag. Generic code
//! such as a data-mapping layer can then read or write arbitrary record fields by name without per-type accessor
//! boilerplate.
//!
//! The accessor table is generated at compile time by `#[derive(Reflect)]`; there is no runtime type inspection.
//!
//! ```
//! use tagreflect::Reflect;
//!
//! #[derive(Reflect)]
//! struct User {
//!     #[tag("id")]
//!     id: i64,
//!     #[tag("name")]
//!     name: String,
//!     #[tag("-")]
//!     secret: String,
//! }
//!
//! let mut user = User { id: 1, name: "Ann".into(), secret: "x".into() };
//! assert_eq!(tagreflect::fields(&user)?, ["id", "name"]);
//!
//! let mut refs = tagreflect::field_references(&mut user, &["name", "id"])?;
//! *refs[0].downcast_mut::<String>().unwrap() = "Bob".into();
//! *refs[1].downcast_mut::<i64>().unwrap() = 2;
//! assert_eq!((user.id, user.name.as_str()), (2, "Bob"));
//! # Ok::<(), tagreflect::ReflectError>(())
//! ```
//!
//! ## Error asymmetry
//!
//! Value extraction silently skips unknown names while reference extraction and filtering fail with
//! `FieldNotFound`. See [`AccessorConfig`] to make value extraction strict.

// Lets `#[derive(Reflect)]` output (which names `::tagreflect`) resolve inside this crate.
extern crate self as tagreflect;

pub mod accessor;
pub mod config;
pub mod errors;
pub mod reflect;

use std::collections::HashMap;

pub use accessor::FieldAccessor;
pub use config::{AccessorConfig, MissingFieldPolicy};
pub use errors::{ErrorKind, ReflectError};
pub use reflect::{FieldRef, FieldValue, Kind, Reflect, TaggedField};
pub use tagreflect_derive::Reflect;

/// Name of the value's type, for diagnostics. Not suitable for identity comparison.
pub fn type_name<T: ?Sized>(value: &T) -> &'static str {
    std::any::type_name_of_val(value)
}

/// See [`FieldAccessor::fields`].
pub fn fields<R: Reflect + ?Sized>(record: &R) -> Result<Vec<&'static str>, ReflectError> {
    FieldAccessor::new().fields(record)
}

/// See [`FieldAccessor::field_types`].
pub fn field_types<R: Reflect + ?Sized>(record: &R) -> Result<Vec<(&'static str, &'static str)>, ReflectError> {
    FieldAccessor::new().field_types(record)
}

/// See [`FieldAccessor::values`].
pub fn values<'r, R, S>(record: &'r R, names: &[S]) -> Result<Vec<FieldValue<'r>>, ReflectError>
where
    R: Reflect + ?Sized,
    S: AsRef<str>,
{
    FieldAccessor::new().values(record, names)
}

/// See [`FieldAccessor::field_references`].
pub fn field_references<'r, R, S>(record: &'r mut R, names: &[S]) -> Result<Vec<FieldRef<'r>>, ReflectError>
where
    R: Reflect + ?Sized,
    S: AsRef<str>,
{
    FieldAccessor::new().field_references(record, names)
}

/// See [`FieldAccessor::field_reference_map`].
pub fn field_reference_map<R>(record: &mut R) -> Result<HashMap<&'static str, FieldRef<'_>>, ReflectError>
where
    R: Reflect + ?Sized,
{
    FieldAccessor::new().field_reference_map(record)
}

/// See [`FieldAccessor::filter_field_references`].
pub fn filter_field_references<'r, R, S>(
    names: &[S],
    record: &'r mut R,
) -> Result<(Vec<&'static str>, Vec<FieldRef<'r>>), ReflectError>
where
    R: Reflect + ?Sized,
    S: AsRef<str>,
{
    FieldAccessor::new().filter_field_references(names, record)
}
