//! Reflection support for tagged records.
//!
//! The `Reflect` trait exposes a type's tagged fields as a static metadata table plus accessors into a live
//! instance, allowing generic code to read and write fields by external name. Structs get it from
//! `#[derive(Reflect)]`; the common non-composite types implement it here so that passing them to an accessor is
//! a runtime `InvalidInput` rather than a missing trait bound.

use std::any::{self, Any};
use std::fmt;

/// A read view of a field's current value.
pub type FieldValue<'a> = &'a dyn Any;

/// A mutable alias of one field slot, bound to the borrow of its record.
pub type FieldRef<'a> = &'a mut dyn Any;

/// The shape of a reflected value. Only `Struct` is accepted by the accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Named, tuple or unit struct.
    Struct,
    Enum,
    /// Numbers, booleans, characters and strings.
    Scalar,
    Sequence,
    Optional,
}

impl Kind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Struct => "struct",
            Kind::Enum => "enum",
            Kind::Scalar => "scalar",
            Kind::Sequence => "sequence",
            Kind::Optional => "optional",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one tagged field, generated by `#[derive(Reflect)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedField {
    /// External name from `#[tag("...")]`. May be the exclusion sentinel.
    pub tag: &'static str,
    /// Rust field name, or the position for tuple structs.
    pub ident: &'static str,
    /// The field's type as written in the declaration.
    pub type_name: &'static str,
}

impl TaggedField {
    pub const fn new(tag: &'static str, ident: &'static str, type_name: &'static str) -> Self {
        Self { tag, ident, type_name }
    }
}

/// Provides tag-keyed access to a type's fields.
///
/// This trait is typically derived using `#[derive(Reflect)]`. Implementations must keep the three accessors
/// consistent: `field(i)` and `fields_mut()[i]` both refer to the field described by `tagged_fields()[i]`.
///
/// # Examples
///
/// ```
/// use tagreflect::{Kind, Reflect};
///
/// #[derive(Reflect)]
/// struct Person {
///     #[tag("name")]
///     name: String,
///     #[tag("age")]
///     age: i64,
/// }
///
/// let person = Person { name: "Ann".into(), age: 41 };
/// assert_eq!(person.kind(), Kind::Struct);
/// assert_eq!(person.tagged_fields()[1].tag, "age");
/// assert_eq!(person.field(1).and_then(|v| v.downcast_ref::<i64>()), Some(&41));
/// ```
pub trait Reflect: Any {
    fn kind(&self) -> Kind;

    /// Fully qualified name of the concrete type, also through `dyn Reflect`.
    fn type_name(&self) -> &'static str {
        any::type_name::<Self>()
    }

    /// Tagged fields in declaration order.
    fn tagged_fields(&self) -> &'static [TaggedField] {
        &[]
    }

    /// The value of the field at `index` in `tagged_fields()`.
    fn field(&self, index: usize) -> Option<&dyn Any> {
        let _ = index;
        None
    }

    /// Mutable borrows of every tagged field, in `tagged_fields()` order.
    fn fields_mut(&mut self) -> Vec<&mut dyn Any> {
        Vec::new()
    }
}

macro_rules! impl_reflect_leaf {
    ($kind:ident => $($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn kind(&self) -> Kind {
                    Kind::$kind
                }
            }
        )*
    };
}

impl_reflect_leaf!(Scalar =>
    bool, char,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
    String, &'static str,
);

impl<T: 'static> Reflect for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }
}

impl<T: 'static> Reflect for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Optional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Leaf implementations
    // ========================================

    #[test]
    fn test_scalars_have_no_fields() {
        let n = 7_i64;
        assert_eq!(n.kind(), Kind::Scalar);
        assert!(n.tagged_fields().is_empty());
        assert!(n.field(0).is_none());
    }

    #[test]
    fn test_containers_report_their_kind() {
        assert_eq!(vec![1_u8].kind(), Kind::Sequence);
        assert_eq!(Some("x".to_string()).kind(), Kind::Optional);
        assert_eq!("x".kind(), Kind::Scalar);
    }

    #[test]
    fn test_type_name_resolves_through_trait_object() {
        let mut s = String::from("ann");
        let erased: &mut dyn Reflect = &mut s;
        assert_eq!(erased.type_name(), "alloc::string::String");
        assert!(erased.fields_mut().is_empty());
    }

    // ========================================
    // Derived implementations
    // ========================================

    #[derive(crate::Reflect)]
    struct Sample {
        #[tag("a")]
        a: u32,
        #[tag = "b"]
        b: Vec<String>,
        #[allow(dead_code)]
        untagged: u8,
    }

    #[test]
    fn test_derive_builds_descriptor_table() {
        let sample = Sample { a: 1, b: vec![], untagged: 0 };
        let fields = sample.tagged_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], TaggedField::new("a", "a", "u32"));
        assert_eq!((fields[1].tag, fields[1].ident), ("b", "b"));
        assert!(fields[1].type_name.starts_with("Vec"));
        assert!(sample.field(2).is_none());
    }

    #[test]
    fn test_derive_fields_mut_aliases_each_slot() {
        let mut sample = Sample { a: 1, b: vec![], untagged: 0 };
        for slot in sample.fields_mut() {
            if let Some(a) = slot.downcast_mut::<u32>() {
                *a = 9;
            } else if let Some(b) = slot.downcast_mut::<Vec<String>>() {
                b.push("x".into());
            }
        }
        assert_eq!(sample.a, 9);
        assert_eq!(sample.b, vec!["x".to_string()]);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::Struct.to_string(), "struct");
        assert_eq!(Kind::Optional.to_string(), "optional");
    }
}
