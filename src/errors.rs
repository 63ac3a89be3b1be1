//! Error taxonomy for the field accessor.
//!
//! `ReflectError` carries the user-facing message; `ErrorKind` is the stable, `Copy` discriminant callers branch
//! on. Failures are structural: retrying with the same record and names fails identically.

use thiserror::Error;

/// Errors returned by the accessor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    /// The record is not a struct.
    #[error("input must be a reference to a struct, got `{type_name}`")]
    InvalidInput { type_name: &'static str },

    #[error("field '{0}' not found")]
    FieldNotFound(String),

    /// The same field was requested twice where a unique mutable borrow is needed.
    #[error("field '{0}' requested more than once")]
    DuplicateField(String),
}

/// Discriminant of a [`ReflectError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    FieldNotFound,
    DuplicateField,
}

impl ReflectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReflectError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ReflectError::FieldNotFound(_) => ErrorKind::FieldNotFound,
            ReflectError::DuplicateField(_) => ErrorKind::DuplicateField,
        }
    }

    /// The field name involved, if the error concerns one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ReflectError::InvalidInput { .. } => None,
            ReflectError::FieldNotFound(name) | ReflectError::DuplicateField(name) => Some(name),
        }
    }

    pub(crate) fn not_found(name: &str) -> Self {
        ReflectError::FieldNotFound(name.to_owned())
    }

    pub(crate) fn duplicate(name: &str) -> Self {
        ReflectError::DuplicateField(name.to_owned())
    }
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::FieldNotFound => "FieldNotFound",
            ErrorKind::DuplicateField => "DuplicateField",
        }
    }
}
