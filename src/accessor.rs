//! Tag-keyed field enumeration, value extraction and reference extraction.
//!
//! Every operation starts from the record's generated `TaggedField` table and rejects anything that is not a
//! struct with `InvalidInput`. Fields whose tag equals the configured sentinel (`"-"` by default) are skipped
//! everywhere, including the name→index tables used for lookups.

use std::collections::{HashMap, HashSet};

use crate::config::{AccessorConfig, MissingFieldPolicy};
use crate::errors::ReflectError;
use crate::reflect::{FieldRef, FieldValue, Kind, Reflect, TaggedField};

/// Reads and writes record fields by their external (tag) name.
#[derive(Debug, Clone, Default)]
pub struct FieldAccessor {
    config: AccessorConfig,
}

impl FieldAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AccessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AccessorConfig {
        &self.config
    }

    /// Visible field names in declaration order.
    #[tracing::instrument(level = "trace", skip_all, fields(record = record.type_name()))]
    pub fn fields<R>(&self, record: &R) -> Result<Vec<&'static str>, ReflectError>
    where
        R: Reflect + ?Sized,
    {
        let fields = tagged_fields(record)?;
        Ok(fields.iter().filter(|f| self.is_visible(f)).map(|f| f.tag).collect())
    }

    /// `(tag, declared type)` pairs for the visible fields, in declaration order.
    pub fn field_types<R>(&self, record: &R) -> Result<Vec<(&'static str, &'static str)>, ReflectError>
    where
        R: Reflect + ?Sized,
    {
        let fields = tagged_fields(record)?;
        Ok(fields
            .iter()
            .filter(|f| self.is_visible(f))
            .map(|f| (f.tag, f.type_name))
            .collect())
    }

    /// Current values of the requested fields.
    ///
    /// Output follows the record's declaration order, not the order of `names`. Names that are not tagged on the
    /// record are skipped unless the config's `missing_field_policy` is `Error`.
    #[tracing::instrument(level = "trace", skip_all, fields(record = record.type_name(), requested = names.len()))]
    pub fn values<'r, R, S>(&self, record: &'r R, names: &[S]) -> Result<Vec<FieldValue<'r>>, ReflectError>
    where
        R: Reflect + ?Sized,
        S: AsRef<str>,
    {
        let fields = tagged_fields(record)?;

        if self.config.missing_field_policy == MissingFieldPolicy::Error {
            let table = self.index_table(fields);
            if let Some(missing) = names.iter().map(|n| n.as_ref()).find(|n| !table.contains_key(*n)) {
                return Err(ReflectError::not_found(missing));
            }
        }

        let requested: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
        let mut values = Vec::with_capacity(requested.len());
        for (index, field) in fields.iter().enumerate() {
            if !self.is_visible(field) || !requested.contains(field.tag) {
                continue;
            }
            let value = record.field(index).ok_or_else(|| ReflectError::not_found(field.tag))?;
            values.push(value);
        }
        Ok(values)
    }

    /// Mutable references to the requested fields, in the order of `names`.
    ///
    /// Fails with `FieldNotFound` at the first name that is not tagged on the record, and with `DuplicateField` if
    /// a name is requested twice.
    #[tracing::instrument(level = "trace", skip_all, fields(record = record.type_name(), requested = names.len()))]
    pub fn field_references<'r, R, S>(
        &self,
        record: &'r mut R,
        names: &[S],
    ) -> Result<Vec<FieldRef<'r>>, ReflectError>
    where
        R: Reflect + ?Sized,
        S: AsRef<str>,
    {
        let table = self.index_table(tagged_fields(&*record)?);
        let mut slots: Vec<Option<FieldRef<'r>>> = record.fields_mut().into_iter().map(Some).collect();

        let mut refs = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let index = *table.get(name).ok_or_else(|| ReflectError::not_found(name))?;
            let slot = slots.get_mut(index).ok_or_else(|| ReflectError::not_found(name))?;
            refs.push(slot.take().ok_or_else(|| ReflectError::duplicate(name))?);
        }
        Ok(refs)
    }

    /// Every visible field name mapped to a mutable reference to its slot.
    ///
    /// If two fields share a tag, the name maps to the last one declared.
    #[tracing::instrument(level = "trace", skip_all, fields(record = record.type_name()))]
    pub fn field_reference_map<'r, R>(
        &self,
        record: &'r mut R,
    ) -> Result<HashMap<&'static str, FieldRef<'r>>, ReflectError>
    where
        R: Reflect + ?Sized,
    {
        let mut names = self.fields(&*record)?;
        let mut seen = HashSet::with_capacity(names.len());
        names.retain(|name| seen.insert(*name));

        let refs = self.field_references(record, &names)?;
        Ok(names.into_iter().zip(refs).collect())
    }

    /// Keeps the candidate names present on the record, with their references, in candidate order.
    ///
    /// A candidate that is not tagged on the record fails with `FieldNotFound`. A record that is not a struct
    /// fails with `InvalidInput`. Any other failure while building the reference map yields empty results,
    /// unless the config enables `strict_filter`.
    #[tracing::instrument(level = "trace", skip_all, fields(record = record.type_name(), requested = names.len()))]
    pub fn filter_field_references<'r, R, S>(
        &self,
        names: &[S],
        record: &'r mut R,
    ) -> Result<(Vec<&'static str>, Vec<FieldRef<'r>>), ReflectError>
    where
        R: Reflect + ?Sized,
        S: AsRef<str>,
    {
        tagged_fields(&*record)?;
        let mut map = match self.field_reference_map(record) {
            Ok(map) => map,
            Err(err) if self.config.strict_filter => return Err(err),
            Err(_) => return Ok((Vec::new(), Vec::new())),
        };

        let mut columns = Vec::with_capacity(names.len());
        let mut refs = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            match map.remove_entry(name) {
                Some((column, field_ref)) => {
                    columns.push(column);
                    refs.push(field_ref);
                }
                None if columns.iter().any(|column| *column == name) => return Err(ReflectError::duplicate(name)),
                None => return Err(ReflectError::not_found(name)),
            }
        }
        Ok((columns, refs))
    }

    fn is_visible(&self, field: &TaggedField) -> bool {
        field.tag != self.config.sentinel
    }

    /// Visible tag → position in the table; the last declaration wins.
    fn index_table(&self, fields: &'static [TaggedField]) -> HashMap<&'static str, usize> {
        fields
            .iter()
            .enumerate()
            .filter(|(_, f)| self.is_visible(f))
            .map(|(index, f)| (f.tag, index))
            .collect()
    }
}

/// The record's field table, or `InvalidInput` if it is not a struct.
fn tagged_fields<R>(record: &R) -> Result<&'static [TaggedField], ReflectError>
where
    R: Reflect + ?Sized,
{
    match record.kind() {
        Kind::Struct => Ok(record.tagged_fields()),
        _ => Err(ReflectError::InvalidInput {
            type_name: record.type_name(),
        }),
    }
}
