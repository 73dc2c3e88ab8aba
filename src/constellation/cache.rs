//! Foreign-key label cache.
//!
//! Maps a dimension or lookup table name to `{primary key -> label}` so the
//! display layer can show foreign keys as text. Entries are fetched through
//! the [`QueryExecutor`] when first requested and again after the table is
//! marked dirty.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::{CacheError, ResolutionError};
use crate::model::{Dimension, LookupTable};
use crate::value::{convert, FieldType, RawValue, Value};

use super::executor::{check_width, QueryExecutor};

/// Labels by primary key. Key `0` is always present with an empty label.
pub type Labels = BTreeMap<i64, String>;

/// Separator between labels of a lookup table entry.
pub const LOOKUP_SEPARATOR: &str = "; ";

/// The tables a cache can resolve.
#[derive(Debug, Clone, Copy)]
pub struct CachedTables<'a> {
    pub dimensions: &'a BTreeMap<String, Arc<Dimension>>,
    pub lookup_tables: &'a BTreeMap<String, Arc<LookupTable>>,
}

impl CachedTables<'_> {
    fn contains(&self, name: &str) -> bool {
        self.dimensions.contains_key(name) || self.lookup_tables.contains_key(name)
    }
}

#[derive(Debug, Default)]
pub struct ForeignKeyCache {
    labels: HashMap<String, Labels>,
    dirty: BTreeSet<String>,
}

impl ForeignKeyCache {
    /// A cache where every table starts dirty.
    pub fn new(tables: CachedTables<'_>) -> Self {
        Self {
            labels: HashMap::new(),
            dirty: tables
                .dimensions
                .keys()
                .chain(tables.lookup_tables.keys())
                .cloned()
                .collect(),
        }
    }

    /// Tables whose labels will be fetched on next access.
    pub fn dirty(&self) -> &BTreeSet<String> {
        &self.dirty
    }

    /// Labels for `name`, fetched first if dirty.
    pub fn foreign_keys<E>(
        &mut self,
        name: &str,
        tables: CachedTables<'_>,
        executor: &mut E,
    ) -> Result<&Labels, CacheError>
    where
        E: QueryExecutor + ?Sized,
    {
        if !tables.contains(name) {
            return Err(ResolutionError::NotCached(name.to_string()).into());
        }
        if self.dirty.contains(name) || !self.labels.contains_key(name) {
            let labels = self.fetch(name, tables, executor)?;
            tracing::debug!(table = name, entries = labels.len(), "refreshed foreign key labels");
            self.labels.insert(name.to_string(), labels);
            self.dirty.remove(name);
        }
        self.labels
            .get(name)
            .ok_or_else(|| ResolutionError::NotCached(name.to_string()).into())
    }

    /// Mark `name` dirty, along with every lookup table joined through it.
    ///
    /// Marking an already-dirty table is a no-op.
    pub fn refresh(&mut self, name: &str, tables: CachedTables<'_>) -> Result<(), ResolutionError> {
        if !tables.contains(name) {
            return Err(ResolutionError::NotCached(name.to_string()));
        }
        self.dirty.insert(name.to_string());
        for (lookup_name, lookup) in tables.lookup_tables {
            if lookup.proximal_fk().dimension == name || lookup.distal_fk().dimension == name {
                self.dirty.insert(lookup_name.clone());
            }
        }
        tracing::debug!(table = name, dirty = self.dirty.len(), "invalidated foreign key labels");
        Ok(())
    }

    fn fetch<E>(
        &mut self,
        name: &str,
        tables: CachedTables<'_>,
        executor: &mut E,
    ) -> Result<Labels, CacheError>
    where
        E: QueryExecutor + ?Sized,
    {
        let mut labels = if let Some(dimension) = tables.dimensions.get(name) {
            let rows = executor.fetch(&dimension.label_query())?;
            check_width(&rows, 2)?;
            let mut labels = Labels::new();
            for row in &rows {
                let Some(key) = key_of(name, &row[0])? else {
                    continue;
                };
                let label = convert(FieldType::Str, &row[1])
                    .map_err(|source| CacheError::Conversion {
                        table: name.to_string(),
                        source,
                    })?
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                labels.insert(key, label);
            }
            labels
        } else if let Some(lookup) = tables.lookup_tables.get(name) {
            let distal = &lookup.distal_fk().dimension;
            if !tables.dimensions.contains_key(distal) {
                return Err(ResolutionError::UnknownTable(distal.clone()).into());
            }
            let distal_labels = self.foreign_keys(distal, tables, executor)?.clone();

            let rows = executor.fetch(&lookup.pairs_query())?;
            check_width(&rows, 2)?;
            let mut grouped: BTreeMap<i64, Vec<&str>> = BTreeMap::new();
            for row in &rows {
                let (Some(proximal), Some(distal_key)) =
                    (key_of(name, &row[0])?, key_of(name, &row[1])?)
                else {
                    continue;
                };
                match distal_labels.get(&distal_key) {
                    Some(label) if !label.is_empty() => {
                        grouped.entry(proximal).or_default().push(label)
                    }
                    _ => {}
                }
            }
            grouped
                .into_iter()
                .map(|(key, parts)| (key, parts.join(LOOKUP_SEPARATOR)))
                .collect()
        } else {
            return Err(ResolutionError::NotCached(name.to_string()).into());
        };
        labels.insert(0, String::new());
        Ok(labels)
    }
}

fn key_of(table: &str, cell: &RawValue) -> Result<Option<i64>, CacheError> {
    match convert(FieldType::Int, cell) {
        Ok(Some(Value::Int(n))) => Ok(Some(n)),
        Ok(_) => Ok(None),
        Err(source) => Err(CacheError::Conversion {
            table: table.to_string(),
            source,
        }),
    }
}
