//! The constellation: every table, star and view of one model, plus the
//! foreign-key label cache.
//!
//! A [`Constellation`] is built once from a [`ConstellationConfig`]. Tables
//! are shared between the registry and the stars through [`Arc`]. A star or
//! view that fails to compose is kept as its error so that siblings stay
//! usable.

pub mod cache;
pub mod executor;

pub use cache::{CachedTables, ForeignKeyCache, Labels, LOOKUP_SEPARATOR};
pub use executor::{QueryExecutor, Row};

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use crate::config::{ConstellationConfig, Settings};
use crate::error::{
    CacheError, ComposeResult, CompositionError, ConfigResult, ConfigurationError, ResolutionError,
};
use crate::model::{Dimension, Fact, FieldInfo, LookupTable};
use crate::sql::ddl::CreateTable;
use crate::sql::query::Query;
use crate::star::{Star, View, ViewDefinition};
use crate::value::{convert, FieldType, Value};

use executor::check_width;

/// Typed rows returned by [`Constellation::fetch_star`] and
/// [`Constellation::fetch_view`].
pub type TypedRows = Vec<Vec<Option<Value>>>;

#[derive(Debug)]
pub struct Constellation {
    settings: Settings,
    dimensions: BTreeMap<String, Arc<Dimension>>,
    lookup_tables: BTreeMap<String, Arc<LookupTable>>,
    facts: BTreeMap<String, Arc<Fact>>,
    stars: BTreeMap<String, ComposeResult<Star>>,
    views: BTreeMap<String, ComposeResult<View>>,
    cache: ForeignKeyCache,
}

impl Constellation {
    /// Build every table, then every star, then every view.
    ///
    /// Configuration problems abort the build. Composition problems are
    /// logged and kept per star or view.
    pub fn from_config(config: &ConstellationConfig) -> ConfigResult<Self> {
        let settings = config.settings;

        let mut seen = HashSet::new();
        let names = config
            .dimensions
            .iter()
            .map(|d| &d.table.table_name)
            .chain(config.lookup_tables.iter().map(|l| &l.table.table_name))
            .chain(config.facts.iter().map(|f| &f.table.table_name));
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigurationError::DuplicateTable {
                    table: name.clone(),
                });
            }
        }

        let dimensions = config
            .dimensions
            .iter()
            .map(|c| Ok((c.table.table_name.clone(), Arc::new(Dimension::from_config(c, &settings)?))))
            .collect::<ConfigResult<BTreeMap<_, _>>>()?;
        let lookup_tables = config
            .lookup_tables
            .iter()
            .map(|c| Ok((c.table.table_name.clone(), Arc::new(LookupTable::from_config(c, &settings)?))))
            .collect::<ConfigResult<BTreeMap<_, _>>>()?;
        let facts = config
            .facts
            .iter()
            .map(|c| Ok((c.table.table_name.clone(), Arc::new(Fact::from_config(c, &settings)?))))
            .collect::<ConfigResult<BTreeMap<_, _>>>()?;

        let definitions = config
            .views
            .iter()
            .map(|c| {
                let definition = ViewDefinition::from_config(c)?;
                if !facts.contains_key(&definition.fact) {
                    return Err(ConfigurationError::UnknownFact {
                        view: definition.name,
                        fact: definition.fact,
                    });
                }
                Ok(definition)
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        let stars: BTreeMap<String, ComposeResult<Star>> = facts
            .iter()
            .map(|(name, fact)| {
                let star = Star::new(Arc::clone(fact), &dimensions);
                if let Err(err) = &star {
                    tracing::warn!(star = %name, error = %err, "star failed to compose");
                }
                (name.clone(), star)
            })
            .collect();

        let views = definitions
            .iter()
            .map(|definition| {
                let view = match stars.get(&definition.fact) {
                    Some(Ok(star)) => View::new(definition, star),
                    Some(Err(err)) => Err(CompositionError {
                        entity: definition.name.clone(),
                        ..err.clone()
                    }),
                    None => Err(CompositionError::new(
                        &definition.name,
                        ResolutionError::UnknownStar(definition.fact.clone()),
                    )),
                };
                if let Err(err) = &view {
                    tracing::warn!(view = %definition.name, error = %err, "view failed to compose");
                }
                (definition.name.clone(), view)
            })
            .collect();

        let cache = ForeignKeyCache::new(CachedTables {
            dimensions: &dimensions,
            lookup_tables: &lookup_tables,
        });

        tracing::debug!(
            dimensions = dimensions.len(),
            lookup_tables = lookup_tables.len(),
            facts = facts.len(),
            views = config.views.len(),
            "built constellation"
        );

        Ok(Self {
            settings,
            dimensions,
            lookup_tables,
            facts,
            stars,
            views,
            cache,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.get(name).map(Arc::as_ref)
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.values().map(Arc::as_ref)
    }

    pub fn lookup_table(&self, name: &str) -> Option<&LookupTable> {
        self.lookup_tables.get(name).map(Arc::as_ref)
    }

    pub fn fact(&self, name: &str) -> Option<&Fact> {
        self.facts.get(name).map(Arc::as_ref)
    }

    /// Names of every star, in order.
    pub fn star_names(&self) -> impl Iterator<Item = &str> {
        self.stars.keys().map(String::as_str)
    }

    /// Names of every view, in order.
    pub fn view_names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    /// The star over fact `name`, or the error it failed with.
    pub fn star(&self, name: &str) -> crate::Result<&Star> {
        match self.stars.get(name) {
            Some(Ok(star)) => Ok(star),
            Some(Err(err)) => Err(err.clone().into()),
            None => Err(ResolutionError::UnknownStar(name.to_string()).into()),
        }
    }

    /// Mutable access for setting filter values.
    pub fn star_mut(&mut self, name: &str) -> crate::Result<&mut Star> {
        match self.stars.get_mut(name) {
            Some(Ok(star)) => Ok(star),
            Some(Err(err)) => Err(err.clone().into()),
            None => Err(ResolutionError::UnknownStar(name.to_string()).into()),
        }
    }

    pub fn view(&self, name: &str) -> crate::Result<&View> {
        match self.views.get(name) {
            Some(Ok(view)) => Ok(view),
            Some(Err(err)) => Err(err.clone().into()),
            None => Err(ResolutionError::UnknownView(name.to_string()).into()),
        }
    }

    pub fn compose_star(&self, name: &str) -> crate::Result<Query> {
        Ok(self.star(name)?.compose()?)
    }

    /// Compose a view over its star's current filters.
    pub fn compose_view(&self, name: &str) -> crate::Result<Query> {
        let view = self.view(name)?;
        let star = self.star(&view.fact)?;
        Ok(view.compose(star)?)
    }

    /// CREATE TABLE statements: dimensions, then lookup tables, then facts.
    pub fn create_statements(&self) -> Vec<&CreateTable> {
        self.dimensions
            .values()
            .map(|d| d.table.schema())
            .chain(self.lookup_tables.values().map(|l| l.table.schema()))
            .chain(self.facts.values().map(|f| f.table.schema()))
            .collect()
    }

    /// Run a star's query and convert each cell to its column's type.
    pub fn fetch_star<E>(&self, name: &str, executor: &mut E) -> crate::Result<TypedRows>
    where
        E: QueryExecutor + ?Sized,
    {
        let star = self.star(name)?;
        let query = star.compose()?;
        let types: Vec<FieldType> = star.columns().iter().map(FieldInfo::dtype).collect();
        fetch_typed(&query, &types, executor)
    }

    /// Run a view's query and convert each cell to its column's type.
    pub fn fetch_view<E>(&self, name: &str, executor: &mut E) -> crate::Result<TypedRows>
    where
        E: QueryExecutor + ?Sized,
    {
        let view = self.view(name)?;
        let query = view.compose(self.star(&view.fact)?)?;
        let types: Vec<FieldType> = view.columns().iter().map(|f| f.dtype()).collect();
        fetch_typed(&query, &types, executor)
    }

    /// Labels by primary key for a dimension or lookup table, refreshed
    /// first if the table is dirty.
    pub fn foreign_keys<E>(&mut self, name: &str, executor: &mut E) -> Result<&Labels, CacheError>
    where
        E: QueryExecutor + ?Sized,
    {
        let tables = CachedTables {
            dimensions: &self.dimensions,
            lookup_tables: &self.lookup_tables,
        };
        self.cache.foreign_keys(name, tables, executor)
    }

    /// Mark a table's labels stale. Call after writing to it.
    pub fn refresh(&mut self, name: &str) -> Result<(), ResolutionError> {
        let tables = CachedTables {
            dimensions: &self.dimensions,
            lookup_tables: &self.lookup_tables,
        };
        self.cache.refresh(name, tables)
    }

    pub fn dirty(&self) -> &BTreeSet<String> {
        self.cache.dirty()
    }
}

fn fetch_typed<E>(query: &Query, types: &[FieldType], executor: &mut E) -> crate::Result<TypedRows>
where
    E: QueryExecutor + ?Sized,
{
    let rows = executor.fetch(query)?;
    check_width(&rows, types.len())?;
    let typed = rows
        .iter()
        .map(|row| {
            types
                .iter()
                .zip(row)
                .map(|(dtype, cell)| convert(*dtype, cell))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<TypedRows, _>>()?;
    Ok(typed)
}
