//! Stars: a fact with the dimensions it references, composed into a query.
//!
//! A [`Star`] is built in two phases. The schema model is built first from
//! configuration; the star then resolves its dimensions and evaluates its
//! calculated fields against those fields. Composition never mutates the
//! star, apart from filter values set by the caller.

pub mod calculated;
pub mod view;

pub use calculated::CalculatedField;
pub use view::{AdditiveField, AggregateKind, GroupField, View, ViewDefinition};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ComposeResult, CompositionError, Error, ResolutionError};
use crate::model::{Dimension, Fact, FieldInfo, FieldLike, Filter};
use crate::sql::expr::{table_col, Expr, ExprExt};
use crate::sql::query::{OrderByExpr, Query, SelectExpr, TableRef};
use crate::value::RawValue;

/// A fact, the dimensions its foreign keys reference, and its filters.
#[derive(Debug)]
pub struct Star {
    fact: Arc<Fact>,
    /// Joined dimensions with the fact column joined on, in field order.
    dimensions: Vec<(String, Arc<Dimension>)>,
    calculated: Vec<CalculatedField>,
    filters: Vec<Filter>,
}

impl Star {
    /// Resolve `fact`'s dimensions from `registry` and build its calculated
    /// fields.
    pub fn new(
        fact: Arc<Fact>,
        registry: &BTreeMap<String, Arc<Dimension>>,
    ) -> ComposeResult<Self> {
        let entity = fact.name().to_string();

        let mut dimensions: Vec<(String, Arc<Dimension>)> = Vec::new();
        for fk in fact.table.foreign_keys() {
            let dimension = registry.get(&fk.dimension).ok_or_else(|| {
                CompositionError::new(
                    &entity,
                    ResolutionError::UnknownDimension {
                        field: fk.field.name.clone(),
                        dimension: fk.dimension.clone(),
                    },
                )
                .with_field(&fk.field.name)
            })?;
            // One join per dimension; the first foreign key wins.
            if !dimensions.iter().any(|(_, d)| d.name() == dimension.name()) {
                dimensions.push((fk.field.name.clone(), Arc::clone(dimension)));
            }
        }

        let mut calculated: Vec<CalculatedField> = Vec::new();
        for config in &fact.calculated_fields {
            let lookup = |name: &str| {
                fact.table
                    .fields()
                    .iter()
                    .map(|f| f.field())
                    .find(|f| f.display_name == name)
                    .map(FieldInfo::schema)
                    .or_else(|| {
                        calculated
                            .iter()
                            .find(|c| c.display_name == name)
                            .map(FieldInfo::schema)
                    })
            };
            let field = CalculatedField::new(config, &lookup).map_err(|cause| {
                CompositionError::new(&entity, cause).with_field(&config.display_name)
            })?;
            calculated.push(field);
        }

        let mut filters: Vec<Filter> = dimensions
            .iter()
            .map(|(_, d)| d.summary.filter())
            .chain(fact.table.filters())
            .chain(calculated.iter().flat_map(CalculatedField::filters))
            .collect();
        filters.sort();

        tracing::debug!(
            star = %entity,
            dimensions = dimensions.len(),
            calculated = calculated.len(),
            filters = filters.len(),
            "built star"
        );

        Ok(Self {
            fact,
            dimensions,
            calculated,
            filters,
        })
    }

    pub fn name(&self) -> &str {
        self.fact.name()
    }

    pub fn fact(&self) -> &Fact {
        &self.fact
    }

    /// Dimensions joined into this star.
    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter().map(|(_, d)| d.as_ref())
    }

    pub fn calculated_fields(&self) -> &[CalculatedField] {
        &self.calculated
    }

    pub fn display_rows(&self) -> u64 {
        self.fact.table.display_rows
    }

    /// Every field addressable by display name: fact fields, dimension
    /// summaries, then calculated fields.
    pub fn fields(&self) -> Vec<FieldLike<'_>> {
        self.fact
            .table
            .fields()
            .iter()
            .map(|f| f.as_field_like())
            .chain(self.dimensions.iter().map(|(_, d)| FieldLike::Summary(&d.summary)))
            .chain(self.calculated.iter().map(FieldLike::Calculated))
            .collect()
    }

    /// Look up a field by display name.
    pub fn field(&self, display_name: &str) -> Option<FieldLike<'_>> {
        self.fields()
            .into_iter()
            .find(|f| f.display_name() == display_name)
    }

    /// Projected columns in order: fact fields, dimension labels, then
    /// calculated fields shown on the fact table.
    pub fn columns(&self) -> Vec<FieldLike<'_>> {
        self.fields()
            .into_iter()
            .filter(|f| match f {
                FieldLike::Calculated(c) => c.show_on_fact_table,
                _ => true,
            })
            .collect()
    }

    /// Filters, sorted by display name.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn filter(&self, display_name: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.display_name() == display_name)
    }

    pub fn filter_mut(&mut self, display_name: &str) -> Option<&mut Filter> {
        self.filters
            .iter_mut()
            .find(|f| f.display_name() == display_name)
    }

    /// Set a filter value by filter display name.
    ///
    /// An unknown filter or a value that does not convert leaves every filter
    /// unchanged.
    pub fn set_filter(&mut self, display_name: &str, raw: impl Into<RawValue>) -> crate::Result<()> {
        let table = self.name().to_string();
        let filter = self
            .filter_mut(display_name)
            .ok_or_else(|| ResolutionError::UnknownFilter {
                table,
                filter: display_name.to_string(),
            })?;
        filter.set_value(raw).map_err(Error::from)
    }

    pub fn clear_filters(&mut self) {
        self.filters.iter_mut().for_each(Filter::clear);
    }

    /// Predicates of every filter with a value.
    pub fn predicates(&self) -> Vec<Expr> {
        self.filters.iter().filter_map(Filter::filter).collect()
    }

    /// FROM, outer joins and WHERE shared by the star and its views.
    pub fn base_query(&self) -> Query {
        let fact = self.name();
        let joined = self.dimensions.iter().fold(
            Query::new().from(TableRef::new(fact)),
            |query, (fk, dimension)| {
                let pk = dimension.table.primary_key();
                query.left_join(
                    TableRef::new(dimension.name()),
                    table_col(fact, fk).eq(table_col(dimension.name(), &pk.name)),
                )
            },
        );
        self.predicates().into_iter().fold(joined, Query::filter)
    }

    /// Compose the star's query.
    pub fn compose(&self) -> ComposeResult<Query> {
        let projection: Vec<SelectExpr> = self
            .columns()
            .iter()
            .map(|f| f.schema().alias(f.display_name()))
            .collect();

        let order_by = self
            .fact
            .table
            .order_by
            .iter()
            .map(|spec| {
                let expr = self.order_key(&spec.field).ok_or_else(|| {
                    CompositionError::new(
                        self.name(),
                        ResolutionError::UnknownField {
                            table: self.name().to_string(),
                            field: spec.field.clone(),
                        },
                    )
                    .with_field(&spec.field)
                })?;
                Ok(OrderByExpr::new(expr, spec.dir))
            })
            .collect::<ComposeResult<Vec<_>>>()?;

        let query = self
            .base_query()
            .select(projection)
            .order_by(order_by)
            .limit(self.display_rows());

        tracing::debug!(
            star = %self.name(),
            joins = query.joins.len(),
            filters = self.predicates().len(),
            "composed star"
        );
        Ok(query)
    }

    /// Resolve an ordering key: a dimension summary by display name, then a
    /// fact field by storage name, then any star field by display name.
    fn order_key(&self, name: &str) -> Option<Expr> {
        if let Some((_, dimension)) = self
            .dimensions
            .iter()
            .find(|(_, d)| d.summary.display_name == name)
        {
            return Some(dimension.summary.schema());
        }
        if self.fact.table.has_field(name) {
            return self.fact.table.field(name).map(|f| f.field().schema());
        }
        self.field(name).map(|f| f.schema())
    }
}
