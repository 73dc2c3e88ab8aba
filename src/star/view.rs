//! Views: grouped, aggregated projections over a star.

use std::fmt;
use std::str::FromStr;

use crate::config::ViewConfig;
use crate::error::{ComposeResult, CompositionError, ConfigResult, ConfigurationError, ResolutionError};
use crate::model::{FieldInfo, OrderSpec};
use crate::sql::expr::{avg, count, sum, Expr, ExprExt};
use crate::sql::query::{OrderByExpr, Query, SelectExpr};
use crate::value::{FieldFormat, FieldType};

use super::Star;

/// The supported aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Count,
    Avg,
    Sum,
}

impl AggregateKind {
    pub fn apply(self, expr: Expr) -> Expr {
        match self {
            AggregateKind::Count => count(expr),
            AggregateKind::Avg => avg(expr),
            AggregateKind::Sum => sum(expr),
        }
    }

    pub fn dtype(self) -> FieldType {
        match self {
            AggregateKind::Count => FieldType::Int,
            AggregateKind::Avg | AggregateKind::Sum => FieldType::Float,
        }
    }
}

impl FromStr for AggregateKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" => Ok(AggregateKind::Count),
            "avg" => Ok(AggregateKind::Avg),
            "sum" => Ok(AggregateKind::Sum),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateKind::Count => "count",
            AggregateKind::Avg => "avg",
            AggregateKind::Sum => "sum",
        })
    }
}

/// An aggregate over one star field.
#[derive(Debug, Clone)]
pub struct AdditiveField {
    pub display_name: String,
    pub base_field_display_name: String,
    pub aggregate: AggregateKind,
    schema: Expr,
}

impl FieldInfo for AdditiveField {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn dtype(&self) -> FieldType {
        self.aggregate.dtype()
    }

    fn field_format(&self) -> FieldFormat {
        self.aggregate.dtype().default_format()
    }

    fn editable(&self) -> bool {
        false
    }

    fn primary_key(&self) -> bool {
        false
    }

    fn schema(&self) -> Expr {
        self.schema.clone()
    }
}

/// A star field a view groups by.
#[derive(Debug, Clone)]
pub struct GroupField {
    pub display_name: String,
    pub dtype: FieldType,
    pub field_format: FieldFormat,
    schema: Expr,
}

impl FieldInfo for GroupField {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn dtype(&self) -> FieldType {
        self.dtype
    }

    fn field_format(&self) -> FieldFormat {
        self.field_format
    }

    fn editable(&self) -> bool {
        false
    }

    fn primary_key(&self) -> bool {
        false
    }

    fn schema(&self) -> Expr {
        self.schema.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct AggregateSpec {
    display_name: String,
    base_field: String,
    aggregate: AggregateKind,
}

/// A view checked against configuration but not yet bound to its star.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefinition {
    pub name: String,
    pub display_name: String,
    pub fact: String,
    group_by: Vec<String>,
    aggregates: Vec<AggregateSpec>,
    order_by: Vec<OrderSpec>,
}

impl ViewDefinition {
    /// Validate a view's configuration. Unknown aggregates fail here.
    pub fn from_config(config: &ViewConfig) -> ConfigResult<Self> {
        let aggregates = config
            .aggregates
            .iter()
            .map(|agg| {
                let aggregate = agg.aggregate.parse::<AggregateKind>().map_err(|()| {
                    ConfigurationError::InvalidAggregate {
                        view: config.name.clone(),
                        field: agg.display_name.clone(),
                        aggregate: agg.aggregate.clone(),
                    }
                })?;
                Ok(AggregateSpec {
                    display_name: agg.display_name.clone(),
                    base_field: agg.base_field.clone(),
                    aggregate,
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            name: config.name.clone(),
            display_name: config
                .display_name
                .clone()
                .unwrap_or_else(|| config.name.clone()),
            fact: config.fact.clone(),
            group_by: config.group_by.clone(),
            aggregates,
            order_by: config
                .order_by
                .iter()
                .map(|o| OrderSpec {
                    field: o.field.clone(),
                    dir: o.direction.into(),
                })
                .collect(),
        })
    }
}

/// A grouped projection bound to its star's fields.
#[derive(Debug, Clone)]
pub struct View {
    pub name: String,
    pub display_name: String,
    pub fact: String,
    group_by: Vec<GroupField>,
    additive: Vec<AdditiveField>,
    order_by: Vec<OrderSpec>,
}

impl View {
    /// Resolve grouping and aggregated fields against `star`.
    pub fn new(definition: &ViewDefinition, star: &Star) -> ComposeResult<Self> {
        let unknown = |field: &str| {
            CompositionError::new(
                &definition.name,
                ResolutionError::UnknownField {
                    table: star.name().to_string(),
                    field: field.to_string(),
                },
            )
            .with_field(field)
        };

        let group_by = definition
            .group_by
            .iter()
            .map(|name| {
                let field = star.field(name).ok_or_else(|| unknown(name))?;
                Ok(GroupField {
                    display_name: name.clone(),
                    dtype: field.dtype(),
                    field_format: field.field_format(),
                    schema: field.schema(),
                })
            })
            .collect::<ComposeResult<Vec<_>>>()?;

        let additive = definition
            .aggregates
            .iter()
            .map(|spec| {
                let base = star
                    .field(&spec.base_field)
                    .ok_or_else(|| unknown(&spec.base_field))?;
                Ok(AdditiveField {
                    display_name: spec.display_name.clone(),
                    base_field_display_name: spec.base_field.clone(),
                    aggregate: spec.aggregate,
                    schema: spec.aggregate.apply(base.schema()),
                })
            })
            .collect::<ComposeResult<Vec<_>>>()?;

        Ok(Self {
            name: definition.name.clone(),
            display_name: definition.display_name.clone(),
            fact: definition.fact.clone(),
            group_by,
            additive,
            order_by: definition.order_by.clone(),
        })
    }

    pub fn group_by(&self) -> &[GroupField] {
        &self.group_by
    }

    pub fn additive_fields(&self) -> &[AdditiveField] {
        &self.additive
    }

    /// Projected columns in order: grouping fields, then aggregates.
    pub fn columns(&self) -> Vec<&dyn FieldInfo> {
        self.group_by
            .iter()
            .map(|f| f as &dyn FieldInfo)
            .chain(self.additive.iter().map(|f| f as &dyn FieldInfo))
            .collect()
    }

    /// Aggregated rows have no key to edit by.
    pub fn primary_key_index(&self) -> Option<usize> {
        None
    }

    pub fn editable(&self) -> bool {
        false
    }

    /// Compose the grouped query over `star`, sharing its joins and filters.
    pub fn compose(&self, star: &Star) -> ComposeResult<Query> {
        let columns = self.columns();
        let projection: Vec<SelectExpr> = columns
            .iter()
            .map(|f| f.schema().alias(f.display_name()))
            .collect();
        let group_by: Vec<Expr> = self.group_by.iter().map(FieldInfo::schema).collect();

        let order_by = self
            .order_by
            .iter()
            .map(|spec| {
                let field = columns
                    .iter()
                    .find(|f| f.display_name() == spec.field)
                    .ok_or_else(|| {
                        CompositionError::new(
                            &self.name,
                            ResolutionError::UnknownField {
                                table: self.name.clone(),
                                field: spec.field.clone(),
                            },
                        )
                        .with_field(&spec.field)
                    })?;
                Ok(OrderByExpr::new(field.schema(), spec.dir))
            })
            .collect::<ComposeResult<Vec<_>>>()?;

        let query = star
            .base_query()
            .select(projection)
            .group_by(group_by)
            .order_by(order_by)
            .limit(star.display_rows());

        tracing::debug!(
            view = %self.name,
            groups = self.group_by.len(),
            aggregates = self.additive.len(),
            "composed view"
        );
        Ok(query)
    }
}
