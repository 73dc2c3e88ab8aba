//! Tables and the three roles a table plays in a star schema.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::config::{
    CalculatedFieldConfig, DimensionConfig, FactConfig, LookupTableConfig, Settings,
    SummaryConfig, TableConfig,
};
use crate::error::{ConfigResult, ConfigurationError, RowError};
use crate::sql::ddl::{ColumnDef, CreateTable};
use crate::sql::dml::{Delete, Insert, Update};
use crate::sql::expr::{lit_null, table_col, Expr, ExprExt, SortDir};
use crate::sql::query::{OrderByExpr, Query, TableRef};
use crate::value::{convert, FieldType, RawValue, Value};

use super::field::{Field, FieldInfo, ForeignKey, SummaryField, TableField};
use super::filter::Filter;

/// Alias of the label column in label queries.
pub const LABEL_COLUMN: &str = "label";

/// One configured ordering key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    /// Storage name or display name, resolved at composition.
    pub field: String,
    pub dir: SortDir,
}

/// A physical table and its fields.
#[derive(Debug)]
pub struct Table {
    pub table_name: String,
    pub display_name: String,
    pub editable: bool,
    pub show_on_load: bool,
    pub order_by: Vec<OrderSpec>,
    pub display_rows: u64,
    fields: Vec<TableField>,
    primary_key: usize,
    schema: OnceLock<CreateTable>,
}

impl Table {
    pub fn from_config(config: &TableConfig, settings: &Settings) -> ConfigResult<Self> {
        let table_name = &config.table_name;
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(config.fields.len());
        for field_config in &config.fields {
            if !seen.insert(field_config.name.as_str()) {
                return Err(ConfigurationError::DuplicateField {
                    table: table_name.clone(),
                    field: field_config.name.clone(),
                });
            }
            fields.push(Field::from_config(table_name, field_config)?);
        }

        let keys: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.field().primary_key)
            .map(|(i, _)| i)
            .collect();
        let primary_key = match keys.as_slice() {
            [only] => *only,
            [] => {
                return Err(ConfigurationError::MissingPrimaryKey {
                    table: table_name.clone(),
                })
            }
            many => {
                return Err(ConfigurationError::MultiplePrimaryKeys {
                    table: table_name.clone(),
                    fields: many.iter().map(|i| fields[*i].name().to_string()).collect(),
                })
            }
        };

        Ok(Self {
            table_name: table_name.clone(),
            display_name: config
                .display_name
                .clone()
                .unwrap_or_else(|| table_name.clone()),
            editable: config.editable,
            show_on_load: config.show_on_load,
            order_by: config
                .order_by
                .iter()
                .map(|o| OrderSpec {
                    field: o.field.clone(),
                    dir: o.direction.into(),
                })
                .collect(),
            display_rows: config.display_rows.unwrap_or(settings.display_rows),
            fields,
            primary_key,
            schema: OnceLock::new(),
        })
    }

    pub fn fields(&self) -> &[TableField] {
        &self.fields
    }

    /// Look up a field by storage name.
    ///
    /// Misses are expected when callers probe speculatively, so they are
    /// logged rather than treated as errors.
    pub fn field(&self, name: &str) -> Option<&TableField> {
        let found = self.fields.iter().find(|f| f.name() == name);
        if found.is_none() {
            tracing::warn!(table = %self.table_name, field = name, "no such field");
        }
        found
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }

    pub fn primary_key(&self) -> &Field {
        self.fields[self.primary_key].field()
    }

    /// Fields other than the primary key, in declaration order.
    pub fn non_key_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .map(TableField::field)
            .filter(|f| !f.primary_key)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.fields.iter().filter_map(TableField::as_foreign_key)
    }

    /// Filters offered by this table's own fields, sorted by display name.
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters: Vec<Filter> = self.fields.iter().flat_map(TableField::filters).collect();
        filters.sort();
        filters
    }

    /// Physical schema, derived once and shared.
    pub fn schema(&self) -> &CreateTable {
        self.schema.get_or_init(|| {
            let columns = self.fields.iter().map(|tf| {
                let field = tf.field();
                let mut column = ColumnDef::new(&field.name, field.dtype);
                if field.primary_key {
                    column = column.primary_key();
                }
                if let Some(default) = &field.default_value {
                    column = column.default(default.to_expr());
                }
                if let TableField::ForeignKey(fk) = tf {
                    column = column.references(&fk.dimension, &fk.foreign_key_field);
                }
                column
            });
            CreateTable::new(&self.table_name)
                .if_not_exists()
                .columns(columns)
        })
    }

    /// INSERT for one row. `values` align with [`non_key_fields`](Self::non_key_fields).
    pub fn add_row(&self, values: &[RawValue]) -> Result<Insert, RowError> {
        self.check_editable()?;
        let exprs = self.row_values(values)?;
        let columns: Vec<&str> = self.non_key_fields().map(|f| f.name.as_str()).collect();
        Ok(Insert::into(&self.table_name).columns(columns).values(exprs))
    }

    /// UPDATE of one row's editable fields.
    pub fn update_row(
        &self,
        primary_key: impl Into<RawValue>,
        values: &[RawValue],
    ) -> Result<Update, RowError> {
        self.check_editable()?;
        if !self.non_key_fields().any(|field| field.editable) {
            return Err(RowError::NothingToUpdate(self.table_name.clone()));
        }
        let key = self.key_predicate(primary_key.into())?;
        let exprs = self.row_values(values)?;
        let update = self
            .non_key_fields()
            .zip(exprs)
            .filter(|(field, _)| field.editable)
            .fold(Update::table(&self.table_name), |update, (field, expr)| {
                update.set(&field.name, expr)
            });
        Ok(update.filter(key))
    }

    pub fn delete_row(&self, primary_key: impl Into<RawValue>) -> Result<Delete, RowError> {
        self.check_editable()?;
        let key = self.key_predicate(primary_key.into())?;
        Ok(Delete::from(&self.table_name).filter(key))
    }

    fn check_editable(&self) -> Result<(), RowError> {
        if self.editable {
            Ok(())
        } else {
            Err(RowError::ReadOnly(self.table_name.clone()))
        }
    }

    fn key_predicate(&self, raw: RawValue) -> Result<Expr, RowError> {
        let pk = self.primary_key();
        let value = convert(pk.dtype, &raw)
            .map_err(|source| RowError::Conversion {
                table: self.table_name.clone(),
                field: pk.name.clone(),
                source,
            })?
            .ok_or_else(|| RowError::MissingPrimaryKey {
                table: self.table_name.clone(),
            })?;
        Ok(table_col(&self.table_name, &pk.name).eq(value.to_expr()))
    }

    /// Coerce and validate a row aligned with the non-key fields.
    fn row_values(&self, values: &[RawValue]) -> Result<Vec<Expr>, RowError> {
        let expected = self.non_key_fields().count();
        if values.len() != expected {
            return Err(RowError::ArityMismatch {
                table: self.table_name.clone(),
                expected,
                got: values.len(),
            });
        }

        self.fields
            .iter()
            .filter(|tf| !tf.field().primary_key)
            .zip(values)
            .map(|(tf, raw)| {
                let field = tf.field();
                let value = if raw.is_null() {
                    field.default_value.clone()
                } else {
                    convert(field.dtype, raw).map_err(|source| RowError::Conversion {
                        table: self.table_name.clone(),
                        field: field.name.clone(),
                        source,
                    })?
                };
                if let Some(validator) = &field.validator {
                    let outcome = validator.validate(value.as_ref());
                    if outcome.is_invalid {
                        return Err(RowError::Invalid {
                            table: self.table_name.clone(),
                            field: field.name.clone(),
                            message: outcome.message,
                        });
                    }
                }
                // A zero foreign key is "no selection".
                let value = match (tf, value) {
                    (TableField::ForeignKey(_), Some(Value::Int(0))) => None,
                    (_, value) => value,
                };
                Ok(value.map_or_else(lit_null, |v| v.to_expr()))
            })
            .collect()
    }
}

fn summary_field(table: &Table, config: &SummaryConfig) -> ConfigResult<SummaryField> {
    if let Some(missing) = config.fields.iter().find(|name| !table.has_field(name)) {
        return Err(ConfigurationError::UnknownField {
            table: table.table_name.clone(),
            field: missing.clone(),
        });
    }
    Ok(SummaryField {
        display_name: config.display_name.clone(),
        table: table.table_name.clone(),
        display_fields: config.fields.clone(),
        separator: config.separator.clone(),
    })
}

/// A reference table joined into fact rows.
#[derive(Debug)]
pub struct Dimension {
    pub table: Table,
    pub summary: SummaryField,
}

impl Dimension {
    pub fn from_config(config: &DimensionConfig, settings: &Settings) -> ConfigResult<Self> {
        let table = Table::from_config(&config.table, settings)?;
        let summary = summary_field(&table, &config.summary)?;
        Ok(Self { table, summary })
    }

    pub fn name(&self) -> &str {
        &self.table.table_name
    }

    /// `(primary key, label)` for every row, ordered by key.
    pub fn label_query(&self) -> Query {
        let pk = self.table.primary_key().schema();
        Query::new()
            .select(vec![
                pk.clone().into(),
                self.summary.schema().alias(LABEL_COLUMN),
            ])
            .from(TableRef::new(&self.table.table_name))
            .order_by(vec![OrderByExpr::asc(pk)])
    }
}

/// A measured table referencing dimensions.
#[derive(Debug)]
pub struct Fact {
    pub table: Table,
    pub calculated_fields: Vec<CalculatedFieldConfig>,
}

impl Fact {
    pub fn from_config(config: &FactConfig, settings: &Settings) -> ConfigResult<Self> {
        let table = Table::from_config(&config.table, settings)?;
        for calc in &config.calculated_fields {
            if let Some(raw) = &calc.default {
                convert(FieldType::Float, &RawValue::from(raw)).map_err(|source| {
                    ConfigurationError::InvalidDefault {
                        table: table.table_name.clone(),
                        field: calc.display_name.clone(),
                        source,
                    }
                })?;
            }
        }
        Ok(Self {
            table,
            calculated_fields: config.calculated_fields.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.table.table_name
    }
}

/// A many-to-many association between two dimensions.
#[derive(Debug)]
pub struct LookupTable {
    pub table: Table,
    pub summary: SummaryField,
    proximal: ForeignKey,
    distal: ForeignKey,
}

impl LookupTable {
    pub fn from_config(config: &LookupTableConfig, settings: &Settings) -> ConfigResult<Self> {
        let table = Table::from_config(&config.table, settings)?;
        let foreign_key = |name: &str| -> ConfigResult<ForeignKey> {
            let field = table
                .fields()
                .iter()
                .find(|f| f.name() == name)
                .ok_or_else(|| ConfigurationError::UnknownField {
                    table: table.table_name.clone(),
                    field: name.to_string(),
                })?;
            field
                .as_foreign_key()
                .cloned()
                .ok_or_else(|| ConfigurationError::NotAForeignKey {
                    table: table.table_name.clone(),
                    field: name.to_string(),
                })
        };
        let proximal = foreign_key(&config.proximal_fk)?;
        let distal = foreign_key(&config.distal_fk)?;
        if proximal.dimension == distal.dimension {
            return Err(ConfigurationError::LookupSameDimension {
                table: table.table_name.clone(),
                dimension: proximal.dimension.clone(),
            });
        }
        let summary = summary_field(&table, &config.summary)?;
        Ok(Self {
            table,
            summary,
            proximal,
            distal,
        })
    }

    pub fn name(&self) -> &str {
        &self.table.table_name
    }

    pub fn proximal_fk(&self) -> &ForeignKey {
        &self.proximal
    }

    pub fn distal_fk(&self) -> &ForeignKey {
        &self.distal
    }

    /// `(proximal, distal)` key pairs ordered by both columns.
    pub fn pairs_query(&self) -> Query {
        let proximal = self.proximal_fk().field.schema();
        let distal = self.distal_fk().field.schema();
        Query::new()
            .select(vec![proximal.clone(), distal.clone()])
            .from(TableRef::new(&self.table.table_name))
            .order_by(vec![OrderByExpr::asc(proximal), OrderByExpr::asc(distal)])
    }
}
