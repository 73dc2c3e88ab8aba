//! Fields: table columns, foreign keys, summary labels, and the shared
//! read-only view over every kind of field.

use crate::config::FieldConfig;
use crate::error::{ConfigResult, ConfigurationError};
use crate::sql::expr::{lit_str, table_col, Expr, ExprExt};
use crate::star::{AdditiveField, CalculatedField};
use crate::value::{convert, FieldFormat, FieldType, RawValue, Value};

use super::filter::{Filter, Operator};
use super::validator::Validator;

/// Read-only interface shared by every kind of field.
pub trait FieldInfo {
    fn display_name(&self) -> &str;
    fn dtype(&self) -> FieldType;
    fn field_format(&self) -> FieldFormat;
    fn editable(&self) -> bool;
    fn primary_key(&self) -> bool;
    /// Expression producing this field's value in a composed query.
    fn schema(&self) -> Expr;
}

/// A column of a table.
#[derive(Debug, Clone)]
pub struct Field {
    pub table: String,
    pub name: String,
    pub dtype: FieldType,
    pub display_name: String,
    pub field_format: FieldFormat,
    pub editable: bool,
    pub primary_key: bool,
    pub default_value: Option<Value>,
    pub visible: bool,
    pub validator: Option<Validator>,
    pub filter_operators: Vec<Operator>,
}

/// A field referencing the primary key of a dimension.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub field: Field,
    pub dimension: String,
    pub foreign_key_field: String,
}

/// A column of a table, plain or referencing a dimension.
#[derive(Debug, Clone)]
pub enum TableField {
    Plain(Field),
    ForeignKey(ForeignKey),
}

impl Field {
    /// Build a field from configuration.
    ///
    /// Returns a [`TableField::ForeignKey`] when the configuration names a
    /// dimension.
    pub fn from_config(table: &str, config: &FieldConfig) -> ConfigResult<TableField> {
        let missing = |key| ConfigurationError::MissingKey {
            table: table.to_string(),
            field: config.name.clone(),
            key,
        };

        let dtype = config
            .dtype
            .or_else(|| config.format.map(FieldFormat::field_type))
            .ok_or_else(|| missing("type"))?;
        let field_format = config.format.unwrap_or_else(|| dtype.default_format());

        let default_value = match &config.default {
            Some(raw) => convert(dtype, &RawValue::from(raw)).map_err(|source| {
                ConfigurationError::InvalidDefault {
                    table: table.to_string(),
                    field: config.name.clone(),
                    source,
                }
            })?,
            None => None,
        };

        let validator = config
            .validator
            .as_ref()
            .map(Validator::from_config)
            .transpose()
            .map_err(|message| ConfigurationError::InvalidValidator {
                table: table.to_string(),
                field: config.name.clone(),
                message,
            })?;

        let filter_operators = match (&config.filter_operators, &config.dimension) {
            (Some(ops), _) => ops.clone(),
            (None, Some(_)) => Vec::new(),
            (None, None) => Operator::defaults_for(dtype).to_vec(),
        };
        if let Some(op) = filter_operators.iter().find(|op| !op.applies_to(dtype)) {
            return Err(ConfigurationError::InvalidOperator {
                table: table.to_string(),
                field: config.name.clone(),
                operator: op.to_string(),
                dtype,
            });
        }

        let field = Field {
            table: table.to_string(),
            name: config.name.clone(),
            dtype,
            display_name: config
                .display_name
                .clone()
                .unwrap_or_else(|| config.name.clone()),
            field_format,
            editable: config.editable,
            primary_key: config.primary_key,
            default_value,
            visible: config.visible,
            validator,
            filter_operators,
        };

        let Some(dimension) = &config.dimension else {
            return Ok(TableField::Plain(field));
        };
        if dtype != FieldType::Int {
            return Err(ConfigurationError::ForeignKeyType {
                table: table.to_string(),
                field: config.name.clone(),
                dtype,
            });
        }
        let foreign_key_field = config
            .foreign_key_field
            .clone()
            .ok_or_else(|| missing("foreign_key_field"))?;
        Ok(TableField::ForeignKey(ForeignKey {
            field,
            dimension: dimension.clone(),
            foreign_key_field,
        }))
    }

    /// Filters offered on this field. Hidden and key fields get none.
    pub fn filters(&self) -> Vec<Filter> {
        if !self.visible || self.primary_key {
            return Vec::new();
        }
        self.filter_operators
            .iter()
            .map(|op| Filter::new(&self.display_name, self.dtype, *op, self.schema()))
            .collect()
    }
}

impl FieldInfo for Field {
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
        self.editable
    }

    fn primary_key(&self) -> bool {
        self.primary_key
    }

    fn schema(&self) -> Expr {
        table_col(&self.table, &self.name)
    }
}

impl TableField {
    /// The underlying column.
    pub fn field(&self) -> &Field {
        match self {
            TableField::Plain(field) => field,
            TableField::ForeignKey(fk) => &fk.field,
        }
    }

    pub fn name(&self) -> &str {
        &self.field().name
    }

    pub fn as_foreign_key(&self) -> Option<&ForeignKey> {
        match self {
            TableField::ForeignKey(fk) => Some(fk),
            TableField::Plain(_) => None,
        }
    }

    pub fn filters(&self) -> Vec<Filter> {
        self.field().filters()
    }

    pub fn as_field_like(&self) -> FieldLike<'_> {
        match self {
            TableField::Plain(field) => FieldLike::Plain(field),
            TableField::ForeignKey(fk) => FieldLike::ForeignKey(fk),
        }
    }
}

/// Concatenated label describing a dimension row.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryField {
    pub display_name: String,
    pub table: String,
    pub display_fields: Vec<String>,
    pub separator: String,
}

impl SummaryField {
    /// `like` filter over the label.
    pub fn filter(&self) -> Filter {
        Filter::new(
            &self.display_name,
            FieldType::Str,
            Operator::Like,
            self.schema(),
        )
    }
}

impl FieldInfo for SummaryField {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn dtype(&self) -> FieldType {
        FieldType::Str
    }

    fn field_format(&self) -> FieldFormat {
        FieldFormat::Str
    }

    fn editable(&self) -> bool {
        false
    }

    fn primary_key(&self) -> bool {
        false
    }

    fn schema(&self) -> Expr {
        let mut columns = self
            .display_fields
            .iter()
            .map(|name| table_col(&self.table, name));
        let Some(first) = columns.next() else {
            return lit_str("");
        };
        columns.fold(first, |label, column| {
            label.concat(lit_str(&self.separator)).concat(column)
        })
    }
}

/// Any field a star or view can project, order or filter on.
#[derive(Debug, Clone, Copy)]
pub enum FieldLike<'a> {
    Plain(&'a Field),
    ForeignKey(&'a ForeignKey),
    Summary(&'a SummaryField),
    Calculated(&'a CalculatedField),
    Additive(&'a AdditiveField),
}

impl FieldLike<'_> {
    fn info(&self) -> &dyn FieldInfo {
        match self {
            FieldLike::Plain(f) => *f,
            FieldLike::ForeignKey(f) => &f.field,
            FieldLike::Summary(f) => *f,
            FieldLike::Calculated(f) => *f,
            FieldLike::Additive(f) => *f,
        }
    }
}

impl FieldInfo for FieldLike<'_> {
    fn display_name(&self) -> &str {
        self.info().display_name()
    }

    fn dtype(&self) -> FieldType {
        self.info().dtype()
    }

    fn field_format(&self) -> FieldFormat {
        self.info().field_format()
    }

    fn editable(&self) -> bool {
        self.info().editable()
    }

    fn primary_key(&self) -> bool {
        self.info().primary_key()
    }

    fn schema(&self) -> Expr {
        self.info().schema()
    }
}
