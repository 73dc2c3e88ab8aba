//! Configuration records for a constellation.
//!
//! A configuration lists dimensions, facts, lookup tables and views. Records
//! here are plain data; the model layer validates them when it builds
//! fields and tables.
//!
//! ```toml
//! [[dimensions]]
//! table_name = "customers"
//! display_name = "Customers"
//! summary = { display_name = "Customer", fields = ["first_name", "last_name"] }
//!
//! [[dimensions.fields]]
//! name = "id"
//! type = "int"
//! primary_key = true
//!
//! [[dimensions.fields]]
//! name = "first_name"
//! type = "str"
//!
//! [[facts]]
//! table_name = "orders"
//! order_by = [{ field = "placed", direction = "desc" }]
//!
//! [[facts.fields]]
//! name = "customer_id"
//! type = "int"
//! dimension = "customers"
//! foreign_key_field = "id"
//!
//! [[facts.calculated_fields]]
//! display_name = "Net"
//! formula = "[Price] - [Discount]"
//! ```

mod settings;

pub use settings::{Settings, DEFAULT_DISPLAY_ROWS};

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigResult, ConfigurationError};
use crate::model::Operator;
use crate::sql::SortDir;
use crate::value::{FieldFormat, FieldType, RawValue};

fn default_true() -> bool {
    true
}

fn default_separator() -> String {
    " ".to_string()
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConstellationConfig {
    pub settings: Settings,
    pub dimensions: Vec<DimensionConfig>,
    pub facts: Vec<FactConfig>,
    pub lookup_tables: Vec<LookupTableConfig>,
    pub views: Vec<ViewConfig>,
}

impl ConstellationConfig {
    /// Parse a TOML document.
    pub fn from_toml(source: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

/// Columns and presentation shared by every kind of table.
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    pub table_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub fields: Vec<FieldConfig>,
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default = "default_true")]
    pub show_on_load: bool,
    #[serde(default)]
    pub order_by: Vec<OrderConfig>,
    /// Overrides [`Settings::display_rows`].
    #[serde(default)]
    pub display_rows: Option<u64>,
}

/// One column of a table.
///
/// A field with `dimension` set is a foreign key and must also name the
/// `foreign_key_field` it references.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(default, rename = "type")]
    pub dtype: Option<FieldType>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub format: Option<FieldFormat>,
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub default: Option<ConfigValue>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub validator: Option<ValidatorConfig>,
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default)]
    pub foreign_key_field: Option<String>,
    #[serde(default)]
    pub filter_operators: Option<Vec<Operator>>,
}

impl FieldConfig {
    /// A plain field of the given type.
    pub fn new(name: impl Into<String>, dtype: FieldType) -> Self {
        Self {
            name: name.into(),
            dtype: Some(dtype),
            display_name: None,
            format: None,
            editable: true,
            primary_key: false,
            default: None,
            visible: true,
            validator: None,
            dimension: None,
            foreign_key_field: None,
            filter_operators: None,
        }
    }
}

/// Declarative form of a [`Validator`](crate::model::Validator).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatorConfig {
    Required,
    MaxLength {
        max: usize,
    },
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Pattern {
        pattern: String,
        #[serde(default)]
        message: Option<String>,
    },
}

/// A scalar written in the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<&ConfigValue> for RawValue {
    fn from(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::Bool(b) => RawValue::Bool(*b),
            ConfigValue::Int(n) => RawValue::Int(*n),
            ConfigValue::Float(f) => RawValue::Float(*f),
            ConfigValue::Str(s) => RawValue::Str(s.clone()),
        }
    }
}

/// Sort direction as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl From<OrderDirection> for SortDir {
    fn from(dir: OrderDirection) -> Self {
        match dir {
            OrderDirection::Asc => SortDir::Asc,
            OrderDirection::Desc => SortDir::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderConfig {
    pub field: String,
    #[serde(default)]
    pub direction: OrderDirection,
}

/// Human-readable label for a dimension or lookup row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryConfig {
    pub display_name: String,
    pub fields: Vec<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DimensionConfig {
    #[serde(flatten)]
    pub table: TableConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FactConfig {
    #[serde(flatten)]
    pub table: TableConfig,
    #[serde(default)]
    pub calculated_fields: Vec<CalculatedFieldConfig>,
}

/// A many-to-many association between two dimensions.
///
/// `proximal_fk` and `distal_fk` name foreign-key fields of this table.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupTableConfig {
    #[serde(flatten)]
    pub table: TableConfig,
    pub proximal_fk: String,
    pub distal_fk: String,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalculatedFieldConfig {
    pub display_name: String,
    pub formula: String,
    #[serde(default = "default_true")]
    pub show_on_fact_table: bool,
    #[serde(default)]
    pub default: Option<ConfigValue>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

/// A grouped projection over a fact's star.
///
/// `group_by` names star fields by display name. `order_by` names view
/// fields: a grouping field or an aggregate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewConfig {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub fact: String,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub aggregates: Vec<AggregateConfig>,
    #[serde(default)]
    pub order_by: Vec<OrderConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregateConfig {
    pub display_name: String,
    pub base_field: String,
    pub aggregate: String,
}
