//! Error types for loading, composing and executing a constellation.
//!
//! Construction-time problems are [`ConfigurationError`]s and abort loading.
//! Everything that can go wrong per query ([`ResolutionError`],
//! [`ConversionError`], [`CompositionError`]) leaves the model untouched and
//! is surfaced through the crate-level [`Error`].

use std::path::PathBuf;

use crate::value::{FieldType, RawValue};

/// Result type for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

/// Result type for star and view composition.
pub type ComposeResult<T> = std::result::Result<T, CompositionError>;

/// Missing or invalid configuration. Fatal at load.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Table '{table}', field '{field}': missing required key '{key}'")]
    MissingKey {
        table: String,
        field: String,
        key: &'static str,
    },

    #[error("Table '{table}', field '{field}': invalid default value: {source}")]
    InvalidDefault {
        table: String,
        field: String,
        #[source]
        source: ConversionError,
    },

    #[error("Table '{table}' has no primary key field")]
    MissingPrimaryKey { table: String },

    #[error("Table '{table}' has more than one primary key field: {}", .fields.join(", "))]
    MultiplePrimaryKeys { table: String, fields: Vec<String> },

    #[error("Table '{table}' declares field '{field}' more than once")]
    DuplicateField { table: String, field: String },

    #[error("Table '{table}' is declared more than once")]
    DuplicateTable { table: String },

    #[error("Table '{table}' references unknown field '{field}'")]
    UnknownField { table: String, field: String },

    #[error("Table '{table}', field '{field}': foreign keys must be int, not {dtype}")]
    ForeignKeyType {
        table: String,
        field: String,
        dtype: FieldType,
    },

    #[error("Lookup table '{table}': '{field}' is not a foreign key")]
    NotAForeignKey { table: String, field: String },

    #[error("Lookup table '{table}': both foreign keys point at dimension '{dimension}'")]
    LookupSameDimension { table: String, dimension: String },

    #[error("Table '{table}', field '{field}': operator '{operator}' does not apply to {dtype}")]
    InvalidOperator {
        table: String,
        field: String,
        operator: String,
        dtype: FieldType,
    },

    #[error("Table '{table}', field '{field}': invalid validator: {message}")]
    InvalidValidator {
        table: String,
        field: String,
        message: String,
    },

    #[error("View '{view}': unsupported aggregate '{aggregate}' for '{field}' (expected count, avg or sum)")]
    InvalidAggregate {
        view: String,
        field: String,
        aggregate: String,
    },

    #[error("View '{view}' refers to unknown fact '{fact}'")]
    UnknownFact { view: String, fact: String },
}

/// A named table, field, filter or operand cannot be found.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("Unknown table '{0}'")]
    UnknownTable(String),

    #[error("Unknown star '{0}'")]
    UnknownStar(String),

    #[error("Unknown view '{0}'")]
    UnknownView(String),

    #[error("Field '{field}' refers to unknown dimension '{dimension}'")]
    UnknownDimension { field: String, dimension: String },

    #[error("'{table}' has no field '{field}'")]
    UnknownField { table: String, field: String },

    #[error("'{table}' has no filter '{filter}'")]
    UnknownFilter { table: String, filter: String },

    #[error("'{0}' is not a dimension or lookup table")]
    NotCached(String),
}

/// A raw value cannot be coerced to its declared type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cannot convert '{value}' to {field_type}: {reason}")]
pub struct ConversionError {
    pub field_type: FieldType,
    pub value: String,
    pub reason: &'static str,
}

impl ConversionError {
    pub fn new(field_type: FieldType, raw: &RawValue, reason: &'static str) -> Self {
        Self {
            field_type,
            value: raw.to_string(),
            reason,
        }
    }
}

/// A calculated-field formula does not parse.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid formula '{formula}': {message}")]
pub struct FormulaError {
    pub formula: String,
    pub message: String,
}

/// A parsed formula cannot be evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("Unknown operand '{0}'")]
    UnknownOperand(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// What went wrong while composing a star or view.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompositionCause {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Composition failure with the star or view and field that caused it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cannot compose '{entity}'{}: {cause}", .field.as_ref().map(|f| format!(" (field '{f}')")).unwrap_or_default())]
pub struct CompositionError {
    pub entity: String,
    pub field: Option<String>,
    #[source]
    pub cause: CompositionCause,
}

impl CompositionError {
    pub fn new(entity: impl Into<String>, cause: impl Into<CompositionCause>) -> Self {
        Self {
            entity: entity.into(),
            field: None,
            cause: cause.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Failure building an insert, update or delete statement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("Table '{table}' expects {expected} values, got {got}")]
    ArityMismatch {
        table: String,
        expected: usize,
        got: usize,
    },

    #[error("Table '{table}', field '{field}': {source}")]
    Conversion {
        table: String,
        field: String,
        #[source]
        source: ConversionError,
    },

    #[error("Table '{table}', field '{field}': {message}")]
    Invalid {
        table: String,
        field: String,
        message: String,
    },

    #[error("Table '{table}': a primary key value is required")]
    MissingPrimaryKey { table: String },

    #[error("Table '{0}' is not editable")]
    ReadOnly(String),

    #[error("Table '{0}' has no editable fields to update")]
    NothingToUpdate(String),
}

/// Failure reported by the query execution collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    #[error("Query failed: {0}")]
    Failed(String),

    #[error("Expected {expected} columns per row, got {got}")]
    ColumnCount { expected: usize, got: usize },
}

/// Failure refreshing the foreign-key label cache.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CacheError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("Refreshing '{table}': {source}")]
    Conversion {
        table: String,
        #[source]
        source: ConversionError,
    },
}

/// Top-level error: the single boundary type callers report to users.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Formula(#[from] FormulaError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Row(#[from] RowError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Crate-level result.
pub type Result<T> = std::result::Result<T, Error>;
