//! Calculated fields: fact-level numeric columns defined by a formula.

use crate::config::CalculatedFieldConfig;
use crate::error::CompositionCause;
use crate::formula::{self, Formula};
use crate::model::{FieldInfo, Filter, Operator};
use crate::sql::expr::Expr;
use crate::value::{convert, FieldFormat, FieldType, RawValue, Value};

/// A derived column evaluated from other fields of the same star.
#[derive(Debug, Clone)]
pub struct CalculatedField {
    pub display_name: String,
    pub show_on_fact_table: bool,
    pub default_value: Option<Value>,
    pub visible: bool,
    formula: Formula,
    schema: Expr,
}

impl CalculatedField {
    /// Parse the formula and evaluate it into an expression.
    ///
    /// `lookup` resolves operand display names to the expressions of fields
    /// already known to the star.
    pub fn new<F>(config: &CalculatedFieldConfig, lookup: &F) -> Result<Self, CompositionCause>
    where
        F: Fn(&str) -> Option<Expr>,
    {
        let parsed = formula::parse(&config.formula)?;
        let schema = formula::evaluate(&parsed, lookup)?;
        let default_value = match &config.default {
            Some(raw) => convert(FieldType::Float, &RawValue::from(raw))?,
            None => None,
        };
        Ok(Self {
            display_name: config.display_name.clone(),
            show_on_fact_table: config.show_on_fact_table,
            default_value,
            visible: config.visible,
            formula: parsed,
            schema,
        })
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Range filters over the evaluated expression.
    pub fn filters(&self) -> Vec<Filter> {
        if !self.visible {
            return Vec::new();
        }
        [Operator::Gte, Operator::Lte]
            .into_iter()
            .map(|op| Filter::new(&self.display_name, FieldType::Float, op, self.schema.clone()))
            .collect()
    }
}

impl FieldInfo for CalculatedField {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn dtype(&self) -> FieldType {
        FieldType::Float
    }

    fn field_format(&self) -> FieldFormat {
        FieldFormat::Float
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
