//! Shared fixtures for integration tests.
//!
//! The model is a small shop: customers and products, an orders fact with a
//! calculated net price, a lookup table of favourite products and one view.

#![allow(dead_code)]

use constellation::config::ConstellationConfig;
use constellation::error::ExecutionError;
use constellation::sql::{Dialect, Query};
use constellation::{Constellation, RawValue, Row};

pub const SHOP: &str = r#"
[settings]
dialect = "duckdb"
display_rows = 200

[[dimensions]]
table_name = "customers"
display_name = "Customers"
summary = { display_name = "Customer", fields = ["first_name", "last_name"] }

[[dimensions.fields]]
name = "id"
type = "int"
primary_key = true

[[dimensions.fields]]
name = "first_name"
type = "str"
display_name = "First name"
validator = { kind = "required" }

[[dimensions.fields]]
name = "last_name"
type = "str"
display_name = "Last name"
validator = { kind = "max_length", max = 20 }

[[dimensions]]
table_name = "products"
summary = { display_name = "Product", fields = ["name"] }

[[dimensions.fields]]
name = "id"
type = "int"
primary_key = true

[[dimensions.fields]]
name = "name"
type = "str"

[[lookup_tables]]
table_name = "favourites"
proximal_fk = "customer_id"
distal_fk = "product_id"
summary = { display_name = "Favourite", fields = ["customer_id", "product_id"], separator = " / " }

[[lookup_tables.fields]]
name = "id"
type = "int"
primary_key = true

[[lookup_tables.fields]]
name = "customer_id"
type = "int"
dimension = "customers"
foreign_key_field = "id"

[[lookup_tables.fields]]
name = "product_id"
type = "int"
dimension = "products"
foreign_key_field = "id"

[[facts]]
table_name = "orders"
display_name = "Orders"
display_rows = 50
order_by = [{ field = "Customer" }, { field = "placed", direction = "desc" }]

[[facts.fields]]
name = "id"
type = "int"
primary_key = true

[[facts.fields]]
name = "customer_id"
type = "int"
dimension = "customers"
foreign_key_field = "id"

[[facts.fields]]
name = "product_id"
type = "int"
dimension = "products"
foreign_key_field = "id"

[[facts.fields]]
name = "price"
format = "currency"
display_name = "Price"
validator = { kind = "range", min = 0.0 }

[[facts.fields]]
name = "discount"
type = "float"
display_name = "Discount"
default = 0.0

[[facts.fields]]
name = "quantity"
type = "int"
display_name = "Qty"
default = 1

[[facts.fields]]
name = "placed"
type = "date"
display_name = "Placed"

[[facts.calculated_fields]]
display_name = "Net"
formula = "[Price] - [Discount]"

[[views]]
name = "sales_by_customer"
display_name = "Sales by customer"
fact = "orders"
group_by = ["Customer"]
aggregates = [
    { display_name = "Total", base_field = "Net", aggregate = "sum" },
    { display_name = "Orders", base_field = "Qty", aggregate = "count" },
]
order_by = [{ field = "Total", direction = "desc" }]
"#;

pub fn shop_config() -> ConstellationConfig {
    ConstellationConfig::from_toml(SHOP).expect("shop model parses")
}

pub fn shop() -> Constellation {
    Constellation::from_config(&shop_config()).expect("shop model builds")
}

pub fn sql(query: &Query) -> String {
    query.to_sql(Dialect::DuckDb)
}

pub fn row(cells: &[RawValue]) -> Row {
    cells.to_vec()
}

/// An executor answering from canned rows keyed by the table in FROM.
///
/// Records every query it receives.
pub struct FakeDatabase {
    pub tables: Vec<(&'static str, Vec<Row>)>,
    pub queries: Vec<String>,
}

impl FakeDatabase {
    pub fn new(tables: Vec<(&'static str, Vec<Row>)>) -> Self {
        Self {
            tables,
            queries: Vec::new(),
        }
    }

    pub fn fetches_of(&self, table: &str) -> usize {
        let from = format!("FROM \"{table}\"");
        self.queries.iter().filter(|q| q.contains(&from)).count()
    }
}

impl constellation::QueryExecutor for FakeDatabase {
    fn fetch(&mut self, query: &Query) -> Result<Vec<Row>, ExecutionError> {
        let text = sql(query);
        self.queries.push(text.clone());
        self.tables
            .iter()
            .find(|(table, _)| text.contains(&format!("FROM \"{table}\"")))
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| ExecutionError::Failed(format!("no such table in: {text}")))
    }
}
