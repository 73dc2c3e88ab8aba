//! Tests for filters and their operators.

#[path = "../common/mod.rs"]
mod common;

use constellation::config::{FieldConfig, Settings, TableConfig};
use constellation::error::ConfigurationError;
use constellation::model::{Filter, Operator, Table};
use constellation::sql::expr::table_col;
use constellation::sql::Dialect;
use constellation::value::{FieldType, RawValue, Value};

fn predicate(filter: &Filter) -> Option<String> {
    filter.filter().map(|e| e.to_sql(Dialect::DuckDb))
}

fn name_filter(op: Operator) -> Filter {
    Filter::new("Name", FieldType::Str, op, table_col("people", "name"))
}

#[test]
fn test_display_names() {
    assert_eq!(name_filter(Operator::Like).display_name(), "Name");
    assert_eq!(name_filter(Operator::NotLike).display_name(), "Name not like");
    let placed = Filter::new(
        "Placed",
        FieldType::Date,
        Operator::OnOrAfter,
        table_col("orders", "placed"),
    );
    assert_eq!(placed.display_name(), "Placed on or after");
}

#[test]
fn test_like_escapes_wildcards() {
    let mut filter = name_filter(Operator::Like);
    filter.set_value("50%_off").unwrap();
    assert_eq!(
        predicate(&filter).unwrap(),
        r#""people"."name" LIKE '%50\%\_off%' ESCAPE '\'"#
    );
}

#[test]
fn test_starts_and_ends_with() {
    let mut starts = name_filter(Operator::StartsWith);
    starts.set_value("Ad").unwrap();
    assert!(predicate(&starts).unwrap().contains("LIKE 'Ad%'"));

    let mut ends = name_filter(Operator::EndsWith);
    ends.set_value("ce").unwrap();
    assert!(predicate(&ends).unwrap().contains("LIKE '%ce'"));

    let mut not_like = name_filter(Operator::NotLike);
    not_like.set_value("x").unwrap();
    assert!(predicate(&not_like).unwrap().contains("NOT LIKE '%x%'"));
}

#[test]
fn test_mysql_like_keeps_escape_literal_closed() {
    let mut filter = name_filter(Operator::Like);
    filter.set_value("Ada").unwrap();
    let sql = filter.filter().unwrap().to_sql(Dialect::MySql);
    insta::assert_snapshot!(sql, @r"`people`.`name` LIKE '%Ada%' ESCAPE '\\'");
}

#[test]
fn test_mysql_backslash_cannot_close_the_literal() {
    let mut filter = name_filter(Operator::Equals);
    filter.set_value(r"x\' OR 1=1 -- ").unwrap();
    let sql = filter.filter().unwrap().to_sql(Dialect::MySql);
    insta::assert_snapshot!(sql, @r"`people`.`name` = 'x\\'' OR 1=1 -- '");
}

#[test]
fn test_huge_float_value_renders() {
    let mut filter = Filter::new(
        "Price",
        FieldType::Float,
        Operator::Gte,
        table_col("orders", "price"),
    );
    filter.set_value("1e307").unwrap();
    assert_eq!(filter.value(), Some(&Value::Float(1e307)));
    let sql = predicate(&filter).unwrap();
    assert!(sql.starts_with(r#""orders"."price" >= 1"#), "{sql}");
    assert!(!sql.contains("NULL"), "{sql}");
}

#[test]
fn test_date_operators_compare_dates() {
    let mut filter = Filter::new(
        "Placed",
        FieldType::Date,
        Operator::OnOrBefore,
        table_col("orders", "placed"),
    );
    filter.set_value("2024-03-31").unwrap();
    assert_eq!(
        predicate(&filter).unwrap(),
        r#"CAST("orders"."placed" AS DATE) <= DATE '2024-03-31'"#
    );
    assert_eq!(
        filter.filter().unwrap().to_sql(Dialect::Sqlite),
        r#"DATE("orders"."placed") <= '2024-03-31'"#
    );
}

#[test]
fn test_bool_is() {
    let mut filter = Filter::new(
        "Active",
        FieldType::Bool,
        Operator::Is,
        table_col("people", "active"),
    );
    filter.set_value("true").unwrap();
    assert_eq!(
        predicate(&filter).unwrap(),
        r#""people"."active" = true"#
    );
}

#[test]
fn test_empty_value_is_inactive() {
    let mut filter = name_filter(Operator::Like);
    filter.set_value("").unwrap();
    assert!(!filter.is_active());
    assert_eq!(filter.filter(), None);
}

#[test]
fn test_rejected_value_keeps_previous_state() {
    let mut filter = Filter::new(
        "Qty",
        FieldType::Int,
        Operator::Gte,
        table_col("orders", "quantity"),
    );
    filter.set_value("4").unwrap();
    assert!(filter.set_value("several").is_err());
    assert_eq!(filter.raw_value(), &RawValue::from("4"));
    assert_eq!(filter.value(), Some(&Value::Int(4)));
    assert_eq!(
        predicate(&filter).unwrap(),
        r#""orders"."quantity" >= 4"#
    );

    filter.clear();
    assert!(filter.raw_value().is_null());
    assert_eq!(filter.value(), None);
}

#[test]
fn test_default_operators_per_type() {
    assert_eq!(
        Operator::defaults_for(FieldType::Date),
        &[Operator::OnOrAfter, Operator::OnOrBefore]
    );
    assert_eq!(Operator::defaults_for(FieldType::Str), &[Operator::Like]);
    assert_eq!(Operator::defaults_for(FieldType::Bool), &[Operator::Is]);
    assert!(Operator::Gte.applies_to(FieldType::Float));
    assert!(!Operator::Like.applies_to(FieldType::Int));
}

#[test]
fn test_configured_operators_replace_defaults() {
    let mut id = FieldConfig::new("id", FieldType::Int);
    id.primary_key = true;
    let mut name = FieldConfig::new("name", FieldType::Str);
    name.filter_operators = Some(vec![Operator::Equals, Operator::StartsWith]);
    let mut hidden = FieldConfig::new("secret", FieldType::Str);
    hidden.visible = false;

    let table = Table::from_config(
        &TableConfig {
            table_name: "people".into(),
            display_name: None,
            fields: vec![id, name, hidden],
            editable: true,
            show_on_load: true,
            order_by: Vec::new(),
            display_rows: None,
        },
        &Settings::default(),
    )
    .unwrap();
    let names: Vec<String> = table.filters().iter().map(Filter::display_name).collect();
    assert_eq!(names, vec!["name equals", "name starts with"]);
}

#[test]
fn test_operator_must_suit_type() {
    let source = r#"
[[dimensions]]
table_name = "people"
summary = { display_name = "Person", fields = ["name"] }
fields = [
    { name = "id", type = "int", primary_key = true },
    { name = "name", type = "str", filter_operators = [">="] },
]
"#;
    let config = constellation::ConstellationConfig::from_toml(source).unwrap();
    let err = constellation::Constellation::from_config(&config).unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidOperator { ref operator, .. } if operator == ">="));
}

#[test]
fn test_star_filters_come_from_every_source() {
    let model = common::shop();
    let star = model.star("orders").unwrap();
    let names: Vec<String> = star.filters().iter().map(Filter::display_name).collect();
    assert_eq!(
        names,
        vec![
            "Customer",
            "Discount <=",
            "Discount >=",
            "Net <=",
            "Net >=",
            "Placed on or after",
            "Placed on or before",
            "Price <=",
            "Price >=",
            "Product",
            "Qty <=",
            "Qty >=",
        ]
    );
}
