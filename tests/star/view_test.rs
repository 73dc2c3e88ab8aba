//! Tests for composing grouped views.

#[path = "../common/mod.rs"]
mod common;

use common::{shop, sql};
use constellation::error::{ConfigurationError, Error, ResolutionError};
use constellation::star::AggregateKind;
use constellation::value::FieldType;
use constellation::{Constellation, ConstellationConfig};

#[test]
fn test_view_query() {
    let model = shop();
    let query = model.compose_view("sales_by_customer").unwrap();
    insta::assert_snapshot!(sql(&query), @r#"
    SELECT
      "customers"."first_name" || ' ' || "customers"."last_name" AS "Customer",
      SUM("orders"."price" - "orders"."discount") AS "Total",
      COUNT("orders"."quantity") AS "Orders"
    FROM "orders"
    LEFT OUTER JOIN "customers" ON "orders"."customer_id" = "customers"."id"
    LEFT OUTER JOIN "products" ON "orders"."product_id" = "products"."id"
    GROUP BY "customers"."first_name" || ' ' || "customers"."last_name"
    ORDER BY SUM("orders"."price" - "orders"."discount") DESC
    LIMIT 50
    "#);
}

#[test]
fn test_view_columns() {
    let model = shop();
    let view = model.view("sales_by_customer").unwrap();
    assert_eq!(view.display_name, "Sales by customer");
    assert!(!view.editable());
    assert_eq!(view.primary_key_index(), None);

    let columns: Vec<(&str, FieldType)> = view
        .columns()
        .iter()
        .map(|c| (c.display_name(), c.dtype()))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("Customer", FieldType::Str),
            ("Total", FieldType::Float),
            ("Orders", FieldType::Int),
        ]
    );
    let kinds: Vec<AggregateKind> = view.additive_fields().iter().map(|a| a.aggregate).collect();
    assert_eq!(kinds, vec![AggregateKind::Sum, AggregateKind::Count]);
}

#[test]
fn test_view_shares_star_filters() {
    let mut model = shop();
    model
        .star_mut("orders")
        .unwrap()
        .set_filter("Qty >=", 2)
        .unwrap();
    let text = sql(&model.compose_view("sales_by_customer").unwrap());
    assert!(text.contains(r#"WHERE "orders"."quantity" >= 2"#), "{text}");
}

#[test]
fn test_unknown_aggregate_fails_loading() {
    let source = common::SHOP.replace("aggregate = \"count\"", "aggregate = \"median\"");
    let config = ConstellationConfig::from_toml(&source).unwrap();
    assert!(matches!(
        Constellation::from_config(&config),
        Err(ConfigurationError::InvalidAggregate { .. })
    ));
}

#[test]
fn test_view_over_unknown_fact_fails_loading() {
    let source = common::SHOP.replace("fact = \"orders\"", "fact = \"returns\"");
    let config = ConstellationConfig::from_toml(&source).unwrap();
    assert!(matches!(
        Constellation::from_config(&config),
        Err(ConfigurationError::UnknownFact { .. })
    ));
}

#[test]
fn test_unknown_group_field_fails_only_the_view() {
    let source = common::SHOP.replace("group_by = [\"Customer\"]", "group_by = [\"Region\"]");
    let model = Constellation::from_config(&ConstellationConfig::from_toml(&source).unwrap()).unwrap();
    assert!(model.compose_star("orders").is_ok());
    let err = match model.compose_view("sales_by_customer") {
        Err(Error::Composition(err)) => err,
        other => panic!("expected composition error, got {other:?}"),
    };
    assert_eq!(err.entity, "sales_by_customer");
    assert_eq!(err.field.as_deref(), Some("Region"));
}

#[test]
fn test_view_order_resolves_against_view_fields() {
    // "Price" is a star field but not a view column.
    let source = common::SHOP.replace(
        "order_by = [{ field = \"Total\", direction = \"desc\" }]",
        "order_by = [{ field = \"Price\" }]",
    );
    let model = Constellation::from_config(&ConstellationConfig::from_toml(&source).unwrap()).unwrap();
    assert!(model.view("sales_by_customer").is_ok());
    match model.compose_view("sales_by_customer") {
        Err(Error::Composition(err)) => assert_eq!(err.field.as_deref(), Some("Price")),
        other => panic!("expected composition error, got {other:?}"),
    }
}

#[test]
fn test_unknown_view() {
    let model = shop();
    assert!(matches!(
        model.compose_view("nope"),
        Err(Error::Resolution(ResolutionError::UnknownView(_)))
    ));
}
