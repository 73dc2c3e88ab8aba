//! Tests for configuration loading and the constellation registry.

#[path = "../common/mod.rs"]
mod common;

use std::io::Write;

use common::{row, shop, shop_config, FakeDatabase};
use constellation::config::{ConfigValue, OrderDirection, ValidatorConfig, DEFAULT_DISPLAY_ROWS};
use constellation::error::{ConfigurationError, Error, ResolutionError};
use constellation::sql::Dialect;
use constellation::value::{FieldFormat, FieldType};
use constellation::{Constellation, ConstellationConfig, RawValue, Value};

#[test]
fn test_shop_config_parses() {
    let config = shop_config();
    assert_eq!(config.settings.dialect, Dialect::DuckDb);
    assert_eq!(config.settings.display_rows, 200);
    assert_eq!(config.dimensions.len(), 2);
    assert_eq!(config.lookup_tables.len(), 1);
    assert_eq!(config.views[0].aggregates.len(), 2);

    let orders = &config.facts[0];
    assert_eq!(orders.table.order_by[1].direction, OrderDirection::Desc);
    assert_eq!(orders.table.order_by[0].direction, OrderDirection::Asc);
    assert_eq!(orders.calculated_fields[0].display_name, "Net");
    assert!(orders.calculated_fields[0].show_on_fact_table);

    let price = &orders.table.fields[3];
    assert_eq!(price.dtype, None);
    assert_eq!(price.format, Some(FieldFormat::Currency));
    assert_eq!(
        price.validator,
        Some(ValidatorConfig::Range {
            min: Some(0.0),
            max: None
        })
    );
    assert_eq!(orders.table.fields[5].default, Some(ConfigValue::Int(1)));
}

#[test]
fn test_empty_config_uses_defaults() {
    let config = ConstellationConfig::from_toml("").unwrap();
    assert_eq!(config.settings.display_rows, DEFAULT_DISPLAY_ROWS);
    let model = Constellation::from_config(&config).unwrap();
    assert_eq!(model.star_names().count(), 0);
    assert!(model.dirty().is_empty());
}

#[test]
fn test_parse_error() {
    assert!(matches!(
        ConstellationConfig::from_toml("[[facts]]\ntable_name = 3"),
        Err(ConfigurationError::Parse(_))
    ));
}

#[test]
fn test_from_file() {
    let path = std::env::temp_dir().join(format!("constellation-shop-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(common::SHOP.as_bytes()).unwrap();
    drop(file);

    let config = ConstellationConfig::from_file(&path).unwrap();
    assert_eq!(config.facts[0].table.table_name, "orders");
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        ConstellationConfig::from_file(&path),
        Err(ConfigurationError::Read { .. })
    ));
}

#[test]
fn test_missing_summary_field() {
    let source = common::SHOP.replace("fields = [\"name\"]", "fields = [\"title\"]");
    let config = ConstellationConfig::from_toml(&source).unwrap();
    let err = Constellation::from_config(&config).unwrap_err();
    assert_eq!(err.to_string(), "Table 'products' references unknown field 'title'");
}

#[test]
fn test_lookup_summary_must_name_lookup_fields() {
    let source = common::SHOP.replace(
        "fields = [\"customer_id\", \"product_id\"]",
        "fields = [\"customer_id\", \"name\"]",
    );
    assert_ne!(source, common::SHOP);
    let config = ConstellationConfig::from_toml(&source).unwrap();
    let err = Constellation::from_config(&config).unwrap_err();
    assert_eq!(err.to_string(), "Table 'favourites' references unknown field 'name'");
}

#[test]
fn test_lookup_table_needs_two_dimensions() {
    let source = common::SHOP.replace(
        "name = \"product_id\"\ntype = \"int\"\ndimension = \"products\"\nforeign_key_field = \"id\"\n\n[[facts]]",
        "name = \"product_id\"\ntype = \"int\"\ndimension = \"customers\"\nforeign_key_field = \"id\"\n\n[[facts]]",
    );
    assert_ne!(source, common::SHOP);
    let config = ConstellationConfig::from_toml(&source).unwrap();
    assert!(matches!(
        Constellation::from_config(&config),
        Err(ConfigurationError::LookupSameDimension { .. })
    ));
}

#[test]
fn test_lookup_keys_must_be_foreign_keys() {
    let source = common::SHOP.replace("distal_fk = \"product_id\"", "distal_fk = \"id\"");
    let config = ConstellationConfig::from_toml(&source).unwrap();
    assert!(matches!(
        Constellation::from_config(&config),
        Err(ConfigurationError::NotAForeignKey { .. })
    ));
}

#[test]
fn test_foreign_key_must_be_int() {
    let source = common::SHOP.replace(
        "name = \"customer_id\"\ntype = \"int\"\ndimension = \"customers\"\nforeign_key_field = \"id\"\n\n[[facts.fields]]",
        "name = \"customer_id\"\ntype = \"str\"\ndimension = \"customers\"\nforeign_key_field = \"id\"\n\n[[facts.fields]]",
    );
    assert_ne!(source, common::SHOP);
    let config = ConstellationConfig::from_toml(&source).unwrap();
    assert!(matches!(
        Constellation::from_config(&config),
        Err(ConfigurationError::ForeignKeyType { .. })
    ));
}

#[test]
fn test_bad_validator_pattern() {
    let source = common::SHOP.replace(
        "validator = { kind = \"required\" }",
        "validator = { kind = \"pattern\", pattern = \"([a-z\" }",
    );
    let config = ConstellationConfig::from_toml(&source).unwrap();
    assert!(matches!(
        Constellation::from_config(&config),
        Err(ConfigurationError::InvalidValidator { .. })
    ));
}

#[test]
fn test_registry_lookups() {
    let model = shop();
    assert_eq!(model.settings().display_rows, 200);
    assert!(model.dimension("customers").is_some());
    assert!(model.dimension("orders").is_none());
    let favourites = model.lookup_table("favourites").unwrap();
    assert_eq!(favourites.summary.display_name, "Favourite");
    assert_eq!(favourites.summary.separator, " / ");
    assert!(model.fact("orders").is_some());
    assert_eq!(model.star_names().collect::<Vec<_>>(), vec!["orders"]);
    assert_eq!(
        model.view_names().collect::<Vec<_>>(),
        vec!["sales_by_customer"]
    );
    assert!(matches!(
        model.star("customers"),
        Err(Error::Resolution(ResolutionError::UnknownStar(_)))
    ));
}

#[test]
fn test_create_statements_in_dependency_order() {
    let model = shop();
    let names: Vec<&str> = model
        .create_statements()
        .iter()
        .map(|statement| statement.name.as_str())
        .collect();
    assert_eq!(names, vec!["customers", "products", "favourites", "orders"]);
}

#[test]
fn test_fetch_view_converts_cells() {
    let model = shop();
    let mut db = FakeDatabase::new(vec![(
        "orders",
        vec![row(&[
            RawValue::from("Ada Lovelace"),
            RawValue::from("1,250.5"),
            RawValue::Int(3),
        ])],
    )]);
    let rows = model.fetch_view("sales_by_customer", &mut db).unwrap();
    assert_eq!(
        rows,
        vec![vec![
            Some(Value::Str("Ada Lovelace".into())),
            Some(Value::Float(1250.5)),
            Some(Value::Int(3)),
        ]]
    );
}

#[test]
fn test_fetch_star_reports_conversion_errors() {
    let model = shop();
    let mut cells = vec![RawValue::Null; 10];
    cells[6] = RawValue::from("yesterday");
    let mut db = FakeDatabase::new(vec![("orders", vec![cells])]);
    let err = model.fetch_star("orders", &mut db).unwrap_err();
    match err {
        Error::Conversion(err) => assert_eq!(err.field_type, FieldType::Date),
        other => panic!("expected conversion error, got {other:?}"),
    }
}
