//! Tests for the foreign-key label cache.

#[path = "../common/mod.rs"]
mod common;

use common::{row, shop, FakeDatabase};
use constellation::constellation::LOOKUP_SEPARATOR;
use constellation::error::{CacheError, ExecutionError, ResolutionError};
use constellation::RawValue;

fn database() -> FakeDatabase {
    FakeDatabase::new(vec![
        (
            "customers",
            vec![
                row(&[RawValue::Int(1), RawValue::from("Ada Lovelace")]),
                row(&[RawValue::Int(2), RawValue::from("Grace Hopper")]),
            ],
        ),
        (
            "products",
            vec![
                row(&[RawValue::Int(10), RawValue::from("Loom")]),
                row(&[RawValue::Int(11), RawValue::from("Compiler")]),
                row(&[RawValue::Int(12), RawValue::Null]),
            ],
        ),
        (
            "favourites",
            vec![
                row(&[RawValue::Int(1), RawValue::Int(10)]),
                row(&[RawValue::Int(1), RawValue::Int(11)]),
                row(&[RawValue::Int(2), RawValue::Int(12)]),
                row(&[RawValue::Int(2), RawValue::Int(99)]),
            ],
        ),
    ])
}

#[test]
fn test_every_table_starts_dirty() {
    let model = shop();
    let dirty: Vec<&str> = model.dirty().iter().map(String::as_str).collect();
    assert_eq!(dirty, vec!["customers", "favourites", "products"]);
}

#[test]
fn test_dimension_labels() {
    let mut model = shop();
    let mut db = database();
    let labels = model.foreign_keys("customers", &mut db).unwrap();
    assert_eq!(labels.get(&0).map(String::as_str), Some(""));
    assert_eq!(labels.get(&1).map(String::as_str), Some("Ada Lovelace"));
    assert_eq!(labels.get(&2).map(String::as_str), Some("Grace Hopper"));
    assert!(!model.dirty().contains("customers"));
}

#[test]
fn test_label_query() {
    let mut model = shop();
    let mut db = database();
    model.foreign_keys("customers", &mut db).unwrap();
    insta::assert_snapshot!(db.queries[0], @r#"
    SELECT
      "customers"."id",
      "customers"."first_name" || ' ' || "customers"."last_name" AS "label"
    FROM "customers"
    ORDER BY "customers"."id" ASC
    "#);
}

#[test]
fn test_clean_table_is_served_from_cache() {
    let mut model = shop();
    let mut db = database();
    model.foreign_keys("products", &mut db).unwrap();
    model.foreign_keys("products", &mut db).unwrap();
    assert_eq!(db.fetches_of("products"), 1);

    model.refresh("products").unwrap();
    assert!(model.dirty().contains("products"));
    model.foreign_keys("products", &mut db).unwrap();
    assert_eq!(db.fetches_of("products"), 2);
    assert!(!model.dirty().contains("products"));
}

#[test]
fn test_refresh_is_idempotent() {
    let mut model = shop();
    model.refresh("customers").unwrap();
    let before = model.dirty().clone();
    model.refresh("customers").unwrap();
    assert_eq!(model.dirty(), &before);
}

#[test]
fn test_lookup_labels_join_distal_labels() {
    let mut model = shop();
    let mut db = database();
    let labels = model.foreign_keys("favourites", &mut db).unwrap().clone();
    assert_eq!(
        labels.get(&1).map(String::as_str),
        Some(["Loom", "Compiler"].join(LOOKUP_SEPARATOR).as_str())
    );
    // Missing and empty distal labels are skipped.
    assert_eq!(labels.get(&2), None);
    assert_eq!(labels.get(&0).map(String::as_str), Some(""));

    // The distal dimension was refreshed on the way.
    assert!(!model.dirty().contains("products"));
    assert!(!model.dirty().contains("favourites"));
}

#[test]
fn test_refreshing_a_dimension_dirties_its_lookups() {
    let mut model = shop();
    let mut db = database();
    model.foreign_keys("favourites", &mut db).unwrap();
    model.foreign_keys("customers", &mut db).unwrap();
    assert!(model.dirty().is_empty());

    model.refresh("customers").unwrap();
    let dirty: Vec<&str> = model.dirty().iter().map(String::as_str).collect();
    assert_eq!(dirty, vec!["customers", "favourites"]);
}

#[test]
fn test_unknown_table() {
    let mut model = shop();
    let mut db = database();
    assert_eq!(
        model.foreign_keys("orders", &mut db).unwrap_err(),
        CacheError::Resolution(ResolutionError::NotCached("orders".into()))
    );
    assert_eq!(
        model.refresh("nope"),
        Err(ResolutionError::NotCached("nope".into()))
    );
}

#[test]
fn test_failed_fetch_leaves_table_dirty() {
    let mut model = shop();
    let mut db = FakeDatabase::new(Vec::new());
    assert!(matches!(
        model.foreign_keys("customers", &mut db),
        Err(CacheError::Execution(ExecutionError::Failed(_)))
    ));
    assert!(model.dirty().contains("customers"));
}

#[test]
fn test_malformed_rows_are_rejected() {
    let mut model = shop();
    let mut db = FakeDatabase::new(vec![("customers", vec![row(&[RawValue::Int(1)])])]);
    assert_eq!(
        model.foreign_keys("customers", &mut db).unwrap_err(),
        CacheError::Execution(ExecutionError::ColumnCount {
            expected: 2,
            got: 1
        })
    );

    let mut db = FakeDatabase::new(vec![(
        "customers",
        vec![row(&[RawValue::from("one"), RawValue::from("Ada")])],
    )]);
    assert!(matches!(
        model.foreign_keys("customers", &mut db),
        Err(CacheError::Conversion { .. })
    ));
}
