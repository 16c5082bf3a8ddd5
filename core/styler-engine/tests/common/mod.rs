//! FILENAME: tests/common/mod.rs
//! Fixtures for styler-engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use styler_engine::{StyleConfig, StylingRule, ViewerSession};
use table_source::{label, DataTable, Index, Value};

/// Wraps a table in a session.
pub fn session(table: DataTable, config: StyleConfig, rules: Vec<StylingRule>) -> ViewerSession {
    ViewerSession::new(Arc::new(table), config, rules)
}

/// Columns `0` and `1` holding `0..3` and `3..6`.
pub fn int_table() -> DataTable {
    DataTable::from_rows(vec![
        vec![0.into(), 3.into()],
        vec![1.into(), 4.into()],
        vec![2.into(), 5.into()],
    ])
    .unwrap()
}

/// Columns `(A, col_0)`, `(A, col_1)`, `(B, col_2)`.
pub fn leveled_columns_table() -> DataTable {
    DataTable::builder()
        .column_names(vec![None, None])
        .typed_column(label!["A", "col_0"], table_source::DType::Int64, ints(&[0, 1, 2]))
        .typed_column(label!["A", "col_1"], table_source::DType::Int64, ints(&[3, 4, 5]))
        .typed_column(label!["B", "col_2"], table_source::DType::Int64, ints(&[6, 7, 8]))
        .build()
        .unwrap()
}

/// Two named index levels (`char` x `color`) over two int columns.
pub fn named_multiindex_table() -> DataTable {
    let index = Index::from_product(
        vec![Some("char".into()), Some("color".into())],
        vec![
            vec!["X".into(), "Y".into()],
            vec!["green".into(), "purple".into()],
        ],
    )
    .unwrap();
    DataTable::builder()
        .column("col_0", ints(&[0, 1, 2, 3]))
        .column("col_1", ints(&[4, 5, 6, 7]))
        .index(index)
        .build()
        .unwrap()
}

/// 6x6 table with unnamed two-level labels on both axes; row `i` holds `i`.
pub fn product_table() -> DataTable {
    let levels = vec![
        vec!["x".into(), "y".into()],
        vec!["a".into(), "b".into(), "c".into()],
    ];
    let index = Index::from_product(vec![None, None], levels.clone()).unwrap();
    let columns = Index::from_product(vec![None, None], levels).unwrap();
    let rows: Vec<Vec<Value>> = (0..6).map(|i| vec![Value::Int(i); 6]).collect();
    DataTable::from_rows(rows)
        .unwrap()
        .with_index(index)
        .unwrap()
        .with_columns(columns)
        .unwrap()
}

/// Mixed table used for styling and chunk-invariance checks.
pub fn sales_table() -> DataTable {
    DataTable::builder()
        .column(
            "region",
            vec!["north".into(), "south".into(), "east".into(), "west".into(), "north".into(), "east".into(), "south".into()],
        )
        .column("units", ints(&[12, 7, 31, 7, 19, 4, 25]))
        .column(
            "price",
            vec![2.5.into(), 3.0.into(), Value::Null, 1.25.into(), 4.0.into(), 2.0.into(), 3.5.into()],
        )
        .column("returns", ints(&[1, 0, 3, 0, 2, 5, 1]))
        .index(Index::from_values(["r0", "r1", "r2", "r3", "r4", "r5", "r6"]))
        .build()
        .unwrap()
}

pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&v| Value::Int(v)).collect()
}
