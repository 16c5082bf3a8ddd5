//! FILENAME: core/table-source/src/sort.rs
//! PURPOSE: Stable multi-key row sorting over a source table.
//! CONTEXT: Sorting never touches the table; it reorders a list of source
//! row positions. Missing values always sort last regardless of direction,
//! ties keep their incoming order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::table::SourceTable;
use crate::value::Value;

/// One sort key: a source column position and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: usize,
    pub ascending: bool,
}

impl SortKey {
    pub fn ascending(column: usize) -> Self {
        SortKey { column, ascending: true }
    }

    pub fn descending(column: usize) -> Self {
        SortKey { column, ascending: false }
    }
}

fn compare_keys(a: &[Value], b: &[Value], keys: &[SortKey]) -> Ordering {
    for ((x, y), key) in a.iter().zip(b.iter()).zip(keys.iter()) {
        let ord = match (x.is_null(), y.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = x.sort_cmp(y);
                if key.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Stable sort of `rows` (source positions) by the given keys.
/// An empty key list leaves the order untouched.
pub fn sort_rows(table: &dyn SourceTable, rows: &mut Vec<usize>, keys: &[SortKey]) {
    if keys.is_empty() || rows.len() < 2 {
        return;
    }

    // key values per row, fetched once
    let mut keyed: Vec<(usize, Vec<Value>)> = rows
        .iter()
        .map(|&r| (r, keys.iter().map(|k| table.value(r, k.column)).collect()))
        .collect();

    keyed.sort_by(|(_, a), (_, b)| compare_keys(a, b, keys));

    rows.clear();
    rows.extend(keyed.into_iter().map(|(r, _)| r));
}
