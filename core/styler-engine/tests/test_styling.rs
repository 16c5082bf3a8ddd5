//! FILENAME: tests/test_styling.rs
//! Styling rules rendered through the chunked pipeline. Every case renders
//! in 1x1 chunks, where a rule without parent context would only ever see a
//! single cell.

mod common;

use common::{int_table, ints, sales_table, session};
use styler_engine::builtins::{
    background_gradient, highlight_between, highlight_max, highlight_min, highlight_null, set_properties,
    text_gradient,
};
use styler_engine::{Axis, Selector, StyleConfig, StyleError, StyleMatrix, StylingRule, Subset, TableFrame};
use table_source::{label, DataTable};

fn styles(frame: &TableFrame) -> Vec<Vec<Option<Vec<(String, String)>>>> {
    frame
        .cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.style.as_ref().map(|s| s.clone().into_iter().collect()))
                .collect()
        })
        .collect()
}

fn marked(frame: &TableFrame) -> Vec<Vec<bool>> {
    frame
        .cells
        .iter()
        .map(|row| row.iter().map(|cell| cell.style.is_some()).collect())
        .collect()
}

fn style_of(frame: &TableFrame, row: usize, col: usize, prop: &str) -> Option<String> {
    frame.cells[row][col].style.as_ref().and_then(|s| s.get(prop).cloned())
}

// ============================================================================
// GRADIENTS
// ============================================================================

#[test]
fn test_background_gradient_spans_the_whole_column() {
    let t = DataTable::builder().column("a", ints(&[0, 5, 10])).build().unwrap();
    let s = session(t, StyleConfig::new(), vec![background_gradient(Axis::Rows)]);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();

    assert_eq!(style_of(&actual, 0, 0, "background-color").as_deref(), Some("#f7fbff"));
    assert_eq!(style_of(&actual, 0, 0, "color").as_deref(), Some("#000000"));
    assert_eq!(style_of(&actual, 2, 0, "background-color").as_deref(), Some("#08306b"));
    assert_eq!(style_of(&actual, 2, 0, "color").as_deref(), Some("#f1f1f1"));
    assert_eq!(actual, s.generate(None).unwrap());
}

#[test]
fn test_bound_gradient_limits_win_over_the_parent_extent() {
    let t = DataTable::builder().column("a", ints(&[0, 5, 10])).build().unwrap();
    let rule = background_gradient(Axis::Rows).with_arg("vmin", 5.0).with_arg("vmax", 20.0);
    let s = session(t, StyleConfig::new(), vec![rule]);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();

    // 0 and 5 both sit at or below vmin
    assert_eq!(style_of(&actual, 0, 0, "background-color").as_deref(), Some("#f7fbff"));
    assert_eq!(style_of(&actual, 1, 0, "background-color").as_deref(), Some("#f7fbff"));
    assert_ne!(style_of(&actual, 2, 0, "background-color").as_deref(), Some("#08306b"));
}

#[test]
fn test_text_gradient_only_sets_the_text_colour() {
    let s = session(int_table(), StyleConfig::new(), vec![text_gradient(Axis::Both)]);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();

    assert_eq!(style_of(&actual, 0, 0, "color").as_deref(), Some("#f7fbff"));
    assert_eq!(style_of(&actual, 2, 1, "color").as_deref(), Some("#08306b"));
    assert!(actual
        .cells
        .iter()
        .flatten()
        .all(|c| c.style.as_ref().map_or(false, |s| !s.contains_key("background-color"))));
}

#[test]
fn test_gradient_skips_missing_values() {
    let rule = background_gradient(Axis::Rows).with_subset(Subset::columns(Selector::Labels(vec![label!["price"]])));
    let s = session(sales_table(), StyleConfig::new(), vec![rule]);
    let actual = s.generate_by_combining_chunks(2, 2).unwrap();

    assert_eq!(actual.cells[2][2].value, "nan");
    assert_eq!(actual.cells[2][2].style, None);
    // 1.25 is the smallest price, 4.0 the largest
    assert_eq!(style_of(&actual, 3, 2, "background-color").as_deref(), Some("#f7fbff"));
    assert_eq!(style_of(&actual, 4, 2, "background-color").as_deref(), Some("#08306b"));
}

// ============================================================================
// HIGHLIGHTS
// ============================================================================

#[test]
fn test_highlight_min_per_row() {
    let s = session(int_table(), StyleConfig::new(), vec![highlight_min(Axis::Cols)]);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();
    assert_eq!(marked(&actual), vec![vec![true, false], vec![true, false], vec![true, false]]);
}

#[test]
fn test_highlight_max_over_the_whole_table() {
    let s = session(int_table(), StyleConfig::new(), vec![highlight_max(Axis::Both)]);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();
    assert_eq!(marked(&actual), vec![vec![false, false], vec![false, false], vec![false, true]]);
}

#[test]
fn test_highlight_max_sees_hidden_rows_of_its_subset() {
    let config = StyleConfig::new().hide_rows([2]);
    let s = session(int_table(), config, vec![highlight_max(Axis::Rows)]);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();
    assert_eq!(marked(&actual), vec![vec![false, false], vec![false, false]]);
}

#[test]
fn test_highlight_between_with_array_bounds() {
    let t = DataTable::builder()
        .column("a", ints(&[1, 5, 9]))
        .column("b", ints(&[2, 4, 6]))
        .build()
        .unwrap();
    let rule = highlight_between(Axis::Rows)
        .with_arg("left", vec![2.0, 3.0, 4.0])
        .with_arg("right", 8.0);
    let s = session(t, StyleConfig::new(), vec![rule]);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();

    assert_eq!(marked(&actual), vec![vec![false, true], vec![true, true], vec![false, true]]);
    assert_eq!(actual, s.generate(None).unwrap());
}

#[test]
fn test_highlight_between_with_matrix_bounds() {
    let rule = highlight_between(Axis::Both)
        .with_arg("left", vec![vec![0.0, 9.0], vec![9.0, 0.0], vec![0.0, 0.0]])
        .with_arg("inclusive", "neither");
    let s = session(int_table(), StyleConfig::new(), vec![rule]);
    let actual = s.generate_by_combining_chunks(2, 1).unwrap();
    assert_eq!(marked(&actual), vec![vec![false, false], vec![false, true], vec![true, true]]);
}

#[test]
fn test_highlight_null_marks_missing_cells() {
    let s = session(sales_table(), StyleConfig::new(), vec![highlight_null()]);
    let actual = s.generate_by_combining_chunks(3, 3).unwrap();

    let expected: Vec<(usize, usize)> = vec![(2, 2)];
    let found: Vec<(usize, usize)> = marked(&actual)
        .iter()
        .enumerate()
        .flat_map(|(r, row)| row.iter().enumerate().filter(|(_, m)| **m).map(move |(c, _)| (r, c)))
        .collect();
    assert_eq!(found, expected);
    assert_eq!(style_of(&actual, 2, 2, "background-color").as_deref(), Some("red"));
}

#[test]
fn test_set_properties_on_a_row_subset() {
    let rule = set_properties("color: blue; font-weight: bold;")
        .with_subset(Subset::new(Selector::Labels(vec![label!["r1"]]), Selector::Positions(vec![0, 1])));
    let s = session(sales_table(), StyleConfig::new(), vec![rule]);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();

    let styled = styles(&actual);
    let expected = Some(vec![
        ("color".to_string(), "blue".to_string()),
        ("font-weight".to_string(), "bold".to_string()),
    ]);
    assert_eq!(styled[1][0], expected);
    assert_eq!(styled[1][1], expected);
    assert_eq!(styled[1][2], None);
    assert_eq!(styled[0][0], None);
}

#[test]
fn test_later_rules_override_earlier_declarations() {
    let rules = vec![set_properties("color: blue;"), highlight_max(Axis::Rows).with_arg("props", "color: green;")];
    let s = session(int_table(), StyleConfig::new(), rules);
    let actual = s.generate_by_combining_chunks(2, 2).unwrap();

    assert_eq!(style_of(&actual, 0, 0, "color").as_deref(), Some("blue"));
    assert_eq!(style_of(&actual, 2, 0, "color").as_deref(), Some("green"));
}

// ============================================================================
// CUSTOM RULES
// ============================================================================

/// Marks operand cells above the mean of the parent line.
fn above_parent_mean() -> StylingRule {
    StylingRule::apply_with_parent("app::above_mean", Axis::Rows, |part, parent, _| {
        let numbers: Vec<f64> = parent.numbers().collect();
        let mean = numbers.iter().sum::<f64>() / numbers.len().max(1) as f64;
        let mut out: StyleMatrix = part.empty_styles();
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                if part.value(r, c).as_f64().map_or(false, |x| x > mean) {
                    *cell = Some("font-weight: bold;".to_string());
                }
            }
        }
        Ok(out)
    })
}

#[test]
fn test_custom_rule_with_parent_is_chunk_invariant() {
    let s = session(int_table(), StyleConfig::new(), vec![above_parent_mean()]);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();

    assert_eq!(marked(&actual), vec![vec![false, false], vec![false, false], vec![true, true]]);
    assert_eq!(actual, s.generate(None).unwrap());
}

#[test]
fn test_failing_rule_does_not_block_other_rules() {
    let boom = StylingRule::apply("app::boom", Axis::Rows, |_, _| Err(StyleError::failed("boom")));
    let s = session(int_table(), StyleConfig::new(), vec![boom, highlight_max(Axis::Rows)]);
    let actual = s.generate_by_combining_chunks(2, 2).unwrap();
    assert_eq!(marked(&actual), vec![vec![false, false], vec![false, false], vec![true, true]]);
}

#[test]
fn test_array_bounds_on_repeated_row_labels_are_dropped() {
    let t = DataTable::builder()
        .column("a", ints(&[1, 5, 5]))
        .index(table_source::Index::from_values(["x", "y", "y"]))
        .build()
        .unwrap();
    let rules = vec![
        highlight_between(Axis::Rows).with_arg("left", vec![0.0, 0.0, 9.0]),
        set_properties("color: blue;"),
    ];
    let s = session(t, StyleConfig::new(), rules);
    let actual = s.generate_by_combining_chunks(1, 1).unwrap();

    assert!(actual
        .cells
        .iter()
        .flatten()
        .all(|c| c.style.as_ref().map_or(false, |s| s.len() == 1 && s.contains_key("color"))));
    assert_eq!(actual, s.generate(None).unwrap());
}

#[test]
fn test_wrongly_shaped_result_is_dropped() {
    let bad = StylingRule::apply("app::bad_shape", Axis::Both, |_, _| Ok(vec![vec![None]; 7]));
    let s = session(int_table(), StyleConfig::new(), vec![bad]);
    let actual = s.generate(None).unwrap();
    assert!(actual.cells.iter().flatten().all(|c| c.style.is_none()));
}
