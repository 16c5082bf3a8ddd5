//! FILENAME: core/styler-engine/src/builtins.rs
//! PURPOSE: The styling rules shipped with the engine.
//! CONTEXT: Each builtin is an ordinary `StylingRule` marked as builtin and
//! carrying a stable qualified name. The registry recognizes them by that
//! name and picks a scoping strategy; the functions here only ever see the
//! operand and the (possibly re-scoped) keyword arguments, exactly like a
//! user callback would.

use crate::definition::{Axis, StyleArg, StyleArgs, StyleMatrix, StylingRule};
use crate::error::StyleError;
use crate::slice::StyleSlice;

pub const BACKGROUND_GRADIENT: &str = "styler::background_gradient";
pub const HIGHLIGHT_VALUE: &str = "styler::highlight_value";
pub const HIGHLIGHT_NULL: &str = "styler::highlight_null";
pub const HIGHLIGHT_BETWEEN: &str = "styler::highlight_between";
pub const SET_PROPERTIES: &str = "styler::set_properties";

const DEFAULT_HIGHLIGHT: &str = "background-color: yellow;";
const DEFAULT_NULL_HIGHLIGHT: &str = "background-color: red;";
const DEFAULT_CMAP_LOW: &str = "#f7fbff";
const DEFAULT_CMAP_HIGH: &str = "#08306b";
const DEFAULT_TEXT_COLOR_THRESHOLD: f64 = 0.408;

/// CSS for a plain background colour.
pub fn color_props(color: &str) -> String {
    format!("background-color: {};", color)
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

/// Colours the background of each cell along a two-colour map.
pub fn background_gradient(axis: Axis) -> StylingRule {
    StylingRule::apply(BACKGROUND_GRADIENT, axis, gradient).as_builtin()
}

/// Colours the text of each cell along a two-colour map.
pub fn text_gradient(axis: Axis) -> StylingRule {
    background_gradient(axis).with_arg("text_only", true)
}

pub fn highlight_max(axis: Axis) -> StylingRule {
    StylingRule::apply(HIGHLIGHT_VALUE, axis, highlight_value)
        .as_builtin()
        .with_arg("op", "max")
        .with_arg("props", DEFAULT_HIGHLIGHT)
}

pub fn highlight_min(axis: Axis) -> StylingRule {
    highlight_max(axis).with_arg("op", "min")
}

pub fn highlight_null() -> StylingRule {
    StylingRule::map(HIGHLIGHT_NULL, |value, args| {
        Ok(value.is_null().then(|| props_arg(args, DEFAULT_NULL_HIGHLIGHT)))
    })
    .as_builtin()
}

/// Highlights cells within `left..right`. Bounds are optional scalars or
/// arrays aligned with the operand; see [`StyleArg`].
pub fn highlight_between(axis: Axis) -> StylingRule {
    StylingRule::apply(HIGHLIGHT_BETWEEN, axis, between)
        .as_builtin()
        .with_arg("inclusive", "both")
        .with_arg("props", DEFAULT_HIGHLIGHT)
}

/// Applies fixed CSS to every cell of the subset.
pub fn set_properties(props: &str) -> StylingRule {
    StylingRule::map(SET_PROPERTIES, |_, args| {
        let props = props_arg(args, "");
        Ok((!props.is_empty()).then_some(props))
    })
    .as_builtin()
    .with_arg("props", props)
}

fn props_arg(args: &StyleArgs, default: &str) -> String {
    args.get("props")
        .and_then(StyleArg::as_str)
        .unwrap_or(default)
        .to_string()
}

fn number_arg(args: &StyleArgs, name: &str, default: f64) -> Result<f64, StyleError> {
    match args.get(name) {
        None | Some(StyleArg::Null) => Ok(default),
        Some(StyleArg::Number(n)) => Ok(*n),
        Some(other) => Err(StyleError::invalid_arg(name, format!("expected a number, got {:?}", other))),
    }
}

// ============================================================================
// GRADIENT
// ============================================================================

/// Numbers the gradient is computed from: `gmap` if bound, else the operand.
/// Non-numeric cells become NaN and stay unstyled.
pub(crate) fn gradient_data(part: &StyleSlice, args: &StyleArgs) -> Result<Vec<Vec<f64>>, StyleError> {
    match args.get("gmap") {
        None | Some(StyleArg::Null) => Ok(part
            .values()
            .iter()
            .map(|row| row.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).collect())
            .collect()),
        Some(arg) => (0..part.n_rows())
            .map(|r| {
                (0..part.n_cols())
                    .map(|c| aligned_number(arg, "gmap", part, r, c).map(|n| n.unwrap_or(f64::NAN)))
                    .collect()
            })
            .collect(),
    }
}

/// Min and max of the finite numbers, if any.
pub(crate) fn extent(data: &[Vec<f64>]) -> Option<(f64, f64)> {
    data.iter()
        .flatten()
        .filter(|x| x.is_finite())
        .fold(None, |acc, &x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}

fn gradient(part: &StyleSlice, args: &StyleArgs) -> Result<StyleMatrix, StyleError> {
    let data = gradient_data(part, args)?;
    let Some((data_min, data_max)) = extent(&data) else {
        return Ok(part.empty_styles());
    };

    let vmin = number_arg(args, "vmin", data_min)?;
    let vmax = number_arg(args, "vmax", data_max)?;
    let low = number_arg(args, "low", 0.0)?;
    let high = number_arg(args, "high", 0.0)?;
    let threshold = number_arg(args, "text_color_threshold", DEFAULT_TEXT_COLOR_THRESHOLD)?;
    let text_only = args.get("text_only").and_then(StyleArg::as_bool).unwrap_or(false);

    let from = parse_hex(args.get("cmap_low").and_then(StyleArg::as_str).unwrap_or(DEFAULT_CMAP_LOW))?;
    let to = parse_hex(args.get("cmap_high").and_then(StyleArg::as_str).unwrap_or(DEFAULT_CMAP_HIGH))?;

    let range = vmax - vmin;
    let lo = vmin - range * low;
    let hi = vmax + range * high;

    Ok(data
        .iter()
        .map(|row| {
            row.iter()
                .map(|&x| {
                    if !x.is_finite() {
                        return None;
                    }
                    let t = if hi > lo { ((x - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.0 };
                    let rgb = interpolate(from, to, t);
                    Some(if text_only {
                        format!("color: {};", to_hex(rgb))
                    } else {
                        let text = if relative_luminance(rgb) < threshold { "#f1f1f1" } else { "#000000" };
                        format!("background-color: {};color: {};", to_hex(rgb), text)
                    })
                })
                .collect()
        })
        .collect())
}

type Rgb = [f64; 3];

fn parse_hex(color: &str) -> Result<Rgb, StyleError> {
    let hex = color.trim_start_matches('#');
    let bad = || StyleError::invalid_arg("cmap", format!("'{}' is not a #rrggbb colour", color));
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(bad());
    }
    let mut rgb = [0.0; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| bad())?;
        *channel = byte as f64 / 255.0;
    }
    Ok(rgb)
}

fn interpolate(from: Rgb, to: Rgb, t: f64) -> Rgb {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
    ]
}

fn to_hex(rgb: Rgb) -> String {
    let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", byte(rgb[0]), byte(rgb[1]), byte(rgb[2]))
}

/// WCAG relative luminance.
fn relative_luminance(rgb: Rgb) -> f64 {
    let linear = |c: f64| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(rgb[0]) + 0.7152 * linear(rgb[1]) + 0.0722 * linear(rgb[2])
}

// ============================================================================
// HIGHLIGHTS
// ============================================================================

/// Highlights cells equal to the extremum selected by `op`.
/// A bound `value` overrides the extremum of the operand; `value = Null`
/// highlights nothing.
fn highlight_value(part: &StyleSlice, args: &StyleArgs) -> Result<StyleMatrix, StyleError> {
    let op = args.get("op").and_then(StyleArg::as_str).unwrap_or("max");
    let target = match args.get("value") {
        Some(StyleArg::Number(n)) => Some(*n),
        Some(StyleArg::Null) => None,
        Some(other) => {
            return Err(StyleError::invalid_arg("value", format!("expected a number, got {:?}", other)))
        }
        None => extremum(part.numbers(), op)?,
    };

    let props = props_arg(args, DEFAULT_HIGHLIGHT);
    Ok(part
        .values()
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| match (v.as_f64(), target) {
                    (Some(x), Some(t)) if x == t => Some(props.clone()),
                    _ => None,
                })
                .collect()
        })
        .collect())
}

pub(crate) fn extremum(numbers: impl Iterator<Item = f64>, op: &str) -> Result<Option<f64>, StyleError> {
    match op {
        "max" => Ok(numbers.fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |a| a.max(x))))),
        "min" => Ok(numbers.fold(None, |acc: Option<f64>, x| Some(acc.map_or(x, |a| a.min(x))))),
        other => Err(StyleError::invalid_arg("op", format!("unknown op '{}'", other))),
    }
}

fn between(part: &StyleSlice, args: &StyleArgs) -> Result<StyleMatrix, StyleError> {
    let inclusive = args.get("inclusive").and_then(StyleArg::as_str).unwrap_or("both");
    let (incl_left, incl_right) = match inclusive {
        "both" => (true, true),
        "neither" => (false, false),
        "left" => (true, false),
        "right" => (false, true),
        other => {
            return Err(StyleError::invalid_arg(
                "inclusive",
                format!("'{}' is not one of both, neither, left, right", other),
            ))
        }
    };
    let props = props_arg(args, DEFAULT_HIGHLIGHT);
    let left = args.get("left");
    let right = args.get("right");

    let mut styles = part.empty_styles();
    for (r, row) in styles.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            let Some(x) = part.value(r, c).as_f64() else {
                continue;
            };
            let above = match left {
                Some(arg) => match aligned_number(arg, "left", part, r, c)? {
                    Some(l) if incl_left => x >= l,
                    Some(l) => x > l,
                    None => true,
                },
                None => true,
            };
            let below = match right {
                Some(arg) => match aligned_number(arg, "right", part, r, c)? {
                    Some(h) if incl_right => x <= h,
                    Some(h) => x < h,
                    None => true,
                },
                None => true,
            };
            if above && below {
                *cell = Some(props.clone());
            }
        }
    }
    Ok(styles)
}

/// The value of a scalar or array-shaped argument at a cell of the operand.
/// Arrays align with the operand's only column (per row) or only row (per column).
fn aligned_number(
    arg: &StyleArg,
    name: &str,
    part: &StyleSlice,
    row: usize,
    col: usize,
) -> Result<Option<f64>, StyleError> {
    match arg {
        StyleArg::Null => Ok(None),
        StyleArg::Number(n) => Ok(Some(*n)),
        StyleArg::Array(values) => {
            if part.n_cols() == 1 && values.len() == part.n_rows() {
                Ok(Some(values[row]))
            } else if part.n_rows() == 1 && values.len() == part.n_cols() {
                Ok(Some(values[col]))
            } else {
                Err(StyleError::invalid_arg(
                    name,
                    format!(
                        "array of length {} does not align with a {}x{} operand",
                        values.len(),
                        part.n_rows(),
                        part.n_cols()
                    ),
                ))
            }
        }
        StyleArg::Matrix(rows) => {
            let shape_ok = rows.len() == part.n_rows() && rows.iter().all(|r| r.len() == part.n_cols());
            if !shape_ok {
                return Err(StyleError::invalid_arg(
                    name,
                    format!("matrix shape does not match a {}x{} operand", part.n_rows(), part.n_cols()),
                ));
            }
            Ok(Some(rows[row][col]))
        }
        other => Err(StyleError::invalid_arg(name, format!("expected a number or array, got {:?}", other))),
    }
}
