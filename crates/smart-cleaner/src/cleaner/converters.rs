//! Best-fit type conversion.
//!
//! Text columns are probed with an ordered list of rules. Each rule either
//! converts every non-missing value or declines; the first rule that accepts
//! wins. A column that no rule accepts keeps its original type, so a column
//! is never partially converted.

use crate::utils::parse_boolean_token;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

static INTEGER_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("Invalid regex: integer literal"));

static FLOAT_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("Invalid regex: float literal")
});

/// A type-probing rule for text columns, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProbeRule {
    Integer,
    Float,
    Boolean,
    /// Always matches and keeps the column as text.
    Text,
}

impl ProbeRule {
    pub(crate) const ORDER: [ProbeRule; 4] = [
        ProbeRule::Integer,
        ProbeRule::Float,
        ProbeRule::Boolean,
        ProbeRule::Text,
    ];

    fn label(self) -> &'static str {
        match self {
            ProbeRule::Integer => "integer",
            ProbeRule::Float => "float",
            ProbeRule::Boolean => "boolean",
            ProbeRule::Text => "text",
        }
    }

    /// Convert the whole column, or `None` if any non-missing value does not
    /// fit. [`ProbeRule::Text`] returns `None` because it keeps the input.
    pub(crate) fn apply(self, values: &StringChunked) -> Option<Series> {
        let name = values.name().clone();
        match self {
            ProbeRule::Integer => {
                let parsed = parse_all(values, |s| {
                    if INTEGER_LITERAL.is_match(s) {
                        s.trim_start_matches('+').parse::<i64>().ok()
                    } else {
                        None
                    }
                })?;
                Some(Series::new(name, parsed))
            }
            ProbeRule::Float => {
                let parsed = parse_all(values, |s| {
                    if FLOAT_LITERAL.is_match(s) {
                        s.parse::<f64>().ok()
                    } else {
                        None
                    }
                })?;
                Some(Series::new(name, parsed))
            }
            ProbeRule::Boolean => {
                let parsed = parse_all(values, parse_boolean_token)?;
                Some(Series::new(name, parsed))
            }
            ProbeRule::Text => None,
        }
    }
}

/// Parse every value with `parse`, keeping nulls. Fails as a whole on the
/// first value `parse` rejects.
fn parse_all<T>(values: &StringChunked, parse: impl Fn(&str) -> Option<T>) -> Option<Vec<Option<T>>> {
    let mut out = Vec::with_capacity(values.len());
    for value in values.into_iter() {
        match value {
            Some(raw) => out.push(Some(parse(raw.trim())?)),
            None => out.push(None),
        }
    }
    Some(out)
}

/// Result of probing one column.
#[derive(Debug)]
pub(crate) enum Conversion {
    Converted { series: Series, rule: &'static str },
    Unchanged,
}

/// Find the best-fitting type for a column.
pub(crate) fn best_fit(series: &Series) -> PolarsResult<Conversion> {
    if series.null_count() == series.len() {
        return Ok(Conversion::Unchanged);
    }

    match series.dtype() {
        DataType::String => {
            let values = series.str()?;
            for rule in ProbeRule::ORDER {
                if let Some(converted) = rule.apply(values) {
                    return Ok(Conversion::Converted {
                        series: converted,
                        rule: rule.label(),
                    });
                }
            }
            Ok(Conversion::Unchanged)
        }
        DataType::Float32 | DataType::Float64 => narrow_integral_floats(series),
        _ => Ok(Conversion::Unchanged),
    }
}

/// Float columns holding only whole numbers become Int64.
fn narrow_integral_floats(series: &Series) -> PolarsResult<Conversion> {
    let min = i64::MIN as f64;
    let max = i64::MAX as f64;
    let casted = series.cast(&DataType::Float64)?;
    let all_integral = casted
        .f64()?
        .into_iter()
        .flatten()
        .all(|v| v.is_finite() && v.fract() == 0.0 && v >= min && v < max);

    if !all_integral {
        return Ok(Conversion::Unchanged);
    }

    Ok(Conversion::Converted {
        series: casted.strict_cast(&DataType::Int64)?,
        rule: "integer",
    })
}
