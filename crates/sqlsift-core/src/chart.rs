//! Pivot, aggregate and sort tabular query results for charting
//!
//! Input is a header row followed by data rows. Cells are JSON values, so
//! numbers may arrive either as numbers or as numeric strings.

use std::cmp::Ordering;
use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reducer applied to a pivoted column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggType {
    #[default]
    Sum,
    Avg,
    Min,
    Max,
    Count,
    Median,
}

/// What rows are sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortIndex {
    Column(usize),
    /// Sum of the numeric cells of the row, excluding the x axis column
    RowTotal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    pub aggregate: bool,
    pub switch_rows_cols: bool,
    /// Rows with equal values here collapse into one output row
    pub group_by_col: Option<usize>,
    /// Distinct values here become output columns
    pub series_col: Option<usize>,
    pub value_cols: Vec<usize>,
    /// Reducer per output column index; unset columns are summed
    pub agg_type_by_series: HashMap<usize, AggType>,
    pub sort_index: Option<SortIndex>,
    pub sort_asc: bool,
    pub x_axis_idx: usize,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            aggregate: false,
            switch_rows_cols: false,
            group_by_col: None,
            series_col: None,
            value_cols: Vec::new(),
            agg_type_by_series: HashMap::new(),
            sort_index: None,
            sort_asc: true,
            x_axis_idx: 0,
        }
    }
}

/// Aggregate, transpose and sort `data` into a new table
pub fn transform_data(data: &[Vec<Value>], options: &TransformOptions) -> Vec<Vec<Value>> {
    if data.is_empty() {
        return Vec::new();
    }

    let mut table = if options.aggregate {
        aggregate(data, options)
    } else {
        data.to_vec()
    };
    if options.switch_rows_cols {
        table = transpose(&table);
    }
    if let Some(sort_index) = options.sort_index {
        sort_rows(&mut table, sort_index, options.sort_asc, options.x_axis_idx);
    }
    table
}

/// Numeric reading of a cell, accepting numeric strings
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Identity of a cell for grouping
fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric-aware ordering with nulls last
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => value_key(a).cmp(&value_key(b)),
        },
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

fn reduce(values: &[&Value], agg: AggType) -> Value {
    let mut numbers: Vec<f64> = values.iter().filter_map(|v| as_number(v)).collect();
    let result = match agg {
        AggType::Count => return Value::from(values.iter().filter(|v| !v.is_null()).count()),
        _ if numbers.is_empty() => return Value::Null,
        AggType::Sum => numbers.iter().sum(),
        AggType::Avg => numbers.iter().sum::<f64>() / numbers.len() as f64,
        AggType::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
        AggType::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        AggType::Median => {
            numbers.sort_by(f64::total_cmp);
            let mid = numbers.len() / 2;
            if numbers.len() % 2 == 0 {
                (numbers[mid - 1] + numbers[mid]) / 2.0
            } else {
                numbers[mid]
            }
        }
    };
    number_value(result)
}

/// Distinct values of `col` across the data rows, sorted
fn distinct_sorted<'a>(rows: &'a [Vec<Value>], col: usize) -> Vec<&'a Value> {
    let mut distinct: IndexMap<String, &Value> = IndexMap::new();
    for value in rows.iter().filter_map(|row| row.get(col)) {
        distinct.entry(value_key(value)).or_insert(value);
    }
    let mut values: Vec<&Value> = distinct.into_values().collect();
    values.sort_by(|a, b| compare_values(a, b));
    values
}

fn header_name(header: &[Value], col: usize) -> Value {
    header.get(col).cloned().unwrap_or(Value::Null)
}

/// One output column: which value column feeds it, restricted to which series
struct OutputColumn<'a> {
    header: Value,
    value_col: usize,
    series: Option<&'a Value>,
}

fn aggregate(data: &[Vec<Value>], options: &TransformOptions) -> Vec<Vec<Value>> {
    let header = &data[0];
    let rows = &data[1..];

    let columns: Vec<OutputColumn<'_>> = match options.series_col {
        Some(series_col) => {
            let series = distinct_sorted(rows, series_col);
            series
                .into_iter()
                .flat_map(|value| {
                    options.value_cols.iter().map(move |&value_col| {
                        let name = if options.value_cols.len() == 1 {
                            Value::String(value_key(value))
                        } else {
                            let value_name = value_key(&header_name(header, value_col));
                            Value::String(format!("{} {}", value_key(value), value_name))
                        };
                        OutputColumn {
                            header: name,
                            value_col,
                            series: Some(value),
                        }
                    })
                })
                .collect()
        }
        None => options
            .value_cols
            .iter()
            .map(|&value_col| OutputColumn {
                header: header_name(header, value_col),
                value_col,
                series: None,
            })
            .collect(),
    };

    let groups: Vec<(Option<&Value>, Vec<&Vec<Value>>)> = match options.group_by_col {
        Some(group_col) => distinct_sorted(rows, group_col)
            .into_iter()
            .map(|key| {
                let key_str = value_key(key);
                let members = rows
                    .iter()
                    .filter(|row| row.get(group_col).map(value_key).as_ref() == Some(&key_str))
                    .collect();
                (Some(key), members)
            })
            .collect(),
        None => vec![(None, rows.iter().collect())],
    };

    let offset = usize::from(options.group_by_col.is_some());
    let mut out_header = Vec::with_capacity(columns.len() + offset);
    if let Some(group_col) = options.group_by_col {
        out_header.push(header_name(header, group_col));
    }
    out_header.extend(columns.iter().map(|c| c.header.clone()));

    let mut table = vec![out_header];
    for (key, members) in groups {
        let mut row: Vec<Value> = key.into_iter().cloned().collect();
        for (i, column) in columns.iter().enumerate() {
            let series_key = column.series.map(value_key);
            let values: Vec<&Value> = members
                .iter()
                .filter(|member| match (&series_key, options.series_col) {
                    (Some(series_key), Some(series_col)) => {
                        member.get(series_col).map(value_key).as_ref() == Some(series_key)
                    }
                    _ => true,
                })
                .filter_map(|member| member.get(column.value_col))
                .collect();
            let agg = options
                .agg_type_by_series
                .get(&(i + offset))
                .copied()
                .unwrap_or_default();
            row.push(reduce(&values, agg));
        }
        table.push(row);
    }
    table
}

/// Transpose, padding ragged rows with nulls
fn transpose(table: &[Vec<Value>]) -> Vec<Vec<Value>> {
    let width = table.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|col| {
            table
                .iter()
                .map(|row| row.get(col).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect()
}

fn row_total(row: &[Value], x_axis_idx: usize) -> Value {
    let total: f64 = row
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != x_axis_idx)
        .filter_map(|(_, value)| as_number(value))
        .sum();
    number_value(total)
}

/// Stable sort of the data rows; the header stays first
fn sort_rows(table: &mut [Vec<Value>], sort_index: SortIndex, ascending: bool, x_axis_idx: usize) {
    let Some((_, rows)) = table.split_first_mut() else {
        return;
    };

    let sort_key = |row: &[Value]| match sort_index {
        SortIndex::Column(col) => row.get(col).cloned().unwrap_or(Value::Null),
        SortIndex::RowTotal => row_total(row, x_axis_idx),
    };
    rows.sort_by(|a, b| {
        let (a, b) = (sort_key(a), sort_key(b));
        match (a.is_null(), b.is_null()) {
            (false, false) if !ascending => compare_values(&b, &a),
            _ => compare_values(&a, &b),
        }
    });
}
