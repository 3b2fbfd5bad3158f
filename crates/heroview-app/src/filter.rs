// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{Column, ColumnKind, Record};
use crate::resolve::{Comparable, resolve_comparable};

/// Keeps the records matching `query` on `column`, in their original order.
///
/// A blank query, or no column at all, leaves the set unchanged.
pub fn filter<'a>(
    records: &'a [Record],
    column: Option<Column>,
    query: &str,
) -> Vec<&'a Record> {
    match column {
        Some(column) if !query.trim().is_empty() => records
            .iter()
            .filter(|record| matches(record, column, query))
            .collect(),
        _ => records.iter().collect(),
    }
}

/// Applies the match rule of `column`'s kind to a non-blank query.
///
/// - numeric stats match the exact decimal text of the stat;
/// - text columns match case-insensitively anywhere in the value;
/// - dual-unit columns match the normalized metric value numerically;
/// - icons never match.
pub fn matches(record: &Record, column: Column, query: &str) -> bool {
    match column.kind() {
        ColumnKind::Icon => false,
        ColumnKind::NumericStat => match resolve_comparable(record, column) {
            Some(Comparable::Integer(value)) => value.to_string() == query.trim(),
            _ => false,
        },
        ColumnKind::DualUnit => {
            let Ok(wanted) = query.trim().parse::<f64>() else {
                return false;
            };
            match resolve_comparable(record, column) {
                Some(Comparable::Number(value)) => value == wanted,
                _ => false,
            }
        }
        ColumnKind::TextDirect | ColumnKind::TextBiography | ColumnKind::TextAppearance => {
            match resolve_comparable(record, column) {
                Some(Comparable::Text(value)) => value.contains(&query.to_lowercase()),
                _ => false,
            }
        }
    }
}
