// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;

use crate::model::{Column, ColumnKind, Record, SortDirection};
use crate::resolve::resolve_comparable;

/// Returns `records` ordered by `column`. The sort is stable, and records
/// without a comparable value trail the others in either direction.
pub fn sort<'a>(
    records: &[&'a Record],
    column: Column,
    direction: SortDirection,
) -> Vec<&'a Record> {
    let mut ordered = records.to_vec();
    ordered.sort_by(|left, right| compare(left, right, column, direction));
    ordered
}

pub fn compare(
    left: &Record,
    right: &Record,
    column: Column,
    direction: SortDirection,
) -> Ordering {
    if column.kind() == ColumnKind::Icon {
        return compare_icons(left, right, direction);
    }

    match (
        resolve_comparable(left, column),
        resolve_comparable(right, column),
    ) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => direction.apply(left.cmp_value(&right)),
    }
}

// Real portraits lead regardless of direction; the direction only orders ids
// within each group.
fn compare_icons(left: &Record, right: &Record, direction: SortDirection) -> Ordering {
    let left_placeholder = left.has_placeholder_icon();
    let right_placeholder = right.has_placeholder_icon();
    left_placeholder
        .cmp(&right_placeholder)
        .then_with(|| direction.apply(left.id.cmp(&right.id)))
}

/// Per-column header direction. Every header starts at `Desc`, so its first
/// toggle sorts ascending; toggling one column leaves the others untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortToggles {
    directions: [SortDirection; Column::ALL.len()],
}

impl Default for SortToggles {
    fn default() -> Self {
        Self {
            directions: [SortDirection::Desc; Column::ALL.len()],
        }
    }
}

impl SortToggles {
    pub fn direction(&self, column: Column) -> SortDirection {
        self.directions[column.index()]
    }

    pub fn toggle(&mut self, column: Column) -> SortDirection {
        let slot = &mut self.directions[column.index()];
        *slot = slot.toggled();
        *slot
    }
}
