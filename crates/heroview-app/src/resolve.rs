// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Maps a logical column onto the nested record field it reads, and onto the
//! normalized scalar used to filter and order by that column.

use std::cmp::Ordering;

use crate::model::{Column, ColumnKind, Measurement, Record, SENTINEL};
use crate::units::{normalize_height, normalize_weight};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue<'a> {
    Text(&'a str),
    Integer(i64),
    Measurement(&'a Measurement),
    Icon { url: &'a str, placeholder: bool },
}

impl RawValue<'_> {
    /// Cell text for presentation. Dual-unit fields show their metric element.
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => (*value).to_owned(),
            Self::Integer(value) => value.to_string(),
            Self::Measurement(measurement) => measurement.metric.clone().unwrap_or_default(),
            Self::Icon { url, .. } => (*url).to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Comparable {
    Integer(i64),
    Number(f64),
    Text(String),
    Icon { placeholder: bool, id: i64 },
}

impl Comparable {
    /// Ascending comparison between scalars resolved from the same column.
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => left.cmp(right),
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (
                Self::Icon {
                    placeholder: left_placeholder,
                    id: left_id,
                },
                Self::Icon {
                    placeholder: right_placeholder,
                    id: right_id,
                },
            ) => left_placeholder
                .cmp(right_placeholder)
                .then(left_id.cmp(right_id)),
            _ => Ordering::Equal,
        }
    }
}

pub fn resolve_raw(record: &Record, column: Column) -> Option<RawValue<'_>> {
    if let Some(stat) = column.stat() {
        return record.stat(stat).map(RawValue::Integer);
    }

    match column {
        Column::Icon => record.images.xs.as_deref().map(|url| RawValue::Icon {
            url,
            placeholder: record.has_placeholder_icon(),
        }),
        Column::Name => text(record.name.as_deref()),
        Column::FullName => text(record.biography.full_name.as_deref()),
        Column::PlaceOfBirth => text(record.biography.place_of_birth.as_deref()),
        Column::Alignment => text(record.biography.alignment.as_deref()),
        Column::Race => text(record.appearance.race.as_deref()),
        Column::Gender => text(record.appearance.gender.as_deref()),
        Column::Height => measurement(&record.appearance.height),
        Column::Weight => measurement(&record.appearance.weight),
        _ => None,
    }
}

pub fn resolve_comparable(record: &Record, column: Column) -> Option<Comparable> {
    match column.kind() {
        ColumnKind::Icon => Some(Comparable::Icon {
            placeholder: record.has_placeholder_icon(),
            id: record.id.get(),
        }),
        ColumnKind::NumericStat => column
            .stat()
            .and_then(|stat| record.stat(stat))
            .map(Comparable::Integer),
        ColumnKind::DualUnit => {
            let normalized = match column {
                Column::Height => normalize_height(record.appearance.height.metric.as_deref()),
                Column::Weight => normalize_weight(record.appearance.weight.metric.as_deref()),
                _ => None,
            };
            normalized.map(Comparable::Number)
        }
        ColumnKind::TextDirect | ColumnKind::TextBiography | ColumnKind::TextAppearance => {
            match resolve_raw(record, column)? {
                RawValue::Text(value) if !is_sentinel(value) => {
                    Some(Comparable::Text(value.to_lowercase()))
                }
                _ => None,
            }
        }
    }
}

/// `-` and blank strings mean "no data".
pub fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == SENTINEL
}

fn text(value: Option<&str>) -> Option<RawValue<'_>> {
    value.map(RawValue::Text)
}

fn measurement(value: &Measurement) -> Option<RawValue<'_>> {
    if value.imperial.is_none() && value.metric.is_none() {
        return None;
    }
    Some(RawValue::Measurement(value))
}

#[cfg(test)]
mod tests {
    use super::{Comparable, RawValue, is_sentinel, resolve_comparable, resolve_raw};
    use crate::model::{Column, Measurement, Record};

    fn sample() -> Record {
        let mut record = Record::new(1, "A-Bomb");
        record.powerstats.strength = Some(100);
        record.appearance.race = Some("Human".to_owned());
        record.appearance.gender = Some("-".to_owned());
        record.appearance.height = Measurement::new("6'8", "203 cm");
        record.appearance.weight = Measurement::new("980 lb", "441 kg");
        record.biography.full_name = Some("Richard Milhouse Jones".to_owned());
        record.biography.place_of_birth = Some(String::new());
        record.images.xs = Some("https://cdn.example/xs/1-a-bomb.jpg".to_owned());
        record
    }

    #[test]
    fn raw_values_come_from_nested_locations() {
        let record = sample();
        assert_eq!(
            resolve_raw(&record, Column::Name),
            Some(RawValue::Text("A-Bomb"))
        );
        assert_eq!(
            resolve_raw(&record, Column::FullName),
            Some(RawValue::Text("Richard Milhouse Jones"))
        );
        assert_eq!(
            resolve_raw(&record, Column::Strength),
            Some(RawValue::Integer(100))
        );
        assert_eq!(resolve_raw(&record, Column::Speed), None);
        assert_eq!(resolve_raw(&record, Column::Alignment), None);
        assert_eq!(resolve_raw(&Record::new(2, "Abe"), Column::Weight), None);
        assert_eq!(
            resolve_raw(&record, Column::Height).map(|value| value.display()),
            Some("203 cm".to_owned())
        );
        assert_eq!(
            resolve_raw(&record, Column::Icon),
            Some(RawValue::Icon {
                url: "https://cdn.example/xs/1-a-bomb.jpg",
                placeholder: false,
            })
        );
    }

    #[test]
    fn comparable_text_is_lowercased_and_sentinels_are_absent() {
        let record = sample();
        assert_eq!(
            resolve_comparable(&record, Column::Race),
            Some(Comparable::Text("human".to_owned()))
        );
        assert_eq!(resolve_comparable(&record, Column::Gender), None);
        assert_eq!(resolve_comparable(&record, Column::PlaceOfBirth), None);
        assert_eq!(resolve_comparable(&record, Column::Alignment), None);
    }

    #[test]
    fn comparable_measurements_are_normalized() {
        let mut record = sample();
        assert_eq!(
            resolve_comparable(&record, Column::Height),
            Some(Comparable::Number(203.0))
        );
        assert_eq!(
            resolve_comparable(&record, Column::Weight),
            Some(Comparable::Number(441.0))
        );

        record.appearance.weight = Measurement::new("-", "- kg");
        assert_eq!(resolve_comparable(&record, Column::Weight), None);
    }

    #[test]
    fn comparable_icon_carries_placeholder_and_id() {
        let mut record = sample();
        assert_eq!(
            resolve_comparable(&record, Column::Icon),
            Some(Comparable::Icon {
                placeholder: false,
                id: 1,
            })
        );

        record.images.xs = Some("https://cdn.example/xs/no-portrait.jpg".to_owned());
        assert_eq!(
            resolve_comparable(&record, Column::Icon),
            Some(Comparable::Icon {
                placeholder: true,
                id: 1,
            })
        );
    }

    #[test]
    fn sentinel_detection_ignores_surrounding_space() {
        assert!(is_sentinel("-"));
        assert!(is_sentinel(" - "));
        assert!(is_sentinel(""));
        assert!(!is_sentinel("good"));
    }
}
