// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::IgnoredAny;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;

use crate::ids::HeroId;

pub const NO_PORTRAIT_MARKER: &str = "no-portrait";
pub const SENTINEL: &str = "-";

/// One character entity as delivered by the dataset endpoint.
///
/// Every nested object and field is optional on the wire. Absent, `null` or
/// wrongly typed values decode to `None` or an empty default rather than
/// failing the record; only `id` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: HeroId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_default")]
    pub powerstats: Powerstats,
    #[serde(default, deserialize_with = "lenient_default")]
    pub appearance: Appearance,
    #[serde(default, deserialize_with = "lenient_default")]
    pub biography: Biography,
    #[serde(default, deserialize_with = "lenient_default")]
    pub images: Images,
}

impl Record {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id: HeroId::new(id),
            name: Some(name.to_owned()),
            powerstats: Powerstats::default(),
            appearance: Appearance::default(),
            biography: Biography::default(),
            images: Images::default(),
        }
    }

    pub fn stat(&self, stat: Stat) -> Option<i64> {
        match stat {
            Stat::Intelligence => self.powerstats.intelligence,
            Stat::Strength => self.powerstats.strength,
            Stat::Speed => self.powerstats.speed,
            Stat::Durability => self.powerstats.durability,
            Stat::Power => self.powerstats.power,
            Stat::Combat => self.powerstats.combat,
        }
    }

    pub fn has_placeholder_icon(&self) -> bool {
        self.images
            .xs
            .as_deref()
            .is_none_or(|url| url.contains(NO_PORTRAIT_MARKER))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Powerstats {
    #[serde(default, deserialize_with = "lenient_stat")]
    pub intelligence: Option<i64>,
    #[serde(default, deserialize_with = "lenient_stat")]
    pub strength: Option<i64>,
    #[serde(default, deserialize_with = "lenient_stat")]
    pub speed: Option<i64>,
    #[serde(default, deserialize_with = "lenient_stat")]
    pub durability: Option<i64>,
    #[serde(default, deserialize_with = "lenient_stat")]
    pub power: Option<i64>,
    #[serde(default, deserialize_with = "lenient_stat")]
    pub combat: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub race: Option<String>,
    #[serde(default, deserialize_with = "lenient_default")]
    pub height: Measurement,
    #[serde(default, deserialize_with = "lenient_default")]
    pub weight: Measurement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Biography {
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub place_of_birth: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub alignment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Images {
    #[serde(default, deserialize_with = "lenient_text")]
    pub xs: Option<String>,
}

/// A dual-unit field, transmitted as `[imperial, metric]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    pub imperial: Option<String>,
    pub metric: Option<String>,
}

impl Measurement {
    pub fn new(imperial: &str, metric: &str) -> Self {
        Self {
            imperial: Some(imperial.to_owned()),
            metric: Some(metric.to_owned()),
        }
    }
}

impl Serialize for Measurement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.imperial)?;
        seq.serialize_element(&self.metric)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Measurement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Element {
            Text(String),
            Other(IgnoredAny),
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Pair(Vec<Option<Element>>),
            Other(IgnoredAny),
        }

        let elements = match Shape::deserialize(deserializer)? {
            Shape::Pair(elements) => elements,
            Shape::Other(_) => return Ok(Self::default()),
        };
        let text = |index: usize| match elements.get(index) {
            Some(Some(Element::Text(value))) => Some(value.clone()),
            _ => None,
        };
        Ok(Self {
            imperial: text(0),
            metric: text(1),
        })
    }
}

/// Falls back to `T::default()` for `null` or any shape `T` cannot decode.
fn lenient_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire<T> {
        Value(T),
        Other(IgnoredAny),
    }

    Ok(match Wire::<T>::deserialize(deserializer)? {
        Wire::Value(value) => value,
        Wire::Other(_) => T::default(),
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Wire::deserialize(deserializer)? {
        Wire::Text(value) => Some(value),
        Wire::Other(_) => None,
    })
}

fn lenient_stat<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Integer(i64),
        Float(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Wire>::deserialize(deserializer)? {
        Some(Wire::Integer(value)) => Some(value),
        Some(Wire::Float(value)) if value.fract() == 0.0 => Some(value as i64),
        Some(Wire::Text(value)) => value.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Intelligence,
    Strength,
    Speed,
    Durability,
    Power,
    Combat,
}

/// How a column is located inside a record and which comparison strategy
/// applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Icon,
    TextDirect,
    TextBiography,
    NumericStat,
    TextAppearance,
    DualUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Icon,
    Name,
    FullName,
    Intelligence,
    Strength,
    Speed,
    Durability,
    Power,
    Combat,
    Race,
    Gender,
    Height,
    Weight,
    PlaceOfBirth,
    Alignment,
}

impl Column {
    pub const ALL: [Self; 15] = [
        Self::Icon,
        Self::Name,
        Self::FullName,
        Self::Intelligence,
        Self::Strength,
        Self::Speed,
        Self::Durability,
        Self::Power,
        Self::Combat,
        Self::Race,
        Self::Gender,
        Self::Height,
        Self::Weight,
        Self::PlaceOfBirth,
        Self::Alignment,
    ];

    /// Columns offered by the filter-target selector; icons cannot be searched.
    pub const FILTERABLE: [Self; 14] = [
        Self::Name,
        Self::FullName,
        Self::Intelligence,
        Self::Strength,
        Self::Speed,
        Self::Durability,
        Self::Power,
        Self::Combat,
        Self::Race,
        Self::Gender,
        Self::Height,
        Self::Weight,
        Self::PlaceOfBirth,
        Self::Alignment,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::Name => "name",
            Self::FullName => "fullName",
            Self::Intelligence => "intelligence",
            Self::Strength => "strength",
            Self::Speed => "speed",
            Self::Durability => "durability",
            Self::Power => "power",
            Self::Combat => "combat",
            Self::Race => "race",
            Self::Gender => "gender",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::PlaceOfBirth => "placeOfBirth",
            Self::Alignment => "alignment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.label() == value)
    }

    pub const fn kind(self) -> ColumnKind {
        match self {
            Self::Icon => ColumnKind::Icon,
            Self::Name => ColumnKind::TextDirect,
            Self::FullName | Self::PlaceOfBirth | Self::Alignment => ColumnKind::TextBiography,
            Self::Intelligence
            | Self::Strength
            | Self::Speed
            | Self::Durability
            | Self::Power
            | Self::Combat => ColumnKind::NumericStat,
            Self::Race | Self::Gender => ColumnKind::TextAppearance,
            Self::Height | Self::Weight => ColumnKind::DualUnit,
        }
    }

    pub const fn stat(self) -> Option<Stat> {
        match self {
            Self::Intelligence => Some(Stat::Intelligence),
            Self::Strength => Some(Stat::Strength),
            Self::Speed => Some(Stat::Speed),
            Self::Durability => Some(Stat::Durability),
            Self::Power => Some(Stat::Power),
            Self::Combat => Some(Stat::Combat),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|column| *column == self)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Orients an ascending comparison result for this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}
