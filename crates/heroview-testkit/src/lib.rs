// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use heroview_app::{Measurement, Record, Stat};

const PREFIXES: [&str; 16] = [
    "Captain", "Doctor", "Night", "Iron", "Silver", "Black", "Star", "Storm", "Shadow", "Thunder",
    "Crimson", "Atomic", "Mister", "Lady", "Phantom", "Cosmic",
];
const SUFFIXES: [&str; 16] = [
    "Hawk", "Wolf", "Blade", "Fist", "Spark", "Knight", "Witch", "Man", "Woman", "Falcon", "Viper",
    "Ranger", "Frost", "Lantern", "Comet", "Shield",
];
const FIRST_NAMES: [&str; 14] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Rowan",
];
const LAST_NAMES: [&str; 14] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett",
];
const RACES: [&str; 8] = [
    "Human", "Mutant", "Android", "Kryptonian", "Asgardian", "Alien", "Cyborg", "-",
];
const GENDERS: [&str; 3] = ["Male", "Female", "-"];
const ALIGNMENTS: [&str; 4] = ["good", "bad", "neutral", "-"];
const PLACES: [&str; 10] = [
    "New York City, New York",
    "Gotham City",
    "Metropolis",
    "Krypton",
    "Asgard",
    "Scarsdale, Arizona",
    "Queens, New York",
    "Atlantis",
    "Wakanda",
    "-",
];

pub const ICON_BASE: &str = "https://cdn.example/images/xs";
pub const PLACEHOLDER_ICON: &str = "https://cdn.example/images/xs/no-portrait.jpg";

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    /// True roughly once in `n` draws.
    fn one_in(&mut self, n: usize) -> bool {
        self.int_n(n) == 0
    }
}

/// Generates plausible character records, including the gaps real datasets
/// have: missing stats, `-` sentinels, unparseable measurements and
/// placeholder portraits.
#[derive(Debug, Clone)]
pub struct HeroFaker {
    rng: DeterministicRng,
}

impl HeroFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn dataset(&mut self, count: usize) -> Vec<Record> {
        (1..=count as i64).map(|id| self.record(id)).collect()
    }

    pub fn record(&mut self, id: i64) -> Record {
        let name = format!("{} {}", self.pick(&PREFIXES), self.pick(&SUFFIXES));
        let mut builder = RecordBuilder::new(id, &name)
            .race(self.pick(&RACES))
            .gender(self.pick(&GENDERS))
            .alignment(self.pick(&ALIGNMENTS))
            .place_of_birth(self.pick(&PLACES));

        if !self.rng.one_in(6) {
            let full_name = format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES));
            builder = builder.full_name(&full_name);
        }

        for stat in STATS {
            if !self.rng.one_in(10) {
                builder = builder.stat(stat, self.rng.int_n(101) as i64);
            }
        }

        builder = builder.height_metric(&self.height());
        builder = builder.weight_metric(&self.weight());

        if self.rng.one_in(5) {
            builder.placeholder_icon().build()
        } else {
            builder.icon(&format!("{ICON_BASE}/{id}.jpg")).build()
        }
    }

    fn height(&mut self) -> String {
        match self.rng.int_n(10) {
            0 => "0 cm".to_owned(),
            1 => format!("{}.{:02} meters", 2 + self.rng.int_n(60), self.rng.int_n(100)),
            2 => "-".to_owned(),
            _ => format!("{} cm", 150 + self.rng.int_n(80)),
        }
    }

    fn weight(&mut self) -> String {
        match self.rng.int_n(12) {
            0 => "0 kg".to_owned(),
            1 => format!("{} tons", 1 + self.rng.int_n(90)),
            2 => "- lb".to_owned(),
            _ => format!("{} kg", 45 + self.rng.int_n(400)),
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

const STATS: [Stat; 6] = [
    Stat::Intelligence,
    Stat::Strength,
    Stat::Speed,
    Stat::Durability,
    Stat::Power,
    Stat::Combat,
];

/// Builds a single record field by field for targeted fixtures.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            record: Record::new(id, name),
        }
    }

    pub fn stat(mut self, stat: Stat, value: i64) -> Self {
        let stats = &mut self.record.powerstats;
        let slot = match stat {
            Stat::Intelligence => &mut stats.intelligence,
            Stat::Strength => &mut stats.strength,
            Stat::Speed => &mut stats.speed,
            Stat::Durability => &mut stats.durability,
            Stat::Power => &mut stats.power,
            Stat::Combat => &mut stats.combat,
        };
        *slot = Some(value);
        self
    }

    pub fn full_name(mut self, value: &str) -> Self {
        self.record.biography.full_name = Some(value.to_owned());
        self
    }

    pub fn place_of_birth(mut self, value: &str) -> Self {
        self.record.biography.place_of_birth = Some(value.to_owned());
        self
    }

    pub fn alignment(mut self, value: &str) -> Self {
        self.record.biography.alignment = Some(value.to_owned());
        self
    }

    pub fn race(mut self, value: &str) -> Self {
        self.record.appearance.race = Some(value.to_owned());
        self
    }

    pub fn gender(mut self, value: &str) -> Self {
        self.record.appearance.gender = Some(value.to_owned());
        self
    }

    pub fn height(mut self, imperial: &str, metric: &str) -> Self {
        self.record.appearance.height = Measurement::new(imperial, metric);
        self
    }

    pub fn height_metric(mut self, metric: &str) -> Self {
        self.record.appearance.height = Measurement {
            imperial: Some("-".to_owned()),
            metric: Some(metric.to_owned()),
        };
        self
    }

    pub fn weight_metric(mut self, metric: &str) -> Self {
        self.record.appearance.weight = Measurement {
            imperial: Some("-".to_owned()),
            metric: Some(metric.to_owned()),
        };
        self
    }

    pub fn icon(mut self, url: &str) -> Self {
        self.record.images.xs = Some(url.to_owned());
        self
    }

    pub fn placeholder_icon(self) -> Self {
        self.icon(PLACEHOLDER_ICON)
    }

    pub fn build(self) -> Record {
        self.record
    }
}

/// Serializes records in the dataset endpoint's wire shape.
pub fn dataset_json(records: &[Record]) -> Result<String> {
    serde_json::to_string(records).context("encode dataset fixture")
}

#[cfg(test)]
mod tests {
    use super::{HeroFaker, RecordBuilder, dataset_json};
    use heroview_app::{Column, Record, Stat, resolve_comparable};

    #[test]
    fn faker_is_deterministic_per_seed() {
        let first = HeroFaker::new(42).dataset(30);
        let second = HeroFaker::new(42).dataset(30);
        let other = HeroFaker::new(7).dataset(30);
        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn faker_ids_are_sequential_and_unique() {
        let records = HeroFaker::new(3).dataset(50);
        let ids = records.iter().map(|record| record.id.get()).collect::<Vec<_>>();
        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn faker_produces_missing_values_for_every_gap_kind() {
        let records = HeroFaker::new(11).dataset(400);
        let missing = |column: Column| {
            records
                .iter()
                .any(|record| resolve_comparable(record, column).is_none())
        };
        assert!(missing(Column::Strength));
        assert!(missing(Column::Height));
        assert!(missing(Column::Weight));
        assert!(missing(Column::Race));
        assert!(missing(Column::FullName));
        assert!(records.iter().any(Record::has_placeholder_icon));
        assert!(records.iter().any(|record| !record.has_placeholder_icon()));
    }

    #[test]
    fn builder_sets_nested_fields() {
        let record = RecordBuilder::new(9, "Batman")
            .stat(Stat::Combat, 100)
            .height("6'2", "188 cm")
            .placeholder_icon()
            .build();
        assert_eq!(record.powerstats.combat, Some(100));
        assert_eq!(record.appearance.height.metric.as_deref(), Some("188 cm"));
        assert!(record.has_placeholder_icon());
    }

    #[test]
    fn dataset_json_decodes_back_to_records() -> anyhow::Result<()> {
        let records = HeroFaker::new(5).dataset(12);
        let decoded: Vec<Record> = serde_json::from_str(&dataset_json(&records)?)?;
        assert_eq!(decoded, records);
        Ok(())
    }
}
