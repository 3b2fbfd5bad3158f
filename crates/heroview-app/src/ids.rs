// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HeroId(i64);

impl HeroId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for HeroId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

// Some dataset mirrors publish ids as strings.
impl<'de> Deserialize<'de> for HeroId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Integer(i64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Integer(value) => Ok(Self(value)),
            Wire::Text(value) => value
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid hero id {value:?}"))),
        }
    }
}
