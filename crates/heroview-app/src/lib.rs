// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod filter;
pub mod ids;
pub mod model;
pub mod resolve;
pub mod sort;
pub mod state;
pub mod units;
pub mod view;

pub use ids::*;
pub use model::*;
pub use resolve::{Comparable, RawValue, resolve_comparable, resolve_raw};
pub use state::*;
pub use view::*;
