//! Memoized market valuation
//!
//! Valuations are synthesized on first lookup and cached for the process
//! lifetime, keyed by (make, model, year). Entries are never expired and do
//! not react to vehicle-profile changes; staleness is accepted by design,
//! with an explicit invalidation hook for callers that care.

use chrono::{Datelike, Utc};
use ova_core::model::{MarketData, MarketTrend};
use rand::Rng;
use std::collections::HashMap;

use crate::simulator::gauss;

const BASE_VALUE: f64 = 25_000.0;
const DEPRECIATION_RATE: f64 = 0.08;
const DEPRECIATION_FLOOR: f64 = 0.4;

#[derive(Debug, Default)]
pub struct MarketCache {
    entries: HashMap<(String, String, i32), MarketData>,
}

impl MarketCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached valuation for (make, model, year), synthesizing on first miss.
    /// Repeat lookups for the same key return the first-computed value
    /// verbatim.
    pub fn lookup(&mut self, make: &str, model: &str, year: i32) -> MarketData {
        if let Some(existing) = self.entries.get(&(make.to_string(), model.to_string(), year)) {
            return existing.clone();
        }
        let data = synthesize(year, &mut rand::thread_rng());
        self.entries
            .insert((make.to_string(), model.to_string(), year), data.clone());
        data
    }

    /// Drop a cached valuation. Returns whether an entry existed.
    pub fn invalidate(&mut self, make: &str, model: &str, year: i32) -> bool {
        self.entries
            .remove(&(make.to_string(), model.to_string(), year))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn synthesize(year: i32, rng: &mut impl Rng) -> MarketData {
    let age = (Utc::now().year() - year).max(0) as f64;
    let age_factor = (1.0 - age * DEPRECIATION_RATE).max(DEPRECIATION_FLOOR);
    let market_condition = gauss(rng, 1.0, 0.1);
    let current_value = BASE_VALUE * age_factor * market_condition;

    // Trend probabilities: up 0.3, down 0.3, stable 0.4.
    let roll: f64 = rng.gen();
    let market_trend = if roll < 0.3 {
        MarketTrend::Up
    } else if roll < 0.6 {
        MarketTrend::Down
    } else {
        MarketTrend::Stable
    };

    MarketData {
        current_value,
        market_trend,
        similar_listings: rng.gen_range(10..100),
        price_prediction: current_value * (1.0 + gauss(rng, 0.0, 0.05)),
    }
}
