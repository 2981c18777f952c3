//! Fuel price and FBO fee lookups.
//!
//! The trip estimator consumes prices through the two traits below; the
//! cache-backed [`PriceBook`] is the production implementation, and any
//! map-backed double works for tests. Lookups take `&mut self` because the
//! backing cache expires entries lazily on read.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aircraft::FuelType;
use crate::cache::TtlCache;
use crate::config::Config;

/// Posted fuel prices at one airport, per gallon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelPrice {
    /// 100LL price, if posted.
    pub price_100ll: Option<f64>,
    /// Jet-A price, if posted.
    pub price_jet_a: Option<f64>,
}

impl FuelPrice {
    /// The posted price for the given fuel type, if any.
    #[must_use]
    pub fn for_fuel(&self, fuel_type: FuelType) -> Option<f64> {
        match fuel_type {
            FuelType::Avgas100Ll => self.price_100ll,
            FuelType::JetA => self.price_jet_a,
        }
    }
}

/// Source of per-airport fuel prices, keyed by ICAO identifier.
pub trait FuelPriceSource {
    /// Posted prices at the airport, or `None` when unknown.
    fn fuel_price(&mut self, icao: &str) -> Option<FuelPrice>;
}

/// Source of per-airport FBO fees, keyed by ICAO identifier.
pub trait FboFeeSource {
    /// The airport's flat FBO fee, or `None` when unknown.
    fn fbo_fee(&mut self, icao: &str) -> Option<f64>;
}

/// Cache-backed price and fee book.
///
/// One `PriceBook` is owned by the caller and injected wherever prices are
/// needed. Stores are keyed by ICAO only, so an out-of-order refresh simply
/// overwrites with whichever response landed last.
#[derive(Debug)]
pub struct PriceBook {
    prices: TtlCache<String, FuelPrice>,
    fees: TtlCache<String, f64>,
}

impl PriceBook {
    /// Create an empty book using the configured TTL and capacity.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let ttl = config.cache_ttl();
        let capacity = config.storage.cache_capacity;
        Self {
            prices: TtlCache::new(ttl, capacity),
            fees: TtlCache::new(ttl, capacity),
        }
    }

    /// Record posted prices for an airport.
    pub fn store_price(&mut self, icao: &str, price: FuelPrice) {
        self.prices.insert(icao.to_uppercase(), price);
    }

    /// Record posted prices with the timestamp they were originally stored
    /// at, honoring the remaining TTL of persisted entries.
    pub fn store_price_at(&mut self, icao: &str, price: FuelPrice, stored_at: DateTime<Utc>) {
        self.prices.insert_at(icao.to_uppercase(), price, stored_at);
    }

    /// Record an FBO fee for an airport.
    pub fn store_fee(&mut self, icao: &str, fee: f64) {
        self.fees.insert(icao.to_uppercase(), fee);
    }

    /// Record an FBO fee with its original store timestamp.
    pub fn store_fee_at(&mut self, icao: &str, fee: f64, stored_at: DateTime<Utc>) {
        self.fees.insert_at(icao.to_uppercase(), fee, stored_at);
    }

    /// Drop expired entries from both caches, returning how many went.
    pub fn purge_expired(&mut self) -> usize {
        self.prices.purge_expired() + self.fees.purge_expired()
    }
}

impl FuelPriceSource for PriceBook {
    fn fuel_price(&mut self, icao: &str) -> Option<FuelPrice> {
        self.prices.get(&icao.to_uppercase()).copied()
    }
}

impl FboFeeSource for PriceBook {
    fn fbo_fee(&mut self, icao: &str) -> Option<f64> {
        self.fees.get(&icao.to_uppercase()).copied()
    }
}

/// Fixed in-memory prices, for tests and offline demo data.
#[derive(Debug, Clone, Default)]
pub struct StaticPrices {
    prices: HashMap<String, FuelPrice>,
    fees: HashMap<String, f64>,
}

impl StaticPrices {
    /// Create an empty source (every lookup misses).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a 100LL price for an airport.
    #[must_use]
    pub fn with_100ll(mut self, icao: &str, price: f64) -> Self {
        self.prices.insert(
            icao.to_uppercase(),
            FuelPrice {
                price_100ll: Some(price),
                price_jet_a: None,
            },
        );
        self
    }

    /// Add an FBO fee for an airport.
    #[must_use]
    pub fn with_fee(mut self, icao: &str, fee: f64) -> Self {
        self.fees.insert(icao.to_uppercase(), fee);
        self
    }
}

impl FuelPriceSource for StaticPrices {
    fn fuel_price(&mut self, icao: &str) -> Option<FuelPrice> {
        self.prices.get(&icao.to_uppercase()).copied()
    }
}

impl FboFeeSource for StaticPrices {
    fn fbo_fee(&mut self, icao: &str) -> Option<f64> {
        self.fees.get(&icao.to_uppercase()).copied()
    }
}
