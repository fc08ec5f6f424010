//! Shared health state for the /health endpoint.
//! Load counts are set once at startup; recompute counters move with every
//! selection event.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;

use crate::state::FactStore;

#[derive(Default)]
pub struct HealthState {
    financial_facts: AtomicU64,
    multiples: AtomicU64,
    key_ratios: AtomicU64,
    valuation_ranges: AtomicU64,
    /// True when the last load coerced at least one monetary cell to null.
    coercion_warning: AtomicBool,
    recomputations: AtomicU64,
    recompute_failures: AtomicU64,
}

#[derive(Debug, Serialize)]
pub struct HealthSnapshot {
    pub financial_facts: u64,
    pub multiples: u64,
    pub key_ratios: u64,
    pub valuation_ranges: u64,
    pub coercion_warning: bool,
    pub recomputations: u64,
    pub recompute_failures: u64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_load(&self, store: &FactStore) {
        self.financial_facts.store(store.financial_facts().len() as u64, Ordering::Relaxed);
        self.multiples.store(store.multiples().len() as u64, Ordering::Relaxed);
        self.key_ratios.store(store.key_ratios().len() as u64, Ordering::Relaxed);
        self.valuation_ranges.store(store.valuation_ranges().len() as u64, Ordering::Relaxed);
        self.coercion_warning
            .store(store.diagnostics().coercion_warning(), Ordering::Relaxed);
    }

    pub fn add_recomputations(&self, n: u64) {
        self.recomputations.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_recompute_failures(&self) {
        self.recompute_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn coercion_warning(&self) -> bool {
        self.coercion_warning.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            financial_facts: self.financial_facts.load(Ordering::Relaxed),
            multiples: self.multiples.load(Ordering::Relaxed),
            key_ratios: self.key_ratios.load(Ordering::Relaxed),
            valuation_ranges: self.valuation_ranges.load(Ordering::Relaxed),
            coercion_warning: self.coercion_warning(),
            recomputations: self.recomputations.load(Ordering::Relaxed),
            recompute_failures: self.recompute_failures.load(Ordering::Relaxed),
        }
    }
}
