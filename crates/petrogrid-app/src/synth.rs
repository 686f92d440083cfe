// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::{Date, Duration};

use crate::ids::RowId;
use crate::model::{Product, Region, RowStatus, TerminalRow};

/// First calendar date of the synthetic window; dates cycle through the 365
/// days that follow it.
pub const DATASET_EPOCH: Date = time::macros::date!(2024 - 01 - 01);

const DATE_WINDOW_DAYS: usize = 365;
const TERMINAL_SUFFIXES: usize = 26;

const OPENING_STOCK_BOUND: u64 = 10_000;
const RECEIPTS_BOUND: u64 = 5_000;
const DELIVERIES_BOUND: u64 = 4_000;
const CLOSING_STOCK_BOUND: u64 = 8_000;
const VOLUME_CENTI_BOUND: u64 = 100_000;
const UNIT_PRICE_BOUND: u64 = 15_000;
const TOTAL_VALUE_BOUND: u64 = 15_000_000;

/// Small seeded generator: one LCG step mixed with xorshift. Not
/// cryptographic; exists so datasets can be pinned by seed under test and
/// varied from the clock otherwise.
#[derive(Debug, Clone)]
pub struct SeedRng {
    state: u64,
}

impl SeedRng {
    pub fn new(seed: u64) -> Self {
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

    /// Uniform draw in `0..n` (0 when the range is degenerate).
    pub fn int_n(&mut self, n: u64) -> u64 {
        if n <= 1 {
            return 0;
        }
        self.next_u64() % n
    }
}

/// Builds the startup dataset: ids from 1, deterministic cycling for dates,
/// terminals, products, regions, and status, uniform draws for quantities.
/// `total_value` is an independent draw, not `volume * unit_price`.
pub fn generate_rows(count: usize, rng: &mut SeedRng) -> Vec<TerminalRow> {
    (0..count).map(|index| generate_row(index, rng)).collect()
}

fn generate_row(index: usize, rng: &mut SeedRng) -> TerminalRow {
    let suffix = (b'A' + (index % TERMINAL_SUFFIXES) as u8) as char;

    TerminalRow {
        id: RowId::new(index as i64 + 1),
        date: DATASET_EPOCH + Duration::days((index % DATE_WINDOW_DAYS) as i64),
        terminal: format!("Terminal {suffix}"),
        product: Some(Product::ALL[index % Product::ALL.len()]),
        opening_stock: rng.int_n(OPENING_STOCK_BOUND) as i64,
        receipts: rng.int_n(RECEIPTS_BOUND) as i64,
        deliveries: rng.int_n(DELIVERIES_BOUND) as i64,
        closing_stock: rng.int_n(CLOSING_STOCK_BOUND) as i64,
        region: Some(Region::ALL[index % Region::ALL.len()]),
        customer: format!("Customer {}", index + 1),
        volume: rng.int_n(VOLUME_CENTI_BOUND) as f64 / 100.0,
        unit_price: rng.int_n(UNIT_PRICE_BOUND) as f64,
        total_value: rng.int_n(TOTAL_VALUE_BOUND) as f64,
        status: RowStatus::ALL[index % RowStatus::ALL.len()],
    }
}
