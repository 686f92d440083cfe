// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Deterministic fixtures for petrogrid tests. Everything here is pinned:
//! fixed reference date, fixed seeds, hand-filled rows.

use petrogrid_app::{
    Product, ProductTab, Region, RegionTab, RowId, RowStatus, RowStore, SeedRng, TerminalRow,
    generate_rows,
};
use time::Date;
use time::macros::date;

/// The "today" stamped onto pending rows in tests.
pub const REFERENCE_TODAY: Date = date!(2024 - 07 - 01);

/// Fully populated row with quantities derived from the id, so assertions
/// can predict every field.
pub fn sample_row(id: i64, product: Product, region: Region) -> TerminalRow {
    let mut row = TerminalRow::empty(
        RowId::new(id),
        date!(2024 - 01 - 01),
        Some(product),
        Some(region),
    );
    row.terminal = format!("Terminal {}", (b'A' + ((id - 1) % 26) as u8) as char);
    row.customer = format!("Customer {id}");
    row.opening_stock = id * 100;
    row.receipts = id * 50;
    row.deliveries = id * 40;
    row.closing_stock = id * 110;
    row.volume = id as f64 + 0.25;
    row.unit_price = 9_000.0;
    row.total_value = id as f64 * 100_000.0;
    row.status = RowStatus::ALL[(id as usize - 1) % RowStatus::ALL.len()];
    row
}

/// Store over a seeded synthetic dataset.
pub fn seeded_store(count: usize, seed: u64) -> RowStore {
    let mut rng = SeedRng::new(seed);
    RowStore::new(generate_rows(count, &mut rng), REFERENCE_TODAY)
}

/// Store over hand-built rows cycling products and regions.
pub fn small_store(count: i64) -> RowStore {
    let rows = (1..=count)
        .map(|id| {
            sample_row(
                id,
                Product::ALL[(id as usize - 1) % Product::ALL.len()],
                Region::ALL[(id as usize - 1) % Region::ALL.len()],
            )
        })
        .collect();
    RowStore::new(rows, REFERENCE_TODAY)
}

/// Store with `committed` hand-built rows plus `pending` blank rows already
/// added, for exercising the save/cancel lifecycle.
pub fn store_with_pending(committed: i64, pending: usize) -> RowStore {
    let mut store = small_store(committed);
    for _ in 0..pending {
        store.add_pending(ProductTab::All, RegionTab::All);
    }
    store
}
