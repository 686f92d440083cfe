// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::model::{ProductTab, RegionTab, TerminalRow};
use crate::store::RowStore;

/// Inclusive calendar-date window; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn contains(&self, date: Date) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// The full set of filter parameters the shell feeds the pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterQuery {
    pub product: ProductTab,
    pub region: RegionTab,
    pub search: String,
    pub dates: DateRange,
}

/// Pure predicate: does `row` satisfy every active filter?
pub fn row_matches(row: &TerminalRow, query: &FilterQuery) -> bool {
    matches_with_needle(row, query, &query.search.to_lowercase())
}

fn matches_with_needle(row: &TerminalRow, query: &FilterQuery, needle: &str) -> bool {
    let product_ok = match query.product {
        ProductTab::All => true,
        ProductTab::Product(product) => row.product == Some(product),
    };
    if !product_ok {
        return false;
    }

    let region_ok = match query.region {
        RegionTab::All => true,
        RegionTab::Region(region) => row.region == Some(region),
    };
    if !region_ok {
        return false;
    }

    if !query.dates.contains(row.date) {
        return false;
    }

    needle.is_empty()
        || row
            .search_haystacks()
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(needle))
}

/// Single pass over committed ∪ pending, preserving input order; returns
/// combined indices (committed first, pending appended).
pub fn filter_indices(store: &RowStore, query: &FilterQuery) -> Vec<usize> {
    let needle = query.search.to_lowercase();
    store
        .rows()
        .enumerate()
        .filter(|(_, row)| matches_with_needle(row, query, &needle))
        .map(|(index, _)| index)
        .collect()
}

/// Per-product-tab record counts for the active region. Search and date
/// filters deliberately do not participate; the tab badges always reflect
/// the region slice alone.
pub fn product_counts(store: &RowStore, region: RegionTab) -> Vec<(ProductTab, usize)> {
    ProductTab::ALL
        .into_iter()
        .map(|tab| {
            let count = store
                .rows()
                .filter(|row| match region {
                    RegionTab::All => true,
                    RegionTab::Region(region) => row.region == Some(region),
                })
                .filter(|row| match tab {
                    ProductTab::All => true,
                    ProductTab::Product(product) => row.product == Some(product),
                })
                .count();
            (tab, count)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct CacheKey {
    revision: u64,
    query: FilterQuery,
}

/// Memo over `filter_indices`, keyed on (store revision, query). Repeating
/// a query against an unchanged store returns the cached index list without
/// re-scanning the collection.
#[derive(Debug, Clone, Default)]
pub struct FilterCache {
    key: Option<CacheKey>,
    indices: Vec<usize>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indices(&mut self, store: &RowStore, query: &FilterQuery) -> &[usize] {
        let key = CacheKey {
            revision: store.revision(),
            query: query.clone(),
        };
        if self.key.as_ref() != Some(&key) {
            self.indices = filter_indices(store, query);
            self.key = Some(key);
        }
        &self.indices
    }

    pub fn len(&mut self, store: &RowStore, query: &FilterQuery) -> usize {
        self.indices(store, query).len()
    }

    pub fn is_empty(&mut self, store: &RowStore, query: &FilterQuery) -> bool {
        self.indices(store, query).is_empty()
    }

    /// True when the memo key already matches; used to observe cache hits.
    pub fn is_fresh(&self, store: &RowStore, query: &FilterQuery) -> bool {
        self.key
            .as_ref()
            .is_some_and(|key| key.revision == store.revision() && key.query == *query)
    }
}
