// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use petrogrid_app::{
    EditableField, FilterCache, FilterQuery, ProductTab, RegionTab, RowId, RowStore,
    product_counts,
};
use petrogrid_tui::{AppRuntime, WindowRow};
use std::ops::Range;

/// In-memory runtime: the row store plus the memoized filter, bridged into
/// the TUI through the `AppRuntime` seam. Everything is synchronous and
/// process-local; nothing survives exit.
pub struct MemoryRuntime {
    store: RowStore,
    cache: FilterCache,
}

impl MemoryRuntime {
    pub fn new(store: RowStore) -> Self {
        Self {
            store,
            cache: FilterCache::new(),
        }
    }
}

impl AppRuntime for MemoryRuntime {
    fn filtered_len(&mut self, query: &FilterQuery) -> Result<usize> {
        Ok(self.cache.len(&self.store, query))
    }

    fn rows_window(&mut self, query: &FilterQuery, range: Range<usize>) -> Result<Vec<WindowRow>> {
        let indices = self.cache.indices(&self.store, query);
        let start = range.start.min(indices.len());
        let end = range.end.min(indices.len());
        Ok(indices[start..end]
            .iter()
            .filter_map(|&index| self.store.row_at(index).cloned())
            .map(|row| WindowRow {
                pending: self.store.is_pending(row.id),
                row,
            })
            .collect())
    }

    fn product_counts(&mut self, region: RegionTab) -> Result<Vec<(ProductTab, usize)>> {
        Ok(product_counts(&self.store, region))
    }

    fn pending_len(&mut self) -> Result<usize> {
        Ok(self.store.pending().len())
    }

    fn update_cell(&mut self, id: RowId, field: EditableField, raw: &str) -> Result<bool> {
        Ok(self.store.update(id, field, raw))
    }

    fn add_row(&mut self, product: ProductTab, region: RegionTab) -> Result<RowId> {
        Ok(self.store.add_pending(product, region))
    }

    fn delete_row(&mut self, id: RowId) -> Result<bool> {
        Ok(self.store.delete_pending(id))
    }

    fn save_rows(&mut self) -> Result<usize> {
        Ok(self.store.commit_pending())
    }

    fn cancel_rows(&mut self) -> Result<usize> {
        Ok(self.store.discard_pending())
    }
}
