// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use time::macros::format_description;

use crate::ids::{RowId, RowIdAllocator};
use crate::model::{EditableField, ProductTab, Region, RegionTab, RowStatus, TerminalRow};

/// Committed rows plus the pending-new batch, with typed field updates.
///
/// Pending rows are a separate lifecycle stage: added in place, merged into
/// the committed collection only by `commit_pending`, dropped wholesale by
/// `discard_pending`. Committed rows are never deleted. Every mutation that
/// touches a row bumps `revision`, the memoization key for derived views.
#[derive(Debug, Clone, PartialEq)]
pub struct RowStore {
    committed: Vec<TerminalRow>,
    pending: Vec<TerminalRow>,
    ids: RowIdAllocator,
    today: Date,
    revision: u64,
}

impl RowStore {
    /// `today` is the date stamped onto new pending rows; injected so tests
    /// stay deterministic.
    pub fn new(committed: Vec<TerminalRow>, today: Date) -> Self {
        let ids = RowIdAllocator::above(committed.iter().map(|row| row.id));
        Self {
            committed,
            pending: Vec::new(),
            ids,
            today,
            revision: 0,
        }
    }

    pub fn committed(&self) -> &[TerminalRow] {
        &self.committed
    }

    pub fn pending(&self) -> &[TerminalRow] {
        &self.pending
    }

    /// Committed + pending row count.
    pub fn len(&self) -> usize {
        self.committed.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty() && self.pending.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Rows in display order: committed first, pending appended.
    pub fn rows(&self) -> impl Iterator<Item = &TerminalRow> {
        self.committed.iter().chain(self.pending.iter())
    }

    /// Row by combined index (committed first, then pending).
    pub fn row_at(&self, index: usize) -> Option<&TerminalRow> {
        if index < self.committed.len() {
            self.committed.get(index)
        } else {
            self.pending.get(index - self.committed.len())
        }
    }

    pub fn is_pending(&self, id: RowId) -> bool {
        self.pending.iter().any(|row| row.id == id)
    }

    fn row_mut(&mut self, id: RowId) -> Option<&mut TerminalRow> {
        if let Some(row) = self.committed.iter_mut().find(|row| row.id == id) {
            return Some(row);
        }
        self.pending.iter_mut().find(|row| row.id == id)
    }

    /// Applies a field edit to whichever collection holds the row.
    ///
    /// Numeric junk coerces to zero; unparsable dates and unknown
    /// region/status names leave the field as it was. A stale id is a
    /// silent no-op. Returns whether a row was located.
    pub fn update(&mut self, id: RowId, field: EditableField, raw: &str) -> bool {
        let Some(row) = self.row_mut(id) else {
            return false;
        };

        match field {
            EditableField::Date => {
                if let Some(date) = parse_date(raw) {
                    row.date = date;
                }
            }
            EditableField::Terminal => row.terminal = raw.to_owned(),
            EditableField::Customer => row.customer = raw.to_owned(),
            EditableField::OpeningStock => row.opening_stock = parse_count(raw),
            EditableField::Receipts => row.receipts = parse_count(raw),
            EditableField::Deliveries => row.deliveries = parse_count(raw),
            EditableField::ClosingStock => row.closing_stock = parse_count(raw),
            EditableField::Volume => row.volume = parse_decimal(raw),
            EditableField::UnitPrice => row.unit_price = parse_decimal(raw),
            EditableField::TotalValue => row.total_value = parse_decimal(raw),
            EditableField::Region => {
                if let Some(region) = Region::parse_name(raw) {
                    row.region = Some(region);
                }
            }
            EditableField::Status => {
                if let Some(status) = RowStatus::parse_label(raw) {
                    row.status = status;
                }
            }
        }

        self.revision += 1;
        true
    }

    /// Appends a blank pending row pre-filled from the active tabs ("all"
    /// leaves product/region unset) and returns its fresh id.
    pub fn add_pending(&mut self, product: ProductTab, region: RegionTab) -> RowId {
        let id = self.ids.allocate();
        let row = TerminalRow::empty(id, self.today, product.product(), region.region());
        self.pending.push(row);
        self.revision += 1;
        id
    }

    /// Removes a pending row by id; stale ids are tolerated silently.
    pub fn delete_pending(&mut self, id: RowId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|row| row.id != id);
        if self.pending.len() == before {
            return false;
        }
        self.revision += 1;
        true
    }

    /// Merges the whole pending batch into the committed collection, in
    /// order, and clears it. Returns the number of rows merged. Rows are
    /// not validated before the merge.
    pub fn commit_pending(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let merged = self.pending.len();
        self.committed.append(&mut self.pending);
        self.revision += 1;
        merged
    }

    /// Drops the pending batch without merging. Returns the number dropped.
    pub fn discard_pending(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let dropped = self.pending.len();
        self.pending.clear();
        self.revision += 1;
        dropped
    }
}

fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), &format_description!("[year]-[month]-[day]")).ok()
}

fn parse_count(raw: &str) -> i64 {
    raw.trim().parse::<f64>().map_or(0, |value| value as i64)
}

fn parse_decimal(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::RowStore;
    use crate::ids::RowId;
    use crate::model::{
        EditableField, Product, ProductTab, Region, RegionTab, RowStatus, TerminalRow,
    };
    use time::macros::date;

    const TODAY: time::Date = date!(2024 - 07 - 01);

    fn seeded_store(count: i64) -> RowStore {
        let committed = (1..=count)
            .map(|id| {
                let mut row = TerminalRow::empty(
                    RowId::new(id),
                    date!(2024 - 01 - 01),
                    Some(Product::ALL[(id as usize - 1) % Product::ALL.len()]),
                    Some(Region::ALL[(id as usize - 1) % Region::ALL.len()]),
                );
                row.terminal = format!("Terminal {id}");
                row.opening_stock = id * 100;
                row
            })
            .collect();
        RowStore::new(committed, TODAY)
    }

    #[test]
    fn numeric_junk_coerces_to_zero() {
        let mut store = seeded_store(3);
        assert!(store.update(RowId::new(2), EditableField::OpeningStock, "abc"));
        assert_eq!(store.committed()[1].opening_stock, 0);
    }

    #[test]
    fn count_edit_truncates_float_input() {
        let mut store = seeded_store(1);
        store.update(RowId::new(1), EditableField::Receipts, "12.7");
        assert_eq!(store.committed()[0].receipts, 12);
    }

    #[test]
    fn decimal_edit_keeps_fraction_and_coerces_junk() {
        let mut store = seeded_store(1);
        store.update(RowId::new(1), EditableField::Volume, "123.45");
        assert_eq!(store.committed()[0].volume, 123.45);

        store.update(RowId::new(1), EditableField::Volume, "n/a");
        assert_eq!(store.committed()[0].volume, 0.0);
    }

    #[test]
    fn text_edit_is_stored_verbatim() {
        let mut store = seeded_store(1);
        store.update(RowId::new(1), EditableField::Customer, "  PT Sinar Mas ");
        assert_eq!(store.committed()[0].customer, "  PT Sinar Mas ");
    }

    #[test]
    fn date_edit_parses_iso_and_ignores_junk() {
        let mut store = seeded_store(1);
        store.update(RowId::new(1), EditableField::Date, "2024-09-30");
        assert_eq!(store.committed()[0].date, date!(2024 - 09 - 30));

        store.update(RowId::new(1), EditableField::Date, "not a date");
        assert_eq!(store.committed()[0].date, date!(2024 - 09 - 30));
    }

    #[test]
    fn region_and_status_edits_parse_display_names() {
        let mut store = seeded_store(1);
        let id = store.add_pending(ProductTab::All, RegionTab::All);

        store.update(id, EditableField::Region, "surabaya");
        store.update(id, EditableField::Status, "Completed");
        assert_eq!(store.pending()[0].region, Some(Region::Surabaya));
        assert_eq!(store.pending()[0].status, RowStatus::Completed);

        store.update(id, EditableField::Region, "atlantis");
        assert_eq!(store.pending()[0].region, Some(Region::Surabaya));
    }

    #[test]
    fn update_with_stale_id_is_a_silent_no_op() {
        let mut store = seeded_store(2);
        let revision = store.revision();
        assert!(!store.update(RowId::new(99), EditableField::Terminal, "ghost"));
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn add_pending_prefills_tabs_and_allocates_fresh_ids() {
        let mut store = seeded_store(5);
        let id = store.add_pending(
            ProductTab::Product(Product::Pertalite),
            RegionTab::Region(Region::Surabaya),
        );

        assert_eq!(id, RowId::new(6));
        let row = &store.pending()[0];
        assert_eq!(row.product, Some(Product::Pertalite));
        assert_eq!(row.region, Some(Region::Surabaya));
        assert_eq!(row.date, TODAY);
        assert_eq!(row.status, RowStatus::Active);
        assert_eq!(row.opening_stock, 0);
        assert!(row.terminal.is_empty());

        let next = store.add_pending(ProductTab::All, RegionTab::All);
        assert_eq!(next, RowId::new(7));
        assert_eq!(store.pending()[1].product, None);
        assert_eq!(store.pending()[1].region, None);
    }

    #[test]
    fn pending_ids_stay_unique_after_commit() {
        let mut store = seeded_store(3);
        store.add_pending(ProductTab::All, RegionTab::All);
        store.commit_pending();

        let id = store.add_pending(ProductTab::All, RegionTab::All);
        assert_eq!(id, RowId::new(5));
        let mut all_ids: Vec<i64> = store.rows().map(|row| row.id.get()).collect();
        all_ids.sort_unstable();
        all_ids.dedup();
        assert_eq!(all_ids.len(), store.len());
    }

    #[test]
    fn delete_pending_removes_only_the_target() {
        let mut store = seeded_store(2);
        let first = store.add_pending(ProductTab::All, RegionTab::All);
        let second = store.add_pending(ProductTab::All, RegionTab::All);

        assert!(store.delete_pending(first));
        assert_eq!(store.pending().len(), 1);
        assert_eq!(store.pending()[0].id, second);
    }

    #[test]
    fn delete_pending_with_unknown_id_changes_nothing() {
        let mut store = seeded_store(2);
        store.add_pending(ProductTab::All, RegionTab::All);
        let snapshot = store.pending().to_vec();
        let revision = store.revision();

        assert!(!store.delete_pending(RowId::new(999)));
        assert_eq!(store.pending(), snapshot.as_slice());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn delete_never_touches_committed_rows() {
        let mut store = seeded_store(2);
        assert!(!store.delete_pending(RowId::new(1)));
        assert_eq!(store.committed().len(), 2);
    }

    #[test]
    fn commit_pending_merges_in_order_and_empties_pending() {
        let mut store = seeded_store(2);
        let first = store.add_pending(ProductTab::Product(Product::Solar), RegionTab::All);
        let second = store.add_pending(ProductTab::Product(Product::Dexlite), RegionTab::All);

        assert_eq!(store.commit_pending(), 2);
        assert_eq!(store.committed().len(), 4);
        assert!(store.pending().is_empty());
        assert_eq!(store.committed()[2].id, first);
        assert_eq!(store.committed()[3].id, second);
    }

    #[test]
    fn commit_and_discard_on_empty_pending_are_no_ops() {
        let mut store = seeded_store(2);
        let revision = store.revision();

        assert_eq!(store.commit_pending(), 0);
        assert_eq!(store.discard_pending(), 0);
        assert_eq!(store.committed().len(), 2);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn discard_pending_drops_the_batch_without_merging() {
        let mut store = seeded_store(1);
        store.add_pending(ProductTab::All, RegionTab::All);
        store.add_pending(ProductTab::All, RegionTab::All);

        assert_eq!(store.discard_pending(), 2);
        assert!(store.pending().is_empty());
        assert_eq!(store.committed().len(), 1);
    }

    #[test]
    fn update_reaches_pending_rows_with_the_same_contract() {
        let mut store = seeded_store(1);
        let id = store.add_pending(ProductTab::All, RegionTab::All);

        store.update(id, EditableField::ClosingStock, "oops");
        assert_eq!(store.pending()[0].closing_stock, 0);

        store.update(id, EditableField::Terminal, "Terminal Z");
        assert_eq!(store.pending()[0].terminal, "Terminal Z");
    }

    #[test]
    fn row_at_uses_combined_ordering() {
        let mut store = seeded_store(2);
        let id = store.add_pending(ProductTab::All, RegionTab::All);

        assert_eq!(store.row_at(0).map(|row| row.id), Some(RowId::new(1)));
        assert_eq!(store.row_at(2).map(|row| row.id), Some(id));
        assert!(store.row_at(3).is_none());
    }
}
