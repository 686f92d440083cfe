// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::RowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    Pertalite,
    Pertamax,
    Biosolar,
    Dexlite,
    PertamaxTurbo,
    Solar,
}

impl Product {
    pub const ALL: [Self; 6] = [
        Self::Pertalite,
        Self::Pertamax,
        Self::Biosolar,
        Self::Dexlite,
        Self::PertamaxTurbo,
        Self::Solar,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pertalite => "Pertalite",
            Self::Pertamax => "Pertamax",
            Self::Biosolar => "Biosolar",
            Self::Dexlite => "Dexlite",
            Self::PertamaxTurbo => "Pertamax Turbo",
            Self::Solar => "Solar",
        }
    }

    /// Lowercase, whitespace-to-hyphen form of the label.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pertalite => "pertalite",
            Self::Pertamax => "pertamax",
            Self::Biosolar => "biosolar",
            Self::Dexlite => "dexlite",
            Self::PertamaxTurbo => "pertamax-turbo",
            Self::Solar => "solar",
        }
    }

    pub fn parse_key(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|product| product.key() == value)
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|product| product.label().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Jakarta,
    Surabaya,
    Medan,
    Makassar,
    Balikpapan,
    Bandung,
    Palembang,
}

impl Region {
    pub const ALL: [Self; 7] = [
        Self::Jakarta,
        Self::Surabaya,
        Self::Medan,
        Self::Makassar,
        Self::Balikpapan,
        Self::Bandung,
        Self::Palembang,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Jakarta => "Jakarta",
            Self::Surabaya => "Surabaya",
            Self::Medan => "Medan",
            Self::Makassar => "Makassar",
            Self::Balikpapan => "Balikpapan",
            Self::Bandung => "Bandung",
            Self::Palembang => "Palembang",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Jakarta => "region-1",
            Self::Surabaya => "region-2",
            Self::Medan => "region-3",
            Self::Makassar => "region-4",
            Self::Balikpapan => "region-5",
            Self::Bandung => "region-6",
            Self::Palembang => "region-7",
        }
    }

    pub fn parse_key(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|region| region.key() == value)
    }

    pub fn parse_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|region| region.name().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowStatus {
    Active,
    Pending,
    Completed,
}

impl RowStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Pending, Self::Completed];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
        }
    }

    pub fn parse_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(value.trim()))
    }
}

/// Product tab selection: the "all" tab or a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductTab {
    All,
    Product(Product),
}

impl ProductTab {
    pub const ALL: [Self; 7] = [
        Self::All,
        Self::Product(Product::Pertalite),
        Self::Product(Product::Pertamax),
        Self::Product(Product::Biosolar),
        Self::Product(Product::Dexlite),
        Self::Product(Product::PertamaxTurbo),
        Self::Product(Product::Solar),
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Product(product) => product.key(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Products",
            Self::Product(product) => product.label(),
        }
    }

    pub fn parse_key(value: &str) -> Option<Self> {
        if value == "all" {
            return Some(Self::All);
        }
        Product::parse_key(value).map(Self::Product)
    }

    pub const fn product(self) -> Option<Product> {
        match self {
            Self::All => None,
            Self::Product(product) => Some(product),
        }
    }
}

impl Default for ProductTab {
    fn default() -> Self {
        Self::All
    }
}

/// Region tab selection: the "all" tab or a single region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionTab {
    All,
    Region(Region),
}

impl RegionTab {
    pub const ALL: [Self; 8] = [
        Self::All,
        Self::Region(Region::Jakarta),
        Self::Region(Region::Surabaya),
        Self::Region(Region::Medan),
        Self::Region(Region::Makassar),
        Self::Region(Region::Balikpapan),
        Self::Region(Region::Bandung),
        Self::Region(Region::Palembang),
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Region(region) => region.key(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Regions",
            Self::Region(region) => region.name(),
        }
    }

    pub fn parse_key(value: &str) -> Option<Self> {
        if value == "all" {
            return Some(Self::All);
        }
        Region::parse_key(value).map(Self::Region)
    }

    pub const fn region(self) -> Option<Region> {
        match self {
            Self::All => None,
            Self::Region(region) => Some(region),
        }
    }
}

impl Default for RegionTab {
    fn default() -> Self {
        Self::All
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SidebarModule {
    Dashboard,
    Terminal,
    Refinery,
    Transportation,
    Reports,
}

impl SidebarModule {
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::Terminal,
        Self::Refinery,
        Self::Transportation,
        Self::Reports,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Terminal => "terminal",
            Self::Refinery => "refinery",
            Self::Transportation => "transport",
            Self::Reports => "reports",
        }
    }

    /// Only the terminal module carries the data grid.
    pub const fn has_grid(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// One terminal/product/date observation.
///
/// `product` and `region` are `None` on pending rows added from an "all"
/// tab; such rows match only the "all" filters and render as empty cells.
/// `total_value` is an independent figure, never reconciled with
/// `volume * unit_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalRow {
    pub id: RowId,
    pub date: Date,
    pub terminal: String,
    pub product: Option<Product>,
    pub opening_stock: i64,
    pub receipts: i64,
    pub deliveries: i64,
    pub closing_stock: i64,
    pub region: Option<Region>,
    pub customer: String,
    pub volume: f64,
    pub unit_price: f64,
    pub total_value: f64,
    pub status: RowStatus,
}

impl TerminalRow {
    /// Blank row template: quantities zero, text empty, status Active.
    pub fn empty(id: RowId, date: Date, product: Option<Product>, region: Option<Region>) -> Self {
        Self {
            id,
            date,
            terminal: String::new(),
            product,
            opening_stock: 0,
            receipts: 0,
            deliveries: 0,
            closing_stock: 0,
            region,
            customer: String::new(),
            volume: 0.0,
            unit_price: 0.0,
            total_value: 0.0,
            status: RowStatus::Active,
        }
    }

    pub fn product_text(&self) -> &'static str {
        self.product.map_or("", Product::label)
    }

    pub fn region_text(&self) -> &'static str {
        self.region.map_or("", Region::name)
    }

    /// String form of every field, in column order, for free-text search.
    pub fn search_haystacks(&self) -> [String; 14] {
        [
            self.id.get().to_string(),
            self.date.to_string(),
            self.terminal.clone(),
            self.product_text().to_owned(),
            self.opening_stock.to_string(),
            self.receipts.to_string(),
            self.deliveries.to_string(),
            self.closing_stock.to_string(),
            self.region_text().to_owned(),
            self.customer.clone(),
            self.volume.to_string(),
            self.unit_price.to_string(),
            self.total_value.to_string(),
            self.status.label().to_owned(),
        ]
    }
}

/// Coercion class of an editable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    /// Whole-unit quantity; float input truncates, junk coerces to 0.
    Count,
    /// Fractional quantity; junk coerces to 0.0.
    Decimal,
    RegionChoice,
    StatusChoice,
}

/// Closed set of editable columns. The product column is not in the set:
/// the grid renders product as a read-only badge in every row state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditableField {
    Date,
    Terminal,
    OpeningStock,
    Receipts,
    Deliveries,
    ClosingStock,
    Customer,
    Volume,
    UnitPrice,
    TotalValue,
    Region,
    Status,
}

impl EditableField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Terminal => "terminal",
            Self::OpeningStock => "opening stock",
            Self::Receipts => "receipts",
            Self::Deliveries => "deliveries",
            Self::ClosingStock => "closing stock",
            Self::Customer => "customer",
            Self::Volume => "volume",
            Self::UnitPrice => "unit price",
            Self::TotalValue => "total value",
            Self::Region => "region",
            Self::Status => "status",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Date => FieldKind::Date,
            Self::Terminal | Self::Customer => FieldKind::Text,
            Self::OpeningStock | Self::Receipts | Self::Deliveries | Self::ClosingStock => {
                FieldKind::Count
            }
            Self::Volume | Self::UnitPrice | Self::TotalValue => FieldKind::Decimal,
            Self::Region => FieldKind::RegionChoice,
            Self::Status => FieldKind::StatusChoice,
        }
    }
}
