// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;

use crate::filter::DateRange;
use crate::model::{ProductTab, RegionTab, SidebarModule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

impl DateBound {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "start date",
            Self::End => "end date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    EditCell,
    Search,
    DatePick(DateBound),
}

/// Navigation-shell state: which filters are active and what mode the UI is
/// in. Row data lives in the store, never here.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub mode: AppMode,
    pub module: SidebarModule,
    pub region: RegionTab,
    pub product: ProductTab,
    pub search: String,
    pub dates: DateRange,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            module: SidebarModule::Terminal,
            region: RegionTab::All,
            product: ProductTab::All,
            search: String::new(),
            dates: DateRange::default(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    NextRegion,
    PrevRegion,
    NextProduct,
    PrevProduct,
    NextModule,
    PrevModule,
    SetSearch(String),
    SetStartDate(Option<Date>),
    SetEndDate(Option<Date>),
    ClearDates,
    EnterEdit,
    EnterSearch,
    EnterDatePick(DateBound),
    ExitToNav,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    ModuleChanged(SidebarModule),
    RegionChanged(RegionTab),
    ProductChanged(ProductTab),
    SearchChanged(String),
    DatesChanged(DateRange),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextRegion => self.rotate_region(1),
            AppCommand::PrevRegion => self.rotate_region(-1),
            AppCommand::NextProduct => self.rotate_product(1),
            AppCommand::PrevProduct => self.rotate_product(-1),
            AppCommand::NextModule => self.rotate_module(1),
            AppCommand::PrevModule => self.rotate_module(-1),
            AppCommand::SetSearch(search) => {
                if self.search == search {
                    return Vec::new();
                }
                self.search = search.clone();
                vec![AppEvent::SearchChanged(search)]
            }
            AppCommand::SetStartDate(date) => {
                self.dates.start = date;
                vec![AppEvent::DatesChanged(self.dates)]
            }
            AppCommand::SetEndDate(date) => {
                self.dates.end = date;
                vec![AppEvent::DatesChanged(self.dates)]
            }
            AppCommand::ClearDates => {
                if self.dates.is_unbounded() {
                    return Vec::new();
                }
                self.dates = DateRange::default();
                vec![
                    AppEvent::DatesChanged(self.dates),
                    self.set_status("dates cleared"),
                ]
            }
            AppCommand::EnterEdit => {
                self.mode = AppMode::EditCell;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::EnterSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::EnterDatePick(bound) => {
                self.mode = AppMode::DatePick(bound);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetStatus(message) => {
                vec![self.set_status(message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_region(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = RegionTab::ALL;
        let current = tabs.iter().position(|tab| *tab == self.region).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(tabs.len() as isize) as usize;
        self.region = tabs[next];
        vec![AppEvent::RegionChanged(self.region)]
    }

    fn rotate_product(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = ProductTab::ALL;
        let current = tabs.iter().position(|tab| *tab == self.product).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(tabs.len() as isize) as usize;
        self.product = tabs[next];
        vec![AppEvent::ProductChanged(self.product)]
    }

    fn rotate_module(&mut self, delta: isize) -> Vec<AppEvent> {
        let modules = SidebarModule::ALL;
        let current = modules
            .iter()
            .position(|module| *module == self.module)
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(modules.len() as isize) as usize;
        self.module = modules[next];
        vec![AppEvent::ModuleChanged(self.module)]
    }

    fn set_status(&mut self, message: impl Into<String>) -> AppEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}
