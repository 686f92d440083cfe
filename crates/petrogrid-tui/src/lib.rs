// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use petrogrid_app::{
    AppCommand, AppEvent, AppMode, AppState, DateBound, EditableField, FieldKind, FilterQuery,
    ProductTab, Region, RegionTab, RowId, RowStatus, SidebarModule, TerminalRow,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::ops::Range;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::{Date, Month, OffsetDateTime};

const HALF_PAGE_ROWS: isize = 10;
const FULL_PAGE_ROWS: isize = 20;
const OVERSCAN_ROWS: usize = 4;
const DEFAULT_VIEWPORT_ROWS: usize = 20;

/// One row of the visible window, tagged with its lifecycle stage so the
/// grid can style and gate edits without another runtime round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRow {
    pub row: TerminalRow,
    pub pending: bool,
}

/// The TUI's only interface to row data. The shell never sees the full
/// collection: it asks for the filtered length and a window of rows, and
/// pushes mutations through the typed update surface.
pub trait AppRuntime {
    fn filtered_len(&mut self, query: &FilterQuery) -> Result<usize>;
    fn rows_window(&mut self, query: &FilterQuery, range: Range<usize>) -> Result<Vec<WindowRow>>;
    fn product_counts(&mut self, region: RegionTab) -> Result<Vec<(ProductTab, usize)>>;
    fn pending_len(&mut self) -> Result<usize>;
    fn update_cell(&mut self, id: RowId, field: EditableField, raw: &str) -> Result<bool>;
    fn add_row(&mut self, product: ProductTab, region: RegionTab) -> Result<RowId>;
    fn delete_row(&mut self, id: RowId) -> Result<bool>;
    fn save_rows(&mut self) -> Result<usize>;
    fn cancel_rows(&mut self) -> Result<usize>;
}

/// Scroll window over the filtered sequence: fixed one-line rows, offset +
/// viewport height, and an overscan margin on both sides. Rendering cost is
/// bounded by the viewport, never by the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridViewport {
    pub selected: usize,
    pub scroll_offset: usize,
    pub viewport_height: usize,
}

impl Default for GridViewport {
    fn default() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
            viewport_height: DEFAULT_VIEWPORT_ROWS,
        }
    }
}

impl GridViewport {
    pub fn move_selected(&mut self, delta: isize, total: usize) {
        if total == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
            return;
        }
        let current = self.selected as isize;
        self.selected = current.saturating_add(delta).clamp(0, total as isize - 1) as usize;
        self.ensure_visible();
    }

    pub fn jump_first(&mut self) {
        self.selected = 0;
        self.ensure_visible();
    }

    pub fn jump_last(&mut self, total: usize) {
        self.selected = total.saturating_sub(1);
        self.ensure_visible();
    }

    /// Clamp after the filtered sequence shrank underneath the cursor.
    pub fn clamp_to(&mut self, total: usize) {
        if total == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
            return;
        }
        if self.selected >= total {
            self.selected = total - 1;
        }
        self.ensure_visible();
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.ensure_visible();
    }

    fn ensure_visible(&mut self) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
        if self.selected >= self.scroll_offset + self.viewport_height {
            self.scroll_offset = self.selected.saturating_sub(self.viewport_height - 1);
        }
    }

    /// Indices worth materializing: the viewport plus the overscan margin,
    /// clamped to the sequence.
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = self.scroll_offset.saturating_sub(OVERSCAN_ROWS);
        let end = (self.scroll_offset + self.viewport_height + OVERSCAN_ROWS).min(total);
        start..end.max(start)
    }
}

/// Display columns, in grid order. The id is internal and never shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridColumn {
    Date,
    Terminal,
    Product,
    OpeningStock,
    Receipts,
    Deliveries,
    ClosingStock,
    Region,
    Customer,
    Volume,
    UnitPrice,
    TotalValue,
    Status,
}

impl GridColumn {
    const ALL: [Self; 13] = [
        Self::Date,
        Self::Terminal,
        Self::Product,
        Self::OpeningStock,
        Self::Receipts,
        Self::Deliveries,
        Self::ClosingStock,
        Self::Region,
        Self::Customer,
        Self::Volume,
        Self::UnitPrice,
        Self::TotalValue,
        Self::Status,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Terminal => "terminal",
            Self::Product => "product",
            Self::OpeningStock => "open",
            Self::Receipts => "receipts",
            Self::Deliveries => "deliveries",
            Self::ClosingStock => "close",
            Self::Region => "region",
            Self::Customer => "customer",
            Self::Volume => "vol (kl)",
            Self::UnitPrice => "price",
            Self::TotalValue => "value",
            Self::Status => "status",
        }
    }

    const fn min_width(self) -> u16 {
        match self {
            Self::Date => 10,
            Self::Terminal | Self::Customer => 11,
            Self::Product => 9,
            Self::TotalValue => 9,
            Self::OpeningStock | Self::Receipts | Self::Deliveries | Self::ClosingStock => 6,
            Self::Region | Self::Volume | Self::UnitPrice | Self::Status => 8,
        }
    }

    /// The editable field behind this column, if any. Product is a fixed
    /// badge everywhere; region and status unlock only on pending rows.
    fn field_for(self, pending: bool) -> Option<EditableField> {
        match self {
            Self::Product => None,
            Self::Region => pending.then_some(EditableField::Region),
            Self::Status => pending.then_some(EditableField::Status),
            Self::Date => Some(EditableField::Date),
            Self::Terminal => Some(EditableField::Terminal),
            Self::OpeningStock => Some(EditableField::OpeningStock),
            Self::Receipts => Some(EditableField::Receipts),
            Self::Deliveries => Some(EditableField::Deliveries),
            Self::ClosingStock => Some(EditableField::ClosingStock),
            Self::Customer => Some(EditableField::Customer),
            Self::Volume => Some(EditableField::Volume),
            Self::UnitPrice => Some(EditableField::UnitPrice),
            Self::TotalValue => Some(EditableField::TotalValue),
        }
    }

    fn cell_text(self, row: &TerminalRow) -> String {
        match self {
            Self::Date => row.date.to_string(),
            Self::Terminal => row.terminal.clone(),
            Self::Product => row.product_text().to_owned(),
            Self::OpeningStock => row.opening_stock.to_string(),
            Self::Receipts => row.receipts.to_string(),
            Self::Deliveries => row.deliveries.to_string(),
            Self::ClosingStock => row.closing_stock.to_string(),
            Self::Region => row.region_text().to_owned(),
            Self::Customer => row.customer.clone(),
            Self::Volume => row.volume.to_string(),
            Self::UnitPrice => row.unit_price.to_string(),
            Self::TotalValue => row.total_value.to_string(),
            Self::Status => row.status.label().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum EditBuffer {
    Text(String),
    Choice {
        options: Vec<&'static str>,
        index: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct EditUiState {
    row_id: RowId,
    field: EditableField,
    buffer: EditBuffer,
}

impl EditUiState {
    fn raw_value(&self) -> String {
        match &self.buffer {
            EditBuffer::Text(text) => text.clone(),
            EditBuffer::Choice { options, index } => {
                options.get(*index).copied().unwrap_or_default().to_owned()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DatePickerUiState {
    bound: DateBound,
    selected: Date,
    original: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    viewport: GridViewport,
    selected_col: usize,
    edit: Option<EditUiState>,
    date_picker: Option<DatePickerUiState>,
    help_visible: bool,
    filtered_len: usize,
    window_start: usize,
    window_rows: Vec<WindowRow>,
    counts: Vec<(ProductTab, usize)>,
    pending_len: usize,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_view_data(state, runtime, &mut view_data) {
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Ok(size) = terminal.size() {
            sync_viewport_height(state, runtime, &mut view_data, size.height);
        }

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn query_of(state: &AppState) -> FilterQuery {
    FilterQuery {
        product: state.product,
        region: state.region,
        search: state.search.clone(),
        dates: state.dates,
    }
}

/// Full refresh: filtered length, visible window, tab counts, pending size.
fn refresh_view_data<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    view_data.counts = runtime.product_counts(state.region)?;
    view_data.pending_len = runtime.pending_len()?;
    refresh_window(state, runtime, view_data)
}

/// Light refresh after scroll movement: length + window only; the filter
/// result itself is memoized behind the runtime.
fn refresh_window<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    let query = query_of(state);
    view_data.filtered_len = runtime.filtered_len(&query)?;
    view_data.viewport.clamp_to(view_data.filtered_len);
    let window = view_data.viewport.window(view_data.filtered_len);
    view_data.window_start = window.start;
    view_data.window_rows = runtime.rows_window(&query, window)?;
    Ok(())
}

fn sync_viewport_height<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    frame_height: u16,
) {
    // tabs(3) + filter line(3) + status(3) + optional banner(3) around the
    // grid block, whose borders and header eat 3 more rows
    let banner = if view_data.pending_len > 0 { 3 } else { 0 };
    let chrome = 3 + 3 + 3 + banner + 3;
    let height = usize::from(frame_height.saturating_sub(chrome)).max(1);
    if height != view_data.viewport.viewport_height {
        view_data.viewport.set_viewport_height(height);
        let _ = refresh_window(state, runtime, view_data);
    }
}

fn should_refresh_view(events: &[AppEvent]) -> bool {
    events.iter().any(|event| {
        matches!(
            event,
            AppEvent::RegionChanged(_)
                | AppEvent::ProductChanged(_)
                | AppEvent::SearchChanged(_)
                | AppEvent::DatesChanged(_)
                | AppEvent::ModuleChanged(_)
        )
    })
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    command: AppCommand,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = state.dispatch(command);

    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }

    if should_refresh_view(&events)
        && let Err(error) = refresh_view_data(state, runtime, view_data)
    {
        emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
    }
}

fn selected_window_row(view_data: &ViewData) -> Option<&WindowRow> {
    let index = view_data.viewport.selected.checked_sub(view_data.window_start)?;
    view_data.window_rows.get(index)
}

/// Returns true when the app should exit.
fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
            emit_status(state, view_data, internal_tx, "help hidden");
        }
        return false;
    }

    match state.mode {
        AppMode::DatePick(_) => {
            handle_date_picker_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::Search => {
            handle_search_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::EditCell => {
            handle_edit_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
    }
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('?'), _) => {
            view_data.help_visible = true;
            emit_status(state, view_data, internal_tx, "help open");
            return false;
        }
        (KeyCode::Tab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextModule, internal_tx);
            return false;
        }
        (KeyCode::BackTab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevModule, internal_tx);
            return false;
        }
        _ => {}
    }

    if !state.module.has_grid() {
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('j') | KeyCode::Down, _) => move_row(state, runtime, view_data, 1),
        (KeyCode::Char('k') | KeyCode::Up, _) => move_row(state, runtime, view_data, -1),
        (KeyCode::Char('h') | KeyCode::Left, _) => move_col(view_data, -1),
        (KeyCode::Char('l') | KeyCode::Right, _) => move_col(view_data, 1),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
            move_row(state, runtime, view_data, HALF_PAGE_ROWS)
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            move_row(state, runtime, view_data, -HALF_PAGE_ROWS)
        }
        (KeyCode::PageDown, _) => move_row(state, runtime, view_data, FULL_PAGE_ROWS),
        (KeyCode::PageUp, _) => move_row(state, runtime, view_data, -FULL_PAGE_ROWS),
        (KeyCode::Char('g') | KeyCode::Home, _) => {
            view_data.viewport.jump_first();
            let _ = refresh_window(state, runtime, view_data);
        }
        (KeyCode::Char('G') | KeyCode::End, _) => {
            view_data.viewport.jump_last(view_data.filtered_len);
            let _ = refresh_window(state, runtime, view_data);
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextProduct, internal_tx);
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevProduct, internal_tx);
        }
        (KeyCode::Char('n'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextRegion, internal_tx);
        }
        (KeyCode::Char('p'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevRegion, internal_tx);
        }
        (KeyCode::Char('/'), _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::EnterSearch, internal_tx);
        }
        (KeyCode::Char('['), _) => open_date_picker(state, view_data, DateBound::Start),
        (KeyCode::Char(']'), _) => open_date_picker(state, view_data, DateBound::End),
        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ClearDates, internal_tx);
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            handle_add_row(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) => {
            handle_delete_row(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('w'), KeyModifiers::NONE) => {
            handle_save_rows(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('x'), KeyModifiers::NONE) => {
            handle_cancel_rows(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Enter, _) => {
            handle_enter_edit(state, view_data, internal_tx);
        }
        _ => {}
    }

    false
}

fn move_row<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    delta: isize,
) {
    view_data.viewport.move_selected(delta, view_data.filtered_len);
    let _ = refresh_window(state, runtime, view_data);
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let columns = GridColumn::ALL.len() as isize;
    let next = (view_data.selected_col as isize + delta).clamp(0, columns - 1);
    view_data.selected_col = next as usize;
}

fn handle_add_row<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match runtime.add_row(state.product, state.region) {
        Ok(id) => {
            if let Err(error) = refresh_view_data(state, runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
                return;
            }
            view_data.viewport.jump_last(view_data.filtered_len);
            let _ = refresh_window(state, runtime, view_data);
            emit_status(state, view_data, internal_tx, format!("row {} added", id.get()));
        }
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("add failed: {error}"));
        }
    }
}

fn handle_delete_row<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some((id, pending)) = selected_window_row(view_data)
        .map(|window_row| (window_row.row.id, window_row.pending))
    else {
        emit_status(state, view_data, internal_tx, "no row selected");
        return;
    };
    if !pending {
        emit_status(state, view_data, internal_tx, "only new rows can be deleted");
        return;
    }

    match runtime.delete_row(id) {
        Ok(true) => {
            if let Err(error) = refresh_view_data(state, runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
                return;
            }
            emit_status(state, view_data, internal_tx, format!("row {} removed", id.get()));
        }
        Ok(false) => {
            let _ = refresh_view_data(state, runtime, view_data);
        }
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("delete failed: {error}"));
        }
    }
}

fn handle_save_rows<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match runtime.save_rows() {
        Ok(0) => emit_status(state, view_data, internal_tx, "no new rows to save"),
        Ok(saved) => {
            let _ = refresh_view_data(state, runtime, view_data);
            emit_status(state, view_data, internal_tx, format!("saved {saved} new rows"));
        }
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("save failed: {error}"));
        }
    }
}

fn handle_cancel_rows<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match runtime.cancel_rows() {
        Ok(0) => emit_status(state, view_data, internal_tx, "no new rows to discard"),
        Ok(dropped) => {
            let _ = refresh_view_data(state, runtime, view_data);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("discarded {dropped} new rows"),
            );
        }
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("discard failed: {error}"));
        }
    }
}

fn handle_enter_edit(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some((row, pending)) = selected_window_row(view_data)
        .map(|window_row| (window_row.row.clone(), window_row.pending))
    else {
        emit_status(state, view_data, internal_tx, "no row selected");
        return;
    };

    let column = GridColumn::ALL[view_data.selected_col];
    let Some(field) = column.field_for(pending) else {
        let message = match column {
            GridColumn::Product => "product is fixed per row",
            _ => "region and status unlock on new rows only",
        };
        emit_status(state, view_data, internal_tx, message);
        return;
    };

    let buffer = match field.kind() {
        FieldKind::RegionChoice => {
            let options: Vec<&'static str> =
                Region::ALL.iter().map(|region| region.name()).collect();
            let index = row
                .region
                .and_then(|region| Region::ALL.iter().position(|entry| *entry == region))
                .unwrap_or(0);
            EditBuffer::Choice { options, index }
        }
        FieldKind::StatusChoice => {
            let options: Vec<&'static str> =
                RowStatus::ALL.iter().map(|status| status.label()).collect();
            let index = RowStatus::ALL
                .iter()
                .position(|entry| *entry == row.status)
                .unwrap_or(0);
            EditBuffer::Choice { options, index }
        }
        FieldKind::Text | FieldKind::Date | FieldKind::Count | FieldKind::Decimal => {
            EditBuffer::Text(column.cell_text(&row))
        }
    };

    view_data.edit = Some(EditUiState {
        row_id: row.id,
        field,
        buffer,
    });
    state.dispatch(AppCommand::EnterEdit);
}

fn handle_edit_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.edit.is_none() {
        state.dispatch(AppCommand::ExitToNav);
        return;
    }

    match key.code {
        KeyCode::Esc => {
            view_data.edit = None;
            state.dispatch(AppCommand::ExitToNav);
            emit_status(state, view_data, internal_tx, "edit canceled");
        }
        KeyCode::Enter => {
            let Some(edit) = view_data.edit.take() else {
                return;
            };
            state.dispatch(AppCommand::ExitToNav);
            let raw = edit.raw_value();
            match runtime.update_cell(edit.row_id, edit.field, &raw) {
                Ok(true) => {
                    let _ = refresh_view_data(state, runtime, view_data);
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("{} updated", edit.field.label()),
                    );
                }
                Ok(false) => {
                    let _ = refresh_view_data(state, runtime, view_data);
                    emit_status(state, view_data, internal_tx, "row no longer present");
                }
                Err(error) => {
                    emit_status(state, view_data, internal_tx, format!("edit failed: {error}"));
                }
            }
        }
        _ => {
            let Some(edit) = view_data.edit.as_mut() else {
                return;
            };
            match (key.code, &mut edit.buffer) {
                (KeyCode::Backspace, EditBuffer::Text(text)) => {
                    text.pop();
                }
                (KeyCode::Char(c), EditBuffer::Text(text))
                    if !key.modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    text.push(c);
                }
                (KeyCode::Left | KeyCode::Up, EditBuffer::Choice { options, index }) => {
                    *index = (*index + options.len() - 1) % options.len();
                }
                (
                    KeyCode::Right | KeyCode::Down | KeyCode::Char(' '),
                    EditBuffer::Choice { options, index },
                ) => {
                    *index = (*index + 1) % options.len();
                }
                _ => {}
            }
        }
    }
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc | KeyCode::Enter, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
        }
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                AppCommand::SetSearch(String::new()),
                internal_tx,
            );
        }
        (KeyCode::Backspace, _) => {
            let mut search = state.search.clone();
            search.pop();
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                AppCommand::SetSearch(search),
                internal_tx,
            );
        }
        (KeyCode::Char(c), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            let mut search = state.search.clone();
            search.push(c);
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                AppCommand::SetSearch(search),
                internal_tx,
            );
        }
        _ => {}
    }
}

fn open_date_picker(state: &mut AppState, view_data: &mut ViewData, bound: DateBound) {
    let original = match bound {
        DateBound::Start => state.dates.start,
        DateBound::End => state.dates.end,
    };
    let fallback = match bound {
        DateBound::Start => state.dates.end,
        DateBound::End => state.dates.start,
    };
    let selected = original
        .or(fallback)
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    view_data.date_picker = Some(DatePickerUiState {
        bound,
        selected,
        original,
    });
    state.dispatch(AppCommand::EnterDatePick(bound));
}

fn handle_date_picker_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(picker) = view_data.date_picker else {
        state.dispatch(AppCommand::ExitToNav);
        return;
    };

    let next = match key.code {
        KeyCode::Esc => {
            view_data.date_picker = None;
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
            emit_status(state, view_data, internal_tx, "date edit canceled");
            return;
        }
        KeyCode::Enter => {
            view_data.date_picker = None;
            let command = match picker.bound {
                DateBound::Start => AppCommand::SetStartDate(Some(picker.selected)),
                DateBound::End => AppCommand::SetEndDate(Some(picker.selected)),
            };
            dispatch_and_refresh(state, runtime, view_data, command, internal_tx);
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("{} set {}", picker.bound.label(), picker.selected),
            );
            return;
        }
        KeyCode::Char('c') | KeyCode::Delete => {
            view_data.date_picker = None;
            let command = match picker.bound {
                DateBound::Start => AppCommand::SetStartDate(None),
                DateBound::End => AppCommand::SetEndDate(None),
            };
            dispatch_and_refresh(state, runtime, view_data, command, internal_tx);
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("{} cleared", picker.bound.label()),
            );
            return;
        }
        KeyCode::Char('h') | KeyCode::Left => shift_date_by_days(picker.selected, -1),
        KeyCode::Char('l') | KeyCode::Right => shift_date_by_days(picker.selected, 1),
        KeyCode::Char('j') | KeyCode::Down => shift_date_by_days(picker.selected, 7),
        KeyCode::Char('k') | KeyCode::Up => shift_date_by_days(picker.selected, -7),
        KeyCode::Char('H') | KeyCode::PageUp => shift_date_by_months(picker.selected, -1),
        KeyCode::Char('L') | KeyCode::PageDown => shift_date_by_months(picker.selected, 1),
        KeyCode::Char('[') => shift_date_by_years(picker.selected, -1),
        KeyCode::Char(']') => shift_date_by_years(picker.selected, 1),
        _ => None,
    };

    if let Some(date) = next {
        view_data.date_picker = Some(DatePickerUiState {
            selected: date,
            ..picker
        });
    }
}

fn shift_date_by_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(time::Duration::days(days))
}

fn shift_date_by_years(date: Date, years: i32) -> Option<Date> {
    shift_date_by_months(date, years.saturating_mul(12))
}

fn shift_date_by_months(date: Date, months: i32) -> Option<Date> {
    let base_month = i32::from(date.month() as u8);
    let total_month = base_month - 1 + months;
    let year = date.year() + total_month.div_euclid(12);
    let month_number = (total_month.rem_euclid(12) + 1) as u8;
    let month = Month::try_from(month_number).ok()?;
    let max_day = last_day_of_month(year, month)?;
    let clamped_day = date.day().min(max_day);
    Date::from_calendar_date(year, month, clamped_day).ok()
}

fn last_day_of_month(year: i32, month: Month) -> Option<u8> {
    let (next_year, next_month) = if month == Month::December {
        (year + 1, Month::January)
    } else {
        let next = Month::try_from((month as u8) + 1).ok()?;
        (year, next)
    };

    let first_next_month = Date::from_calendar_date(next_year, next_month, 1).ok()?;
    let last = first_next_month - time::Duration::days(1);
    Some(last.day())
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(1),
    ];
    if view_data.pending_len > 0 {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(3));

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_product_tabs(frame, layout[0], state, view_data);

    let filters = Paragraph::new(filter_line_text(state))
        .block(Block::default().borders(Borders::ALL).title("filters"));
    frame.render_widget(filters, layout[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14),
            Constraint::Length(18),
            Constraint::Min(1),
        ])
        .split(layout[2]);

    render_module_rail(frame, body[0], state);
    render_region_list(frame, body[1], state);
    render_grid(frame, body[2], state, view_data);

    let mut next_area = 3;
    if view_data.pending_len > 0 {
        let banner = Paragraph::new(pending_banner_text(view_data))
            .style(Style::default().fg(Color::Green))
            .block(Block::default().borders(Borders::ALL).title("new rows"));
        frame.render_widget(banner, layout[next_area]);
        next_area += 1;
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[next_area]);

    if let Some(edit) = &view_data.edit {
        let area = centered_rect(48, 32, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(edit_overlay_text(edit)).block(
            Block::default()
                .title("edit cell")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(overlay, area);
    }

    if let Some(picker) = &view_data.date_picker {
        let area = centered_rect(48, 30, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(date_picker_overlay_text(picker))
            .block(Block::default().title("date").borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 72, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_product_tabs(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let selected = ProductTab::ALL
        .iter()
        .position(|tab| *tab == state.product)
        .unwrap_or(0);
    let tabs = Tabs::new(product_tab_titles(view_data))
        .block(Block::default().title("petrogrid").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, area);
}

fn render_module_rail(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let lines = SidebarModule::ALL
        .iter()
        .map(|module| {
            let marker = if *module == state.module { ">" } else { " " };
            format!("{marker} {}", module.label())
        })
        .collect::<Vec<_>>()
        .join("\n");
    let rail = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("modules"));
    frame.render_widget(rail, area);
}

fn render_region_list(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let lines = RegionTab::ALL
        .iter()
        .map(|tab| {
            let marker = if *tab == state.region { ">" } else { " " };
            format!("{marker} {}", tab.label())
        })
        .collect::<Vec<_>>()
        .join("\n");
    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("regions"));
    frame.render_widget(list, area);
}

fn render_grid(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    if !state.module.has_grid() {
        let placeholder = Paragraph::new(module_placeholder_text(state.module)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(state.module.label()),
        );
        frame.render_widget(placeholder, area);
        return;
    }

    if view_data.filtered_len == 0 {
        let empty = Paragraph::new(no_data_text(state)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(grid_title(state, view_data)),
        );
        frame.render_widget(empty, area);
        return;
    }

    let header_cells = GridColumn::ALL.iter().map(|column| {
        Cell::from(column.label()).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    // the window carries overscan; rendering starts at the scroll offset
    let skip = view_data
        .viewport
        .scroll_offset
        .saturating_sub(view_data.window_start);
    let rows = view_data
        .window_rows
        .iter()
        .skip(skip)
        .take(view_data.viewport.viewport_height)
        .enumerate()
        .map(|(visible_index, window_row)| {
            let absolute = view_data.viewport.scroll_offset + visible_index;
            let selected_row = absolute == view_data.viewport.selected;

            let cells = GridColumn::ALL
                .iter()
                .enumerate()
                .map(|(column_index, column)| {
                    let mut style = Style::default();
                    if window_row.pending {
                        style = style.fg(Color::Green);
                    }
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && column_index == view_data.selected_col {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(column.cell_text(&window_row.row)).style(style)
                })
                .collect::<Vec<_>>();

            Row::new(cells)
        });

    let widths = GridColumn::ALL.map(|column| Constraint::Min(column.min_width()));
    let table = Table::new(rows, widths).header(header).column_spacing(1).block(
        Block::default()
            .title(grid_title(state, view_data))
            .borders(Borders::ALL),
    );
    frame.render_widget(table, area);
}

fn product_tab_titles(view_data: &ViewData) -> Vec<String> {
    ProductTab::ALL
        .iter()
        .map(|tab| {
            let count = view_data
                .counts
                .iter()
                .find(|(entry, _)| entry == tab)
                .map_or(0, |(_, count)| *count);
            format!("{} {}", tab.label(), count)
        })
        .collect()
}

fn filter_line_text(state: &AppState) -> String {
    let search = if state.search.is_empty() {
        "-".to_owned()
    } else {
        state.search.clone()
    };
    let start = state
        .dates
        .start
        .map_or_else(|| "..".to_owned(), |date| date.to_string());
    let end = state
        .dates
        .end
        .map_or_else(|| "..".to_owned(), |date| date.to_string());
    format!("search: {search} | dates: {start} -> {end} | region: {}", state.region.label())
}

fn grid_title(state: &AppState, view_data: &ViewData) -> String {
    let mut parts = vec![format!("terminal ops r:{}", view_data.filtered_len)];
    if state.product != ProductTab::All {
        parts.push(state.product.label().to_owned());
    }
    if state.region != RegionTab::All {
        parts.push(state.region.label().to_owned());
    }
    if view_data.pending_len > 0 {
        parts.push(format!("new {}", view_data.pending_len));
    }
    parts.join(" | ")
}

fn no_data_text(state: &AppState) -> String {
    let product = match state.product {
        ProductTab::All => String::new(),
        ProductTab::Product(product) => format!("{} ", product.label()),
    };
    let region = match state.region {
        RegionTab::All => String::new(),
        RegionTab::Region(region) => format!(" in {}", region.name()),
    };
    format!("no {product}data found matching your filters{region}")
}

fn module_placeholder_text(module: SidebarModule) -> String {
    format!(
        "the {} module has no data here; the terminal module holds the operations grid",
        module.label()
    )
}

fn pending_banner_text(view_data: &ViewData) -> String {
    let plural = if view_data.pending_len == 1 { "" } else { "s" };
    format!(
        "{} new row{plural} added | w save all | x cancel",
        view_data.pending_len
    )
}

fn edit_overlay_text(edit: &EditUiState) -> String {
    match &edit.buffer {
        EditBuffer::Text(text) => format!(
            "editing {} (row {})\n\n> {text}_\n\nenter apply | esc cancel",
            edit.field.label(),
            edit.row_id.get(),
        ),
        EditBuffer::Choice { options, index } => {
            let choices = options
                .iter()
                .enumerate()
                .map(|(entry_index, option)| {
                    let marker = if entry_index == *index { ">" } else { " " };
                    format!("{marker} {option}")
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "editing {} (row {})\n\n{choices}\n\nleft/right cycle | enter apply | esc cancel",
                edit.field.label(),
                edit.row_id.get(),
            )
        }
    }
}

fn date_picker_overlay_text(picker: &DatePickerUiState) -> String {
    let original = picker
        .original
        .map_or_else(|| "unset".to_owned(), |date| date.to_string());
    format!(
        "{}\n\n  {}\n  (was {original})\n\nh/l day | j/k week | H/L month | [/] year\nenter set | c clear | esc cancel",
        picker.bound.label(),
        picker.selected,
    )
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let mode = mode_label(state.mode);
    match &state.status_line {
        Some(message) => format!("[{mode}] {message}"),
        None => format!("[{mode}] {}", contextual_hint(state, view_data)),
    }
}

fn contextual_hint(state: &AppState, view_data: &ViewData) -> &'static str {
    match state.mode {
        AppMode::Search => "type to filter | enter done | ctrl-u clear",
        AppMode::EditCell => "enter apply | esc cancel",
        AppMode::DatePick(_) => "arrows move | enter set | c clear | esc cancel",
        AppMode::Nav if !state.module.has_grid() => "tab switch module | ctrl-q quit",
        AppMode::Nav if view_data.pending_len > 0 => {
            "enter edit | a add | w save | x cancel | ? help"
        }
        AppMode::Nav => "enter edit | a add | / search | [ ] dates | ? help",
    }
}

const fn mode_label(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Nav => "nav",
        AppMode::EditCell => "edit",
        AppMode::Search => "search",
        AppMode::DatePick(_) => "date",
    }
}

fn help_overlay_text() -> &'static str {
    "petrogrid keys\n\
     \n\
     j/k or arrows  move row          h/l move column\n\
     ctrl-d/ctrl-u  half page         pgup/pgdn full page\n\
     g/G            first/last row\n\
     f/b            product tab       n/p region\n\
     tab/shift-tab  sidebar module\n\
     /              search (live)     ctrl-u clear search\n\
     [ ]            start/end date    c clear dates\n\
     enter          edit cell         a add new row\n\
     d              delete new row    w save new rows\n\
     x              cancel new rows\n\
     ?              toggle help       ctrl-q quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
