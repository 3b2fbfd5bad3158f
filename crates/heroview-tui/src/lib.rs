// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use heroview_app::{
    Column, ColumnKind, LoadStatus, PageSize, PageSlice, Presenter, RawValue, Record,
    SortDirection, ViewCommand, ViewController, ViewEvent, resolve_raw,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const SORT_MARK_ASC: &str = "▲";
const SORT_MARK_DESC: &str = "▼";
const ICON_PORTRAIT: &str = "●";
const ICON_PLACEHOLDER: &str = "○";
const SEARCH_CURSOR: &str = "▏";
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

/// The one table body on screen. Every render replaces all of its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBody {
    rows: Vec<BodyRow>,
    matched: usize,
    page: usize,
    page_count: usize,
    page_size: PageSize,
    sort: Option<(Column, SortDirection)>,
    renders: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BodyRow {
    id: i64,
    cells: Vec<String>,
}

impl Default for TableBody {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            matched: 0,
            page: 1,
            page_count: 1,
            page_size: heroview_app::DEFAULT_PAGE_SIZE,
            sort: None,
            renders: 0,
        }
    }
}

impl Presenter for TableBody {
    fn render(&mut self, slice: &PageSlice<'_>) {
        self.rows = slice
            .rows
            .iter()
            .map(|record| BodyRow {
                id: record.id.get(),
                cells: Column::ALL
                    .iter()
                    .map(|column| cell_text(record, *column))
                    .collect(),
            })
            .collect();
        self.matched = slice.matched;
        self.page = slice.page;
        self.page_count = slice.page_count;
        self.page_size = slice.page_size;
        self.sort = slice.sort;
        self.renders = self.renders.saturating_add(1);
    }
}

impl TableBody {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_ids(&self) -> Vec<i64> {
        self.rows.iter().map(|row| row.id).collect()
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    pub fn title(&self) -> String {
        format!(
            " page {}/{} | {} matched | size {} ",
            self.page, self.page_count, self.matched, self.page_size
        )
    }

    /// Renders the body as aligned columns for non-interactive output.
    pub fn to_plain_text(&self) -> String {
        let headers = Column::ALL
            .iter()
            .map(|column| header_label(*column, self.sort))
            .collect::<Vec<_>>();
        let widths = headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.cells.get(index))
                    .map(|cell| cell.chars().count())
                    .chain([header.chars().count()])
                    .max()
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(pad_line(&headers, &widths));
        lines.extend(self.rows.iter().map(|row| pad_line(&row.cells, &widths)));
        lines.push(self.title().trim().to_owned());
        lines.join("\n")
    }
}

fn pad_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

fn cell_text(record: &Record, column: Column) -> String {
    match resolve_raw(record, column) {
        Some(RawValue::Icon { placeholder, .. }) => icon_mark(placeholder).to_owned(),
        Some(raw) => raw.display(),
        None if column.kind() == ColumnKind::Icon => icon_mark(true).to_owned(),
        None => String::new(),
    }
}

const fn icon_mark(placeholder: bool) -> &'static str {
    if placeholder {
        ICON_PLACEHOLDER
    } else {
        ICON_PORTRAIT
    }
}

fn header_label(column: Column, sort: Option<(Column, SortDirection)>) -> String {
    match sort {
        Some((active, direction)) if active == column => {
            let mark = match direction {
                SortDirection::Asc => SORT_MARK_ASC,
                SortDirection::Desc => SORT_MARK_DESC,
            };
            format!("{} {mark}", column.label())
        }
        _ => column.label().to_owned(),
    }
}

/// Terminal-side state that the view engine does not own: cursor, search
/// box, filter target, page-size options and the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiState {
    selected_col: usize,
    filter_index: usize,
    query: String,
    search_focused: bool,
    help_visible: bool,
    page_size_options: Vec<PageSize>,
    status_line: Option<String>,
    status_token: u64,
}

impl TuiState {
    pub fn new(page_size_options: Vec<PageSize>) -> Self {
        Self {
            selected_col: 0,
            filter_index: 0,
            query: String::new(),
            search_focused: false,
            help_visible: false,
            page_size_options,
            status_line: None,
            status_token: 0,
        }
    }

    /// Starts the search box on an existing filter, e.g. one given on the
    /// command line.
    pub fn with_filter(mut self, column: Column, query: &str) -> Self {
        if let Some(index) = Column::FILTERABLE.iter().position(|c| *c == column) {
            self.filter_index = index;
        }
        self.query = query.to_owned();
        self
    }

    pub fn selected_column(&self) -> Column {
        Column::ALL[self.selected_col.min(Column::ALL.len() - 1)]
    }

    pub fn filter_column(&self) -> Column {
        Column::FILTERABLE[self.filter_index.min(Column::FILTERABLE.len() - 1)]
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCommand {
    MoveColumn(isize),
    ToggleSort,
    NextPage,
    PreviousPage,
    CyclePageSize(isize),
    FocusSearch,
    CycleFilterColumn(isize),
    ToggleHelp,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

pub fn run_app(controller: &mut ViewController<TableBody>, ui: &mut TuiState) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let (internal_tx, internal_rx) = mpsc::channel();

    if let LoadStatus::Failed(error) = controller.load_status() {
        ui.status_line = Some(format!("load failed: {error}"));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(ui, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, controller, ui)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(controller, ui, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(ui: &mut TuiState, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == ui.status_token => {
                ui.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    ui: &mut TuiState,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    ui.status_line = Some(message.into());
    ui.status_token = ui.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, ui.status_token);
}

fn emit_events(ui: &mut TuiState, internal_tx: &Sender<InternalEvent>, events: &[ViewEvent]) {
    if let Some(message) = events.iter().find_map(ViewEvent::message) {
        emit_status(ui, internal_tx, message);
    }
}

/// Applies one key press. Returns true when the app should quit.
pub fn handle_key_event(
    controller: &mut ViewController<TableBody>,
    ui: &mut TuiState,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if ui.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            ui.help_visible = false;
            emit_status(ui, internal_tx, "help hidden");
        }
        return false;
    }

    if ui.search_focused {
        handle_search_key(controller, ui, internal_tx, key);
        return false;
    }

    let Some(command) = command_for_key(key) else {
        return false;
    };
    apply_key_command(controller, ui, internal_tx, command)
}

fn handle_search_key(
    controller: &mut ViewController<TableBody>,
    ui: &mut TuiState,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Enter, _) => {
            ui.search_focused = false;
            emit_status(ui, internal_tx, "search closed");
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            ui.query.clear();
            apply_filter(controller, ui, internal_tx);
        }
        (KeyCode::Backspace, _) => {
            if ui.query.pop().is_some() {
                apply_filter(controller, ui, internal_tx);
            }
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            ui.query.push(ch);
            apply_filter(controller, ui, internal_tx);
        }
        _ => {}
    }
}

fn apply_filter(
    controller: &mut ViewController<TableBody>,
    ui: &mut TuiState,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = controller.dispatch(ViewCommand::SetFilter {
        column: Some(ui.filter_column()),
        query: ui.query.clone(),
    });
    emit_events(ui, internal_tx, &events);
}

fn command_for_key(key: KeyEvent) -> Option<KeyCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(KeyCommand::MoveColumn(-1)),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(KeyCommand::MoveColumn(1)),
        (KeyCode::Char('s'), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
            Some(KeyCommand::ToggleSort)
        }
        (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::PageDown, _) => {
            Some(KeyCommand::NextPage)
        }
        (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::PageUp, _) => {
            Some(KeyCommand::PreviousPage)
        }
        (KeyCode::Char('+'), _) => Some(KeyCommand::CyclePageSize(1)),
        (KeyCode::Char('-'), _) => Some(KeyCommand::CyclePageSize(-1)),
        (KeyCode::Char('/'), _) => Some(KeyCommand::FocusSearch),
        (KeyCode::Tab, _) => Some(KeyCommand::CycleFilterColumn(1)),
        (KeyCode::BackTab, _) => Some(KeyCommand::CycleFilterColumn(-1)),
        (KeyCode::Char('?'), _) => Some(KeyCommand::ToggleHelp),
        (KeyCode::Char('q'), KeyModifiers::NONE) => Some(KeyCommand::Quit),
        _ => None,
    }
}

fn apply_key_command(
    controller: &mut ViewController<TableBody>,
    ui: &mut TuiState,
    internal_tx: &Sender<InternalEvent>,
    command: KeyCommand,
) -> bool {
    match command {
        KeyCommand::MoveColumn(delta) => {
            ui.selected_col = step_index(ui.selected_col, delta, Column::ALL.len(), false);
        }
        KeyCommand::ToggleSort => {
            let events = controller.dispatch(ViewCommand::ToggleSort(ui.selected_column()));
            emit_events(ui, internal_tx, &events);
        }
        KeyCommand::NextPage => {
            let events = controller.dispatch(ViewCommand::NextPage);
            emit_events(ui, internal_tx, &events);
        }
        KeyCommand::PreviousPage => {
            let events = controller.dispatch(ViewCommand::PreviousPage);
            emit_events(ui, internal_tx, &events);
        }
        KeyCommand::CyclePageSize(delta) => {
            if ui.page_size_options.is_empty() {
                emit_status(ui, internal_tx, "no page size options");
                return false;
            }
            let current = ui
                .page_size_options
                .iter()
                .position(|size| *size == controller.state().page_size);
            let next = match current {
                Some(index) => step_index(index, delta, ui.page_size_options.len(), true),
                None => 0,
            };
            let size = ui.page_size_options[next];
            let events = controller.dispatch(ViewCommand::SetPageSize(size));
            emit_events(ui, internal_tx, &events);
        }
        KeyCommand::FocusSearch => {
            ui.search_focused = true;
            let status = format!("search {}", ui.filter_column().label());
            emit_status(ui, internal_tx, status);
        }
        KeyCommand::CycleFilterColumn(delta) => {
            ui.filter_index = step_index(ui.filter_index, delta, Column::FILTERABLE.len(), true);
            if ui.query.trim().is_empty() {
                let status = format!("filter column {}", ui.filter_column().label());
                emit_status(ui, internal_tx, status);
            } else {
                apply_filter(controller, ui, internal_tx);
            }
        }
        KeyCommand::ToggleHelp => {
            ui.help_visible = true;
            emit_status(ui, internal_tx, "help shown");
        }
        KeyCommand::Quit => return true,
    }
    false
}

fn step_index(current: usize, delta: isize, len: usize, wrap: bool) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    if wrap {
        next.rem_euclid(len as isize) as usize
    } else {
        next.clamp(0, len as isize - 1) as usize
    }
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    controller: &ViewController<TableBody>,
    ui: &TuiState,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let search_style = if ui.search_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let search = Paragraph::new(search_text(ui))
        .style(search_style)
        .block(Block::default().title("heroview").borders(Borders::ALL));
    frame.render_widget(search, layout[0]);

    render_table(frame, layout[1], controller, ui);

    let status = Paragraph::new(status_text(ui))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if ui.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    controller: &ViewController<TableBody>,
    ui: &TuiState,
) {
    let body = controller.presenter();
    let widths = Column::ALL.map(column_width);

    let header_cells = Column::ALL.iter().enumerate().map(|(index, column)| {
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if index == ui.selected_col {
            style = style.fg(Color::Black).bg(Color::Cyan);
        }
        Cell::from(header_label(*column, body.sort)).style(style)
    });
    let header = Row::new(header_cells);

    let rows = body.rows.iter().map(|row| {
        let cells = row.cells.iter().enumerate().map(|(index, cell)| {
            let style = if index == ui.selected_col {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            Cell::from(cell.clone()).style(style)
        });
        Row::new(cells)
    });

    let title = match controller.load_status() {
        LoadStatus::Failed(_) => " no records: dataset load failed ".to_owned(),
        LoadStatus::Loaded { .. } => body.title(),
    };
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn column_width(column: Column) -> Constraint {
    match column.kind() {
        ColumnKind::Icon => Constraint::Length(4),
        ColumnKind::NumericStat => Constraint::Min(5),
        ColumnKind::DualUnit => Constraint::Min(8),
        ColumnKind::TextDirect | ColumnKind::TextBiography | ColumnKind::TextAppearance => {
            Constraint::Min(8)
        }
    }
}

fn search_text(ui: &TuiState) -> String {
    let cursor = if ui.search_focused { SEARCH_CURSOR } else { "" };
    format!("filter [{}]: {}{cursor}", ui.filter_column().label(), ui.query)
}

fn status_text(ui: &TuiState) -> String {
    if ui.help_visible {
        return String::new();
    }
    let default = if ui.search_focused {
        "type to filter | ctrl+u clear | esc/enter done"
    } else {
        "h/l col | s sort | n/p page | +/- size | / search | tab filter col | ? help | q quit"
    };
    match &ui.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default.to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "columns: h/l or left/right move | s or enter sort (toggles asc/desc)\n\
pages: n/p or pgdn/pgup | +/- cycle page size\n\
filter: / focus search | tab/shift+tab filter column | ctrl+u clear | esc/enter leave\n\
global: ? help | q or ctrl+q quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}
