// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::filter::filter;
use crate::model::{Column, Record, SortDirection};
use crate::sort::{SortToggles, sort};
use crate::state::{PageSize, ViewCommand, ViewEvent, ViewState};

/// Supplies the full dataset once, at load.
pub trait DatasetSource {
    fn fetch_all(&self) -> Result<Vec<Record>>;
}

/// Receives every recomputed page. Each call replaces whatever the previous
/// call rendered.
pub trait Presenter {
    fn render(&mut self, slice: &PageSlice<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice<'a> {
    pub rows: &'a [&'a Record],
    pub row_count: usize,
    pub matched: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: PageSize,
    pub sort: Option<(Column, SortDirection)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded { records: usize },
    Failed(String),
}

/// Owns the dataset and the view state, and re-renders the visible page
/// after every transition.
///
/// The pipeline is always filter, then sort, then paginate, evaluated from
/// the raw dataset. A sort therefore survives filter changes, and paging
/// bounds always come from the filtered set.
pub struct ViewController<P> {
    dataset: Vec<Record>,
    state: ViewState,
    toggles: SortToggles,
    presenter: P,
    load_status: LoadStatus,
    matched: usize,
    page_count: usize,
}

impl<P: Presenter> ViewController<P> {
    pub fn new(dataset: Vec<Record>, page_size: PageSize, presenter: P) -> Self {
        let load_status = LoadStatus::Loaded {
            records: dataset.len(),
        };
        let mut controller = Self {
            dataset,
            state: ViewState::new(page_size),
            toggles: SortToggles::default(),
            presenter,
            load_status,
            matched: 0,
            page_count: 1,
        };
        controller.recompute();
        controller
    }

    /// Fetches the dataset and renders the first page. A failed fetch leaves
    /// the controller with no records and the failure in [`LoadStatus`].
    pub fn load<S>(source: &S, page_size: PageSize, presenter: P) -> Self
    where
        S: DatasetSource + ?Sized,
    {
        match source.fetch_all() {
            Ok(records) => {
                tracing::info!(records = records.len(), "dataset loaded");
                Self::new(records, page_size, presenter)
            }
            Err(error) => {
                let message = format!("{error:#}");
                tracing::error!(error = %message, "dataset fetch failed");
                let mut controller = Self::new(Vec::new(), page_size, presenter);
                controller.load_status = LoadStatus::Failed(message);
                controller
            }
        }
    }

    pub fn dispatch(&mut self, command: ViewCommand) -> Vec<ViewEvent> {
        match command {
            ViewCommand::SetPageSize(size) => self.on_page_size_change(size),
            ViewCommand::NextPage => self.on_page_next(),
            ViewCommand::PreviousPage => self.on_page_previous(),
            ViewCommand::SetFilter { column, query } => self.on_filter_change(column, &query),
            ViewCommand::ToggleSort(column) => self.on_sort_toggle(column),
        }
    }

    pub fn on_page_size_change(&mut self, page_size: PageSize) -> Vec<ViewEvent> {
        self.state.page_size = page_size;
        self.state.current_page = 1;
        vec![ViewEvent::PageSizeChanged(page_size), self.recompute()]
    }

    pub fn on_page_next(&mut self) -> Vec<ViewEvent> {
        let page_count = self.state.page_size.page_count(self.matched);
        self.move_page(self.state.current_page.saturating_add(1).min(page_count))
    }

    pub fn on_page_previous(&mut self) -> Vec<ViewEvent> {
        self.move_page(self.state.current_page.saturating_sub(1).max(1))
    }

    pub fn on_filter_change(&mut self, column: Option<Column>, query: &str) -> Vec<ViewEvent> {
        self.state.filter_column = column;
        self.state.filter_query = query.to_owned();
        self.state.current_page = 1;
        let rendered = self.recompute();
        vec![
            ViewEvent::FilterApplied {
                column,
                query: query.to_owned(),
                matched: self.matched,
            },
            rendered,
        ]
    }

    pub fn on_sort_toggle(&mut self, column: Column) -> Vec<ViewEvent> {
        let direction = self.toggles.toggle(column);
        self.state.sort_column = Some(column);
        self.state.sort_direction = direction;
        vec![
            ViewEvent::SortChanged { column, direction },
            self.recompute(),
        ]
    }

    fn move_page(&mut self, page: usize) -> Vec<ViewEvent> {
        let changed = page != self.state.current_page;
        self.state.current_page = page;
        let rendered = self.recompute();
        if changed {
            vec![
                ViewEvent::PageChanged {
                    page: self.state.current_page,
                    page_count: self.page_count,
                },
                rendered,
            ]
        } else {
            vec![rendered]
        }
    }

    fn recompute(&mut self) -> ViewEvent {
        let ordered = ordered_view(&self.dataset, &self.state);
        let matched = ordered.len();
        let page_count = self.state.page_size.page_count(matched);
        self.state.current_page = self.state.current_page.clamp(1, page_count);

        let (start, end) = self.state.page_size.bounds(self.state.current_page, matched);
        let rows = &ordered[start..end];
        self.presenter.render(&PageSlice {
            rows,
            row_count: rows.len(),
            matched,
            page: self.state.current_page,
            page_count,
            page_size: self.state.page_size,
            sort: self.state.sort_column.map(|column| (column, self.state.sort_direction)),
        });

        self.matched = matched;
        self.page_count = page_count;
        tracing::debug!(
            page = self.state.current_page,
            page_count,
            matched,
            rows = rows.len(),
            sort = ?self.state.sort_column,
            "view recomputed"
        );
        ViewEvent::Rendered {
            rows: end - start,
            matched,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn dataset(&self) -> &[Record] {
        &self.dataset
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn header_direction(&self, column: Column) -> SortDirection {
        self.toggles.direction(column)
    }

    /// The whole filtered and sorted sequence, across all pages.
    pub fn ordered(&self) -> Vec<&Record> {
        ordered_view(&self.dataset, &self.state)
    }
}

fn ordered_view<'a>(dataset: &'a [Record], state: &ViewState) -> Vec<&'a Record> {
    let filtered = filter(dataset, state.filter_column, &state.filter_query);
    match state.sort_column {
        Some(column) => sort(&filtered, column, state.sort_direction),
        None => filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetSource, LoadStatus, PageSlice, Presenter, ViewController};
    use crate::model::{Column, Record, SortDirection};
    use crate::state::{DEFAULT_PAGE_SIZE, PageSize, ViewCommand, ViewEvent};
    use anyhow::{Result, bail};

    #[derive(Debug, Default)]
    struct RecordingPresenter {
        renders: usize,
        ids: Vec<i64>,
        row_count: usize,
        page: usize,
        page_count: usize,
    }

    impl Presenter for RecordingPresenter {
        fn render(&mut self, slice: &PageSlice<'_>) {
            self.renders += 1;
            self.ids = slice.rows.iter().map(|record| record.id.get()).collect();
            self.row_count = slice.row_count;
            self.page = slice.page;
            self.page_count = slice.page_count;
        }
    }

    struct FailingSource;

    impl DatasetSource for FailingSource {
        fn fetch_all(&self) -> Result<Vec<Record>> {
            bail!("connection refused")
        }
    }

    fn numbered(count: i64) -> Vec<Record> {
        (1..=count)
            .map(|id| {
                let mut record = Record::new(id, &format!("hero {id:02}"));
                record.powerstats.strength = Some(id % 7);
                record
            })
            .collect()
    }

    fn controller(count: i64) -> ViewController<RecordingPresenter> {
        ViewController::new(
            numbered(count),
            DEFAULT_PAGE_SIZE,
            RecordingPresenter::default(),
        )
    }

    #[test]
    fn initial_render_shows_first_page() {
        let view = controller(25);
        assert_eq!(view.presenter().renders, 1);
        assert_eq!(view.presenter().ids, (1..=20).collect::<Vec<_>>());
        assert_eq!(view.presenter().page_count, 2);
        assert_eq!(view.state().current_page, 1);
    }

    #[test]
    fn next_shows_short_last_page_then_clamps() {
        let mut view = controller(25);

        let events = view.dispatch(ViewCommand::NextPage);
        assert_eq!(
            events,
            vec![
                ViewEvent::PageChanged {
                    page: 2,
                    page_count: 2,
                },
                ViewEvent::Rendered {
                    rows: 5,
                    matched: 25,
                },
            ]
        );
        assert_eq!(view.presenter().ids, (21..=25).collect::<Vec<_>>());
        assert_eq!(view.presenter().row_count, 5);

        let events = view.dispatch(ViewCommand::NextPage);
        assert_eq!(
            events,
            vec![ViewEvent::Rendered {
                rows: 5,
                matched: 25,
            }]
        );
        assert_eq!(view.state().current_page, 2);
    }

    #[test]
    fn previous_on_first_page_is_a_no_op() {
        let mut view = controller(25);
        view.dispatch(ViewCommand::PreviousPage);
        assert_eq!(view.state().current_page, 1);
        assert_eq!(view.presenter().ids, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn filter_resets_page_and_bounds_follow_filtered_set() {
        let mut view = controller(60);
        view.dispatch(ViewCommand::NextPage);
        view.dispatch(ViewCommand::NextPage);
        assert_eq!(view.state().current_page, 3);

        view.dispatch(ViewCommand::SetFilter {
            column: Some(Column::Strength),
            query: "3".to_owned(),
        });
        assert_eq!(view.state().current_page, 1);
        assert_eq!(view.matched(), 9);
        assert_eq!(view.page_count(), 1);

        view.dispatch(ViewCommand::NextPage);
        assert_eq!(view.state().current_page, 1);
    }

    #[test]
    fn sort_keeps_page_and_survives_filter_changes() {
        let mut view = controller(45);
        view.dispatch(ViewCommand::NextPage);

        let events = view.dispatch(ViewCommand::ToggleSort(Column::Name));
        assert_eq!(
            events[0],
            ViewEvent::SortChanged {
                column: Column::Name,
                direction: SortDirection::Asc,
            }
        );
        assert_eq!(view.state().current_page, 2);

        view.dispatch(ViewCommand::ToggleSort(Column::Name));
        assert_eq!(view.state().sort_direction, SortDirection::Desc);
        assert_eq!(view.presenter().ids, (6..=25).rev().collect::<Vec<_>>());

        view.dispatch(ViewCommand::SetFilter {
            column: Some(Column::Name),
            query: "hero 1".to_owned(),
        });
        assert_eq!(view.presenter().ids, (10..=19).rev().collect::<Vec<_>>());
        assert_eq!(view.state().sort_column, Some(Column::Name));
    }

    #[test]
    fn each_header_keeps_its_own_direction() {
        let mut view = controller(5);
        view.dispatch(ViewCommand::ToggleSort(Column::Name));
        view.dispatch(ViewCommand::ToggleSort(Column::Strength));
        assert_eq!(view.state().sort_direction, SortDirection::Asc);
        assert_eq!(view.header_direction(Column::Name), SortDirection::Asc);

        view.dispatch(ViewCommand::ToggleSort(Column::Name));
        assert_eq!(view.state().sort_column, Some(Column::Name));
        assert_eq!(view.state().sort_direction, SortDirection::Desc);
    }

    #[test]
    fn page_size_change_resets_to_first_page() {
        let mut view = controller(45);
        view.dispatch(ViewCommand::NextPage);

        let events = view.dispatch(ViewCommand::SetPageSize(PageSize::All));
        assert_eq!(events[0], ViewEvent::PageSizeChanged(PageSize::All));
        assert_eq!(view.state().current_page, 1);
        assert_eq!(view.presenter().row_count, 45);
        assert_eq!(view.page_count(), 1);
    }

    #[test]
    fn failed_load_degrades_to_empty_view() {
        let view = ViewController::load(
            &FailingSource,
            DEFAULT_PAGE_SIZE,
            RecordingPresenter::default(),
        );
        assert_eq!(
            view.load_status(),
            &LoadStatus::Failed("connection refused".to_owned())
        );
        assert!(view.dataset().is_empty());
        assert_eq!(view.presenter().renders, 1);
        assert_eq!(view.presenter().row_count, 0);
        assert_eq!(view.page_count(), 1);
    }
}
