// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use heroview_api::Client;
use heroview_app::{
    Column, DatasetSource, PageSize, Presenter, Record, ViewCommand, ViewController,
};
use heroview_testkit::HeroFaker;

use crate::config::Config;

const DEMO_SEED: u64 = 1940;
const DEMO_RECORDS: usize = 731;

/// Generated dataset for `--demo`; never touches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSource {
    seed: u64,
    count: usize,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self {
            seed: DEMO_SEED,
            count: DEMO_RECORDS,
        }
    }
}

impl DatasetSource for DemoSource {
    fn fetch_all(&self) -> Result<Vec<Record>> {
        tracing::info!(seed = self.seed, records = self.count, "generating demo dataset");
        Ok(HeroFaker::new(self.seed).dataset(self.count))
    }
}

pub fn dataset_source(config: &Config, demo: bool) -> Result<Box<dyn DatasetSource>> {
    if demo {
        return Ok(Box::new(DemoSource::default()));
    }
    let url = config.source_url();
    let client = Client::new(&url, config.source_timeout()?)
        .context("invalid [source] config; fix url/timeout values")?;
    Ok(Box::new(client))
}

/// View adjustments requested on the command line, applied after load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialView {
    pub page_size: Option<PageSize>,
    pub filter: Option<(Column, String)>,
    pub sorts: Vec<Column>,
    pub page: Option<usize>,
}

impl InitialView {
    /// Filter first, since it resets the page, then header clicks in order,
    /// then paging forward.
    pub fn apply<P: Presenter>(&self, controller: &mut ViewController<P>) {
        if let Some((column, query)) = &self.filter {
            controller.dispatch(ViewCommand::SetFilter {
                column: Some(*column),
                query: query.clone(),
            });
        }
        for column in &self.sorts {
            controller.dispatch(ViewCommand::ToggleSort(*column));
        }
        if let Some(page) = self.page {
            let target = page.min(controller.page_count());
            while controller.state().current_page < target {
                controller.dispatch(ViewCommand::NextPage);
            }
        }
    }
}

/// Fetches the dataset once, propagating any failure.
pub fn check(source: &dyn DatasetSource) -> Result<usize> {
    let records = source
        .fetch_all()
        .context("fetch dataset; check [source].url and network access")?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::{DemoSource, InitialView, check};
    use heroview_app::{
        Column, DEFAULT_PAGE_SIZE, DatasetSource, PageSlice, Presenter, SortDirection,
        ViewController,
    };

    #[derive(Default)]
    struct Ids(Vec<i64>);

    impl Presenter for Ids {
        fn render(&mut self, slice: &PageSlice<'_>) {
            self.0 = slice.rows.iter().map(|record| record.id.get()).collect();
        }
    }

    #[test]
    fn demo_source_is_stable_across_fetches() -> anyhow::Result<()> {
        let source = DemoSource::default();
        let first = source.fetch_all()?;
        assert_eq!(first.len(), 731);
        assert_eq!(first, source.fetch_all()?);
        assert_eq!(check(&source)?, 731);
        Ok(())
    }

    #[test]
    fn initial_view_applies_filter_sorts_and_page() {
        let mut controller =
            ViewController::load(&DemoSource::default(), DEFAULT_PAGE_SIZE, Ids::default());
        let initial = InitialView {
            page_size: None,
            filter: Some((Column::Alignment, "good".to_owned())),
            sorts: vec![Column::Name, Column::Name],
            page: Some(3),
        };
        initial.apply(&mut controller);

        let state = controller.state();
        assert_eq!(state.filter_column, Some(Column::Alignment));
        assert_eq!(state.sort_column, Some(Column::Name));
        assert_eq!(state.sort_direction, SortDirection::Desc);
        assert_eq!(state.current_page, 3.min(controller.page_count()));
    }

    #[test]
    fn initial_page_is_clamped_to_page_count() {
        let mut controller =
            ViewController::load(&DemoSource::default(), DEFAULT_PAGE_SIZE, Ids::default());
        let initial = InitialView {
            page: Some(10_000),
            ..InitialView::default()
        };
        initial.apply(&mut controller);
        assert_eq!(controller.state().current_page, controller.page_count());
        assert!(!controller.presenter().0.is_empty());
    }
}
