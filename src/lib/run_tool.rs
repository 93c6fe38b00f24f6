use std::path::PathBuf;

use log::info;

use crate::{
    error::Result,
    facet_api::FacetApi,
    listing::{list_view::ListView, query::FilterSet, sheet_writer::SheetWriter},
    models::{Config, Entity},
};

/// Opens the list page of `T` with `filters` applied and walks forward to
/// `page`, stopping early on the last one.
pub async fn run_list<A: FacetApi, T: Entity>(
    api: &A,
    config: &Config,
    filters: FilterSet,
    page: u32,
) -> Result<ListView<T>> {
    let mut view = ListView::<T>::new(config.page_size);
    *view.filters_mut() = filters;
    view.apply_filters(api).await?;
    while view.current_page() < page && view.next_page(api).await? {}
    info!(
        "Showing page {} of {} for {}",
        view.current_page(),
        view.total_pages(),
        T::SHEET_NAME
    );
    Ok(view)
}

pub async fn run_export<A: FacetApi, W: SheetWriter, T: Entity>(
    api: &A,
    writer: &W,
    config: &Config,
    filters: FilterSet,
) -> Result<PathBuf> {
    let mut view = ListView::<T>::new(config.page_size);
    *view.filters_mut() = filters;
    view.export(api, writer).await
}

/// Tab-separated table of the records on screen plus the page counter.
pub fn render_table<T: Entity>(view: &ListView<T>) -> String {
    let mut lines = vec![T::HEADERS.join("\t")];
    lines.extend(view.records().iter().map(|record| record.row().join("\t")));
    lines.push(format!(
        "Página {} de {}",
        view.current_page(),
        view.total_pages()
    ));
    lines.join("\n")
}
