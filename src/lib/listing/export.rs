//! Bulk export: walk every page of a filtered listing, then flatten it into
//! one sheet.
use std::{collections::HashSet, path::PathBuf};

use log::{info, warn};
use serde::de::DeserializeOwned;

use crate::{
    error::Result,
    facet_api::FacetApi,
    helpers::log_page,
    listing::{
        query::{filtered_url, FilterSet},
        sheet_writer::SheetWriter,
    },
    models::Entity,
};

pub const EXPORT_ERROR_MESSAGE: &str = "Se produjo un error al exportar los datos.";

/// Tabular projection handed to a [`SheetWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn project<T: Entity>(records: &[T]) -> Sheet {
        Sheet {
            name: T::SHEET_NAME.to_string(),
            headers: T::HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: records.iter().map(T::row).collect(),
        }
    }
}

/// Follows `next` from `first_url` until the server stops sending one.
/// The first failing page aborts the whole walk.
pub async fn collect_all<A: FacetApi, T: DeserializeOwned>(
    api: &A,
    first_url: &str,
) -> Result<Vec<T>> {
    let mut records = Vec::new();
    let mut expected = None;
    let mut visited = HashSet::new();
    let mut next = Some(first_url.to_string());

    while let Some(url) = next.take() {
        if !visited.insert(url.clone()) {
            warn!("Listing links back to {}, stopping", url);
            break;
        }
        let page = api.get_page::<T>(&url).await?;
        log_page(&url, &page);
        expected.get_or_insert(page.count);
        records.extend(page.results);
        next = page.next;
    }

    match expected {
        Some(count) if count != records.len() as u64 => warn!(
            "Collected {} records but the listing announced {}",
            records.len(),
            count
        ),
        _ => info!("Collected {} records from {}", records.len(), first_url),
    }
    Ok(records)
}

/// Exports every `T` matching `filters`, ignoring pagination, and returns
/// where the writer put the file.
pub async fn export_listing<A: FacetApi, W: SheetWriter, T: Entity>(
    api: &A,
    writer: &W,
    filters: &FilterSet,
) -> Result<PathBuf> {
    let url = filtered_url::<T>(filters)?;
    let records = collect_all::<A, T>(api, &url).await?;
    let sheet = Sheet::project(&records);
    writer.write_sheet(&sheet, T::FILE_NAME)
}
