//! State of one list page: the records on screen, the cursor links and the
//! page counter.
//!
//! Every fetch is an explicit call. Each call takes a [`FetchTicket`]
//! carrying a generation number, and a response is only applied when its
//! ticket is the most recent one issued by the view, so a slow response to
//! an older click cannot overwrite a newer page.
use std::path::PathBuf;

use log::{debug, warn};

use crate::{
    error::Result,
    facet_api::FacetApi,
    forms::delete_record,
    listing::{
        export::export_listing,
        query::{filtered_url, FilterSet},
        sheet_writer::SheetWriter,
    },
    models::{Entity, Page},
};

pub const FETCH_ERROR_MESSAGE: &str = "Error al obtener los datos.";

/// What the user sees: replaced as a whole by a successful fetch, untouched
/// by a failed one.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    pub url: String,
    pub records: Vec<T>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub count: u64,
    pub current_page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Fetching,
    Displayed,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Filter or clear: the page counter restarts at 1.
    Fresh,
    Next,
    Previous,
    /// Same URL again, e.g. after a delete.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub url: String,
    pub navigation: Navigation,
}

#[derive(Debug)]
pub struct ListView<T: Entity> {
    page_size: u32,
    filters: FilterSet,
    state: PageState<T>,
    status: ViewStatus,
    generation: u64,
}

impl<T: Entity> ListView<T> {
    pub fn new(page_size: u32) -> Self {
        ListView {
            page_size: page_size.max(1),
            filters: FilterSet::default(),
            state: PageState {
                url: T::LISTING.to_string(),
                records: Vec::new(),
                next: None,
                previous: None,
                count: 0,
                current_page: 1,
            },
            status: ViewStatus::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &PageState<T> {
        &self.state
    }

    pub fn records(&self) -> &[T] {
        &self.state.records
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// The filter inputs; they only reach the server on the next
    /// [`ListView::apply_filters`].
    pub fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    pub fn current_page(&self) -> u32 {
        self.state.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.state.count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        self.state.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.state.previous.is_some()
    }

    fn issue(&mut self, url: String, navigation: Navigation) -> FetchTicket {
        self.generation += 1;
        self.status = ViewStatus::Fetching;
        debug!("Issuing fetch #{} ({:?}) for {}", self.generation, navigation, url);
        FetchTicket {
            generation: self.generation,
            url,
            navigation,
        }
    }

    /// Ticket for the listing matching the current filter inputs.
    pub fn begin_filter(&mut self) -> Result<FetchTicket> {
        let url = filtered_url::<T>(&self.filters)?;
        Ok(self.issue(url, Navigation::Fresh))
    }

    /// Resets the filter inputs and targets the default listing.
    pub fn begin_clear(&mut self) -> FetchTicket {
        self.filters.clear();
        self.issue(T::LISTING.to_string(), Navigation::Fresh)
    }

    pub fn begin_next(&mut self) -> Option<FetchTicket> {
        let url = self.state.next.clone()?;
        Some(self.issue(url, Navigation::Next))
    }

    pub fn begin_previous(&mut self) -> Option<FetchTicket> {
        let url = self.state.previous.clone()?;
        Some(self.issue(url, Navigation::Previous))
    }

    pub fn begin_reload(&mut self) -> FetchTicket {
        let url = self.state.url.clone();
        self.issue(url, Navigation::Reload)
    }

    /// Applies the outcome of `ticket`'s request.
    ///
    /// Returns `Ok(false)` when the ticket has been superseded and the
    /// outcome was dropped. A failure of the current ticket is returned as is
    /// and leaves [`ListView::state`] unchanged.
    pub fn complete(&mut self, ticket: FetchTicket, outcome: Result<Page<T>>) -> Result<bool> {
        if ticket.generation != self.generation {
            warn!(
                "Dropping stale response #{} for {}, #{} is current",
                ticket.generation, ticket.url, self.generation
            );
            return Ok(false);
        }

        let page = match outcome {
            Ok(page) => page,
            Err(err) => {
                self.status = ViewStatus::Error(err.user_message(FETCH_ERROR_MESSAGE));
                return Err(err);
            }
        };

        let current_page = match ticket.navigation {
            Navigation::Fresh => 1,
            Navigation::Next => self.state.current_page + 1,
            Navigation::Previous => self.state.current_page.saturating_sub(1).max(1),
            Navigation::Reload => self.state.current_page,
        };
        debug!(
            "Showing page {} of {} ({} records) from {}",
            current_page,
            page.count.div_ceil(u64::from(self.page_size)),
            page.results.len(),
            ticket.url
        );
        self.state = PageState {
            url: ticket.url,
            records: page.results,
            next: page.next,
            previous: page.previous,
            count: page.count,
            current_page,
        };
        self.status = ViewStatus::Displayed;
        Ok(true)
    }

    async fn fetch<A: FacetApi>(&mut self, api: &A, ticket: FetchTicket) -> Result<bool> {
        let outcome = api.get_page::<T>(&ticket.url).await;
        self.complete(ticket, outcome)
    }

    pub async fn apply_filters<A: FacetApi>(&mut self, api: &A) -> Result<bool> {
        let ticket = self.begin_filter()?;
        self.fetch(api, ticket).await
    }

    pub async fn clear_filters<A: FacetApi>(&mut self, api: &A) -> Result<bool> {
        let ticket = self.begin_clear();
        self.fetch(api, ticket).await
    }

    /// No-op returning `Ok(false)` on the last page.
    pub async fn next_page<A: FacetApi>(&mut self, api: &A) -> Result<bool> {
        match self.begin_next() {
            Some(ticket) => self.fetch(api, ticket).await,
            None => Ok(false),
        }
    }

    /// No-op returning `Ok(false)` on the first page.
    pub async fn previous_page<A: FacetApi>(&mut self, api: &A) -> Result<bool> {
        match self.begin_previous() {
            Some(ticket) => self.fetch(api, ticket).await,
            None => Ok(false),
        }
    }

    pub async fn reload<A: FacetApi>(&mut self, api: &A) -> Result<bool> {
        let ticket = self.begin_reload();
        self.fetch(api, ticket).await
    }

    /// Deletes a record and re-fetches the page it was shown on.
    pub async fn delete<A: FacetApi>(&mut self, api: &A, id: u32) -> Result<bool> {
        delete_record::<A, T>(api, id).await?;
        self.reload(api).await
    }

    /// Exports every record matching the current filter inputs.
    pub async fn export<A: FacetApi, W: SheetWriter>(&self, api: &A, writer: &W) -> Result<PathBuf> {
        export_listing::<A, W, T>(api, writer, &self.filters).await
    }
}
