//! List pages: filter set → query string → paginated fetch → export.
pub mod export;
pub mod list_view;
pub mod query;
pub mod sheet_writer;

#[cfg(test)]
#[path = "listing/tests/tests.rs"]
mod tests;
