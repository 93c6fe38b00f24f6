//! Client library for the FACET departments academic-records API.
//!
//! `listing` holds the list-page machinery (filters, pagination, export),
//! `forms` the create/edit/delete submissions with their client-side checks.
pub mod api_client;
pub mod error;
pub mod facet_api;
pub mod forms;
pub mod helpers;
pub mod listing;
pub mod models;
pub mod run_tool;

pub use error::{FacetError, Result};
