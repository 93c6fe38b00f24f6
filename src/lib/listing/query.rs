//! Turns the filter fields of a list page into the listing URL.
use std::{collections::BTreeMap, str::FromStr};

use chrono::NaiveDate;
use log::warn;
use reqwest::Url;

use crate::{
    error::{FacetError, Result},
    models::{Entity, Estado, FilterArgs, FilterField, FilterKind},
};

/// Only lends `Url` its query encoder; it never leaves this module.
const PLACEHOLDER_ORIGIN: &str = "http://localhost";

/// The three settings of the state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstadoFilter {
    /// Nothing sent, the server lists active records only.
    #[default]
    Default,
    Only(Estado),
    /// `show_all=true`, no `estado` parameter.
    All,
}

impl FromStr for EstadoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(EstadoFilter::Default),
            "todos" | "all" => Ok(EstadoFilter::All),
            other => other.parse().map(EstadoFilter::Only),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Date(NaiveDate),
}

/// Current value of every filter field of a list page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
    values: BTreeMap<String, FilterValue>,
    pub estado: EstadoFilter,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_date(mut self, name: &str, date: NaiveDate) -> Self {
        self.set_date(name, date);
        self
    }

    pub fn with_estado(mut self, estado: EstadoFilter) -> Self {
        self.estado = estado;
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .insert(name.to_string(), FilterValue::Text(value.into()));
    }

    pub fn set_date(&mut self, name: &str, date: NaiveDate) {
        self.values.insert(name.to_string(), FilterValue::Date(date));
    }

    pub fn remove(&mut self, name: &str) {
        self.values.remove(name);
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.values.get(name)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl From<FilterArgs> for FilterSet {
    fn from(args: FilterArgs) -> Self {
        let mut filters = FilterSet::new().with_estado(args.estado.unwrap_or_default());
        for (name, value) in args.filters {
            filters.set(&name, value);
        }
        filters
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Query parameters for `filters`, in the order `fields` declares them, the
/// state parameter last. Blank values are left out.
pub fn query_pairs(
    fields: &[FilterField],
    has_estado: bool,
    filters: &FilterSet,
) -> Vec<(&'static str, String)> {
    for name in filters.values.keys() {
        if !fields.iter().any(|field| field.name == name.as_str()) {
            warn!("Ignoring unknown filter `{}`", name);
        }
    }

    let mut pairs = Vec::new();
    for field in fields {
        let value = match (filters.get(field.name), field.kind) {
            (None, _) => continue,
            (Some(FilterValue::Date(date)), _) => date.format("%Y-%m-%d").to_string(),
            (Some(FilterValue::Text(text)), FilterKind::Date) => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                match parse_date(text) {
                    Some(date) => date.format("%Y-%m-%d").to_string(),
                    None => {
                        warn!("Ignoring invalid date `{}` for `{}`", text, field.name);
                        continue;
                    }
                }
            }
            (Some(FilterValue::Text(text)), _) => text.trim().to_string(),
        };
        if !value.is_empty() {
            pairs.push((field.param, value));
        }
    }

    if has_estado {
        match filters.estado {
            EstadoFilter::Default => {}
            EstadoFilter::Only(estado) => pairs.push(("estado", estado.as_param().to_string())),
            EstadoFilter::All => pairs.push(("show_all", "true".to_string())),
        }
    }
    pairs
}

/// `endpoint` with `pairs` form-encoded as its query string. The result
/// stays relative to the API base.
pub fn build_url(endpoint: &str, pairs: &[(&str, String)]) -> Result<String> {
    if pairs.is_empty() {
        return Ok(endpoint.to_string());
    }
    let url = Url::parse_with_params(&format!("{PLACEHOLDER_ORIGIN}{endpoint}"), pairs)
        .map_err(|err| FacetError::InvalidUrl(format!("{endpoint}: {err}")))?;
    Ok(format!("{}?{}", url.path(), url.query().unwrap_or_default()))
}

/// Listing URL of `T` for the given filters.
pub fn filtered_url<T: Entity>(filters: &FilterSet) -> Result<String> {
    build_url(T::LISTING, &query_pairs(T::FILTERS, T::HAS_ESTADO, filters))
}
