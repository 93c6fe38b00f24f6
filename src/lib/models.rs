use std::{fmt::Debug, path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand, ValueEnum};
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{error::Result, listing::query::EstadoFilter};

pub mod asignatura_model;
pub mod departamento_model;
pub mod persona_model;
pub mod resolucion_model;
pub mod usuario_model;

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Path to config.json, that tells where the API lives and how to talk to it.
/// 2. Verbosity switch for the logger.
/// 3. The action to perform.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[arg(short, long)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of a filtered listing.
    List {
        entity: EntityKind,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Write every record of a filtered listing into an .xlsx file.
    Export {
        entity: EntityKind,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print a single record.
    Show { entity: EntityKind, id: u32 },
    /// Delete a single record.
    Delete { entity: EntityKind, id: u32 },
    /// Register a person as a teacher, refusing duplicates.
    CreateDocente {
        #[arg(long)]
        persona: u32,
        #[arg(long, default_value = "")]
        observaciones: String,
        #[arg(long, default_value = "1")]
        estado: Estado,
    },
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Filter as NAME=VALUE, e.g. `--filter apellido=Perez`.
    #[arg(long = "filter", value_name = "NAME=VALUE", value_parser = parse_filter_arg)]
    pub filters: Vec<(String, String)>,
    /// `1`, `0` or `todos`. Omitted means active records only.
    #[arg(long)]
    pub estado: Option<EstadoFilter>,
}

fn parse_filter_arg(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Personas,
    Docentes,
    #[value(name = "nodocentes")]
    NoDocentes,
    Jefes,
    Resoluciones,
    AsignaturasDocentes,
    Departamentos,
    Usuarios,
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Base URL of the API server, without path
/// 2. Token sent as `Authorization: Bearer`, if the server wants one
/// 3. Page size the server paginates with
/// 4. Directory spreadsheets are written to
/// 5. Per-request timeout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_page_size() -> u32 {
    10
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Reads the JSON file, then lets `FACET_*` environment variables override it.
    pub fn load(args: &Args) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Json::file(&args.config_json_path))
            .merge(Env::prefixed("FACET_"))
            .extract()?;
        info!(
            "Read config.json from {}",
            std::path::absolute(&args.config_json_path)?.display()
        );
        Ok(config)
    }
}

/// Binary active/inactive flag carried by every record.
///
/// The API is not consistent about its encoding: most serializers send
/// `0`/`1`, department heads send `"0"`/`"1"`. Both are accepted, `null`
/// reads as the default, integers are sent back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Option<RawEstado>", into = "u8")]
pub enum Estado {
    #[default]
    Activo,
    Inactivo,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEstado {
    Number(i64),
    Text(String),
}

impl TryFrom<Option<RawEstado>> for Estado {
    type Error = String;

    fn try_from(raw: Option<RawEstado>) -> Result<Self, Self::Error> {
        match raw {
            None => Ok(Estado::default()),
            Some(RawEstado::Number(1)) => Ok(Estado::Activo),
            Some(RawEstado::Number(0)) => Ok(Estado::Inactivo),
            Some(RawEstado::Text(text)) => text.parse(),
            Some(RawEstado::Number(other)) => Err(format!("unknown estado {other}")),
        }
    }
}

impl From<Estado> for u8 {
    fn from(estado: Estado) -> u8 {
        match estado {
            Estado::Activo => 1,
            Estado::Inactivo => 0,
        }
    }
}

impl FromStr for Estado {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "activo" => Ok(Estado::Activo),
            "0" | "inactivo" => Ok(Estado::Inactivo),
            other => Err(format!("unknown estado `{other}`")),
        }
    }
}

impl Estado {
    pub fn label(self) -> &'static str {
        match self {
            Estado::Activo => "Activo",
            Estado::Inactivo => "Inactivo",
        }
    }

    /// Value of the `estado` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            Estado::Activo => "1",
            Estado::Inactivo => "0",
        }
    }
}

/// One page of a paginated listing, as the API sends it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Catalogue endpoints answer either a bare array or a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Catalogue<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> Catalogue<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Catalogue::Paged(page) => page.results,
            Catalogue::Plain(items) => items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Free text, usually an `__icontains` lookup.
    Text,
    /// Passed through untouched, e.g. an id or an enum value.
    Exact,
    /// Calendar date, sent as `YYYY-MM-DD`.
    Date,
}

/// Maps a filter field shown to the user onto the API query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub param: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn text(name: &'static str, param: &'static str) -> Self {
        FilterField {
            name,
            param,
            kind: FilterKind::Text,
        }
    }

    pub const fn exact(name: &'static str, param: &'static str) -> Self {
        FilterField {
            name,
            param,
            kind: FilterKind::Exact,
        }
    }

    pub const fn date(name: &'static str, param: &'static str) -> Self {
        FilterField {
            name,
            param,
            kind: FilterKind::Date,
        }
    }
}

/// A record type served by the API, with what its list page needs to know:
/// where it lives, how it is filtered and how it is exported.
pub trait Entity: DeserializeOwned + Serialize + Clone + Debug {
    /// Collection path, e.g. `/facet/persona/`.
    const COLLECTION: &'static str;
    /// Path of the list page; only department heads use a dedicated one.
    const LISTING: &'static str = Self::COLLECTION;
    const FILTERS: &'static [FilterField];
    /// Whether the listing understands `estado`/`show_all`.
    const HAS_ESTADO: bool = true;
    const SHEET_NAME: &'static str;
    const FILE_NAME: &'static str;
    const HEADERS: &'static [&'static str];

    fn id(&self) -> u32;

    /// Flat export row, aligned with [`Entity::HEADERS`].
    fn row(&self) -> Vec<String>;

    fn detail_path(id: u32) -> String {
        format!("{}{}/", Self::COLLECTION, id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::persona_model::Jefe;
    use super::*;

    #[test]
    fn estado_reads_numbers_text_and_null() {
        let read = |value| serde_json::from_value::<Estado>(value);
        assert_eq!(read(json!(1)).unwrap(), Estado::Activo);
        assert_eq!(read(json!(0)).unwrap(), Estado::Inactivo);
        assert_eq!(read(json!("0")).unwrap(), Estado::Inactivo);
        assert_eq!(read(json!(null)).unwrap(), Estado::Activo);
        assert!(read(json!(7)).is_err());
        assert_eq!(serde_json::to_value(Estado::Inactivo).unwrap(), json!(0));
    }

    #[test]
    fn null_estado_keeps_the_page_readable() {
        let page: Page<Jefe> = serde_json::from_value(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "id": 1,
                "persona": {"id": 4, "nombre": "Ana", "apellido": "Paz", "estado": null},
                "observaciones": null,
                "estado": null
            }]
        }))
        .unwrap();
        assert_eq!(page.results[0].estado, Estado::Activo);
        assert_eq!(page.results[0].persona.estado, Estado::Activo);
    }
}
