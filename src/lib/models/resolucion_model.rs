use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::helpers::{format_date, iso_datetime, null_to_empty};

use super::{Entity, Estado, FilterField};

/// Official decision referenced by subject assignments.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Resolucion {
    pub id: u32,
    pub nexpediente: String,
    pub nresolucion: String,
    /// `Decano`, `Consejo_Superior`, `Consejo_Directivo`, `Rector`, ...
    pub tipo: String,
    #[serde(default, deserialize_with = "iso_datetime")]
    pub fecha_creacion: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "iso_datetime")]
    pub fecha: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub adjunto: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub observaciones: String,
    #[serde(default)]
    pub estado: Estado,
}

impl Resolucion {
    /// `Consejo_Superior` reads as `Consejo Superior`.
    pub fn tipo_label(&self) -> String {
        self.tipo.replace('_', " ")
    }
}

impl Entity for Resolucion {
    const COLLECTION: &'static str = "/facet/resolucion/";
    const FILTERS: &'static [FilterField] = &[
        FilterField::text("nexpediente", "nexpediente__icontains"),
        FilterField::text("nresolucion", "nresolucion__icontains"),
        FilterField::exact("tipo", "tipo"),
        FilterField::date("fecha", "fecha__date"),
    ];
    const SHEET_NAME: &'static str = "Resoluciones";
    const FILE_NAME: &'static str = "resoluciones.xlsx";
    const HEADERS: &'static [&'static str] = &[
        "Nro Expediente",
        "Nro Resolución",
        "Tipo",
        "Fecha",
        "Fecha de carga",
        "Adjunto",
        "Observaciones",
        "Estado",
    ];

    fn id(&self) -> u32 {
        self.id
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.nexpediente.clone(),
            self.nresolucion.clone(),
            self.tipo_label(),
            format_date(self.fecha.as_ref()),
            format_date(self.fecha_creacion.as_ref()),
            self.adjunto.clone(),
            self.observaciones.clone(),
            self.estado.label().to_string(),
        ]
    }
}
