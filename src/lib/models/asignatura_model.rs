use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::helpers::{format_date, iso_datetime, null_to_empty};

use super::{Entity, Estado, FilterField};

/// Assignment of a teacher to a subject under a resolution.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct AsignaturaDocente {
    pub id: u32,
    pub asignatura: u32,
    pub docente: u32,
    pub resolucion: u32,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub observaciones: String,
    #[serde(default)]
    pub estado: Estado,
    #[serde(default, deserialize_with = "iso_datetime")]
    pub fecha_de_inicio: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "iso_datetime")]
    pub fecha_de_vencimiento: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub dedicacion: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub condicion: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub cargo: String,
}

/// Body of `PUT /facet/asignatura-docente/{id}/`. Dates go out as ISO-8601 UTC.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct AsignaturaDocenteForm {
    pub asignatura: Option<u32>,
    pub docente: Option<u32>,
    pub resolucion: Option<u32>,
    pub observaciones: String,
    pub estado: Estado,
    pub fecha_de_inicio: Option<DateTime<Utc>>,
    pub fecha_de_vencimiento: Option<DateTime<Utc>>,
    pub dedicacion: String,
    pub condicion: String,
    pub cargo: String,
}

impl Entity for AsignaturaDocente {
    const COLLECTION: &'static str = "/facet/asignatura-docente/";
    const FILTERS: &'static [FilterField] = &[
        FilterField::exact("asignatura", "asignatura"),
        FilterField::exact("docente", "docente"),
        FilterField::text("cargo", "cargo__icontains"),
    ];
    const SHEET_NAME: &'static str = "AsignaturasDocentes";
    const FILE_NAME: &'static str = "asignaturas_docentes.xlsx";
    const HEADERS: &'static [&'static str] = &[
        "Asignatura",
        "Docente",
        "Resolución",
        "Cargo",
        "Dedicación",
        "Condición",
        "Fecha de inicio",
        "Fecha de vencimiento",
        "Observaciones",
        "Estado",
    ];

    fn id(&self) -> u32 {
        self.id
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.asignatura.to_string(),
            self.docente.to_string(),
            self.resolucion.to_string(),
            self.cargo.clone(),
            self.dedicacion.clone(),
            self.condicion.clone(),
            format_date(self.fecha_de_inicio.as_ref()),
            format_date(self.fecha_de_vencimiento.as_ref()),
            self.observaciones.clone(),
            self.estado.label().to_string(),
        ]
    }
}
