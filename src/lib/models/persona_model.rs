//! Persons and the role records hanging off them (teachers, non-teaching
//! staff, department heads).
use serde::{Deserialize, Serialize};

use crate::helpers::null_to_empty;

use super::{Entity, Estado, FilterField};

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Persona {
    pub id: u32,
    pub nombre: String,
    pub apellido: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub dni: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub legajo: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub telefono: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub interno: String,
    #[serde(default)]
    pub estado: Estado,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<u32>,
}

/// Body of `POST /facet/persona/`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PersonaForm {
    pub nombre: String,
    pub apellido: String,
    pub dni: String,
    pub legajo: String,
    pub telefono: String,
    pub email: String,
    pub interno: String,
    pub estado: Estado,
    pub titulo: Option<u32>,
}

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct TipoTitulo {
    pub id: u32,
    pub nombre: String,
}

/// Teacher record. `persona` is the id, `persona_detalle` the expanded person
/// when the serializer includes it.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Docente {
    pub id: u32,
    pub persona: u32,
    #[serde(default)]
    pub persona_detalle: Option<Persona>,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub observaciones: String,
    #[serde(default)]
    pub estado: Estado,
}

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct NoDocente {
    pub id: u32,
    pub persona: u32,
    #[serde(default)]
    pub persona_detalle: Option<Persona>,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub observaciones: String,
    #[serde(default)]
    pub estado: Estado,
}

/// Body shared by teacher and non-teaching creates and edits.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RolPersonaForm {
    pub persona: u32,
    pub observaciones: String,
    pub estado: Estado,
}

/// Department head, always listed with its person embedded.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Jefe {
    pub id: u32,
    pub persona: Persona,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub observaciones: String,
    #[serde(default)]
    pub estado: Estado,
}

const PERSON_ROLE_FILTERS: &[FilterField] = &[
    FilterField::text("nombre", "persona__nombre__icontains"),
    FilterField::text("apellido", "persona__apellido__icontains"),
    FilterField::text("dni", "persona__dni__icontains"),
    FilterField::text("legajo", "persona__legajo__icontains"),
];

const PERSON_ROLE_HEADERS: &[&str] = &[
    "Nombre",
    "Apellido",
    "DNI",
    "Legajo",
    "Teléfono",
    "Email",
    "Observaciones",
    "Estado",
];

fn person_role_row(persona: Option<&Persona>, observaciones: &str, estado: Estado) -> Vec<String> {
    let mut row = match persona {
        Some(p) => vec![
            p.nombre.clone(),
            p.apellido.clone(),
            p.dni.clone(),
            p.legajo.clone(),
            p.telefono.clone(),
            p.email.clone(),
        ],
        None => vec![String::new(); 6],
    };
    row.push(observaciones.to_string());
    row.push(estado.label().to_string());
    row
}

impl Entity for Persona {
    const COLLECTION: &'static str = "/facet/persona/";
    const FILTERS: &'static [FilterField] = &[
        FilterField::text("nombre", "nombre__icontains"),
        FilterField::text("apellido", "apellido__icontains"),
        FilterField::text("dni", "dni__icontains"),
        FilterField::text("legajo", "legajo__icontains"),
    ];
    const SHEET_NAME: &'static str = "Personas";
    const FILE_NAME: &'static str = "personas.xlsx";
    const HEADERS: &'static [&'static str] = &[
        "Nombre", "Apellido", "DNI", "Legajo", "Teléfono", "Email", "Interno", "Estado",
    ];

    fn id(&self) -> u32 {
        self.id
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.nombre.clone(),
            self.apellido.clone(),
            self.dni.clone(),
            self.legajo.clone(),
            self.telefono.clone(),
            self.email.clone(),
            self.interno.clone(),
            self.estado.label().to_string(),
        ]
    }
}

impl Entity for Docente {
    const COLLECTION: &'static str = "/facet/docente/";
    const FILTERS: &'static [FilterField] = PERSON_ROLE_FILTERS;
    const SHEET_NAME: &'static str = "Docentes";
    const FILE_NAME: &'static str = "docentes.xlsx";
    const HEADERS: &'static [&'static str] = PERSON_ROLE_HEADERS;

    fn id(&self) -> u32 {
        self.id
    }

    fn row(&self) -> Vec<String> {
        person_role_row(self.persona_detalle.as_ref(), &self.observaciones, self.estado)
    }
}

impl Entity for NoDocente {
    const COLLECTION: &'static str = "/facet/nodocente/";
    const FILTERS: &'static [FilterField] = PERSON_ROLE_FILTERS;
    const SHEET_NAME: &'static str = "NoDocentes";
    const FILE_NAME: &'static str = "nodocentes.xlsx";
    const HEADERS: &'static [&'static str] = PERSON_ROLE_HEADERS;

    fn id(&self) -> u32 {
        self.id
    }

    fn row(&self) -> Vec<String> {
        person_role_row(self.persona_detalle.as_ref(), &self.observaciones, self.estado)
    }
}

impl Entity for Jefe {
    const COLLECTION: &'static str = "/facet/jefe/";
    const LISTING: &'static str = "/facet/jefe/list_jefes_persona/";
    const FILTERS: &'static [FilterField] = PERSON_ROLE_FILTERS;
    const SHEET_NAME: &'static str = "Jefes";
    const FILE_NAME: &'static str = "jefes.xlsx";
    const HEADERS: &'static [&'static str] = &[
        "Nombre",
        "Apellido",
        "DNI",
        "Legajo",
        "Teléfono",
        "Email",
        "Interno",
        "Observaciones",
        "Estado",
    ];

    fn id(&self) -> u32 {
        self.id
    }

    fn row(&self) -> Vec<String> {
        let p = &self.persona;
        vec![
            p.nombre.clone(),
            p.apellido.clone(),
            p.dni.clone(),
            p.legajo.clone(),
            p.telefono.clone(),
            p.email.clone(),
            p.interno.clone(),
            self.observaciones.clone(),
            self.estado.label().to_string(),
        ]
    }
}
