use serde::{Deserialize, Serialize};

use crate::helpers::null_to_empty;

use super::{Entity, Estado, FilterField};

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Departamento {
    pub id: u32,
    pub nombre: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub telefono: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub interno: String,
    #[serde(default)]
    pub estado: Estado,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DepartamentoForm {
    pub nombre: String,
    pub telefono: String,
    pub interno: String,
    pub estado: Estado,
}

impl Entity for Departamento {
    const COLLECTION: &'static str = "/facet/departamento/";
    const FILTERS: &'static [FilterField] = &[
        FilterField::text("nombre", "nombre__icontains"),
        FilterField::text("telefono", "telefono__icontains"),
    ];
    const SHEET_NAME: &'static str = "Departamentos";
    const FILE_NAME: &'static str = "departamentos.xlsx";
    const HEADERS: &'static [&'static str] = &["Nombre", "Teléfono", "Interno", "Estado"];

    fn id(&self) -> u32 {
        self.id
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.nombre.clone(),
            self.telefono.clone(),
            self.interno.clone(),
            self.estado.label().to_string(),
        ]
    }
}
