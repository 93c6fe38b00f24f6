//! Application users and their roles.
use serde::{Deserialize, Serialize};

use crate::helpers::null_to_empty;

use super::{Entity, FilterField};

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Usuario {
    pub id: u32,
    pub email: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub nombre: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub apellido: String,
    #[serde(default)]
    pub legajo: Option<u64>,
    #[serde(default)]
    pub documento: Option<u64>,
    #[serde(default)]
    pub rol: Option<u32>,
    #[serde(default)]
    pub rol_detalle: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub has_changed_password: bool,
}

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq)]
pub struct Rol {
    pub id: u32,
    pub descripcion: String,
}

/// The edit form as typed by the user; everything is text until validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsuarioForm {
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub legajo: String,
    pub documento: String,
    pub rol: String,
    pub is_active: bool,
}

/// Validated body of `PUT /facet/users/{id}/`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UsuarioUpdate {
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub legajo: u64,
    pub documento: u64,
    pub rol: u32,
    pub is_active: bool,
}

impl From<&Usuario> for UsuarioForm {
    fn from(usuario: &Usuario) -> Self {
        UsuarioForm {
            email: usuario.email.clone(),
            nombre: usuario.nombre.clone(),
            apellido: usuario.apellido.clone(),
            legajo: usuario.legajo.map(|l| l.to_string()).unwrap_or_default(),
            documento: usuario.documento.map(|d| d.to_string()).unwrap_or_default(),
            rol: usuario.rol.map(|r| r.to_string()).unwrap_or_default(),
            is_active: usuario.is_active,
        }
    }
}

impl Entity for Usuario {
    const COLLECTION: &'static str = "/facet/users/";
    const FILTERS: &'static [FilterField] = &[
        FilterField::text("email", "email__icontains"),
        FilterField::text("nombre", "nombre__icontains"),
        FilterField::text("apellido", "apellido__icontains"),
        FilterField::text("legajo", "legajo__icontains"),
    ];
    const HAS_ESTADO: bool = false;
    const SHEET_NAME: &'static str = "Usuarios";
    const FILE_NAME: &'static str = "usuarios.xlsx";
    const HEADERS: &'static [&'static str] = &[
        "Email",
        "Nombre",
        "Apellido",
        "Legajo",
        "Documento",
        "Rol",
        "Estado",
    ];

    fn id(&self) -> u32 {
        self.id
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.nombre.clone(),
            self.apellido.clone(),
            self.legajo.map(|l| l.to_string()).unwrap_or_default(),
            self.documento.map(|d| d.to_string()).unwrap_or_default(),
            self.rol_detalle.clone().unwrap_or_default(),
            if self.is_active { "Activo" } else { "Inactivo" }.to_string(),
        ]
    }
}
