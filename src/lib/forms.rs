//! Create, edit and delete submissions, with the checks made before a request
//! is sent.
use std::collections::BTreeMap;

use futures::future;
use log::{info, warn};
use serde::Serialize;

use crate::{
    error::{FacetError, Result},
    facet_api::FacetApi,
    helpers::{capitalize_first, capitalize_name, looks_like_email},
    listing::query::build_url,
    models::{
        asignatura_model::{AsignaturaDocente, AsignaturaDocenteForm},
        departamento_model::{Departamento, DepartamentoForm},
        persona_model::{Docente, NoDocente, Persona, PersonaForm, RolPersonaForm, TipoTitulo},
        usuario_model::{Rol, Usuario, UsuarioForm, UsuarioUpdate},
        Catalogue, Entity,
    },
};

pub const ACTION_ERROR_MESSAGE: &str = "No se pudo realizar la acción.";
pub const DUPLICATE_DOCENTE_MESSAGE: &str = "Ya existe un docente para esta persona";
pub const MISSING_ASSIGNMENT_MESSAGE: &str =
    "Por favor, selecciona un docente, una asignatura y una resolución.";
pub const USUARIO_UPDATE_ERROR_MESSAGE: &str = "Error al actualizar el usuario";

/// Field-specific messages for rejected user edits.
pub const USUARIO_FIELD_MESSAGES: &[(&str, &str)] = &[
    ("email", "El email ya está registrado en el sistema"),
    ("legajo", "El legajo ya está registrado en el sistema"),
    ("documento", "El documento ya está registrado en el sistema"),
    ("rol", "El rol seleccionado no es válido"),
];

pub const ROLES_PATH: &str = "/facet/roles/";
pub const TIPOS_TITULO_PATH: &str = "/facet/tipo-titulo/";

pub async fn fetch_record<A: FacetApi, T: Entity>(api: &A, id: u32) -> Result<T> {
    api.get_json(&T::detail_path(id)).await
}

pub async fn create_record<A: FacetApi, T: Entity, B: Serialize>(api: &A, body: &B) -> Result<T> {
    let created: T = api.post_json(T::COLLECTION, body).await?;
    info!("Created {} {}", T::SHEET_NAME, created.id());
    Ok(created)
}

pub async fn update_record<A: FacetApi, T: Entity, B: Serialize>(
    api: &A,
    id: u32,
    body: &B,
) -> Result<T> {
    let updated = api.put_json(&T::detail_path(id), body).await?;
    info!("Updated {} {}", T::SHEET_NAME, id);
    Ok(updated)
}

pub async fn delete_record<A: FacetApi, T: Entity>(api: &A, id: u32) -> Result<()> {
    api.delete(&T::detail_path(id)).await?;
    info!("Deleted {} {}", T::SHEET_NAME, id);
    Ok(())
}

/// Registers a person as a teacher. A person already holding a teacher
/// record, in any state, is refused before anything is posted.
pub async fn create_docente<A: FacetApi>(api: &A, form: &RolPersonaForm) -> Result<Docente> {
    let url = build_url(
        Docente::COLLECTION,
        &[
            ("persona", form.persona.to_string()),
            ("show_all", "true".to_string()),
        ],
    )?;
    let existing = api.get_page::<Docente>(&url).await?;
    if !existing.results.is_empty() {
        warn!(
            "Person {} already has teacher record {}",
            form.persona, existing.results[0].id
        );
        return Err(FacetError::Conflict(DUPLICATE_DOCENTE_MESSAGE.to_string()));
    }
    create_record::<A, Docente, _>(api, form).await
}

pub async fn create_persona<A: FacetApi>(api: &A, form: PersonaForm) -> Result<Persona> {
    let form = PersonaForm {
        nombre: capitalize_name(form.nombre.trim()),
        apellido: capitalize_name(form.apellido.trim()),
        ..form
    };
    create_record::<A, Persona, _>(api, &form).await
}

pub async fn create_departamento<A: FacetApi>(
    api: &A,
    form: DepartamentoForm,
) -> Result<Departamento> {
    let form = DepartamentoForm {
        nombre: capitalize_first(form.nombre.trim()),
        ..form
    };
    create_record::<A, Departamento, _>(api, &form).await
}

pub async fn list_tipos_titulo<A: FacetApi>(api: &A) -> Result<Vec<TipoTitulo>> {
    Ok(api
        .get_json::<Catalogue<TipoTitulo>>(TIPOS_TITULO_PATH)
        .await?
        .into_items())
}

fn require(errors: &mut BTreeMap<String, String>, field: &str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), message.to_string());
        false
    } else {
        true
    }
}

/// Checks the user edit form and converts it into the request body.
pub fn validate_usuario(form: &UsuarioForm) -> Result<UsuarioUpdate> {
    let mut errors = BTreeMap::new();

    if require(&mut errors, "email", &form.email, "El email es requerido")
        && !looks_like_email(form.email.trim())
    {
        errors.insert("email".to_string(), "El email no es válido".to_string());
    }
    require(&mut errors, "nombre", &form.nombre, "El nombre es requerido");
    require(&mut errors, "apellido", &form.apellido, "El apellido es requerido");
    let has_legajo = require(&mut errors, "legajo", &form.legajo, "El legajo es requerido");
    let has_documento = require(
        &mut errors,
        "documento",
        &form.documento,
        "El documento es requerido",
    );
    require(&mut errors, "rol", &form.rol, "El rol es requerido");

    let legajo = form.legajo.trim().parse::<u64>();
    if has_legajo && legajo.is_err() {
        errors.insert("legajo".to_string(), "El legajo debe ser un número".to_string());
    }
    let documento = form.documento.trim().parse::<u64>();
    if has_documento && documento.is_err() {
        errors.insert(
            "documento".to_string(),
            "El documento debe ser un número".to_string(),
        );
    }
    let rol = form.rol.trim().parse::<u32>();
    if rol.is_err() && !errors.contains_key("rol") {
        errors.insert("rol".to_string(), "El rol es requerido".to_string());
    }

    match (legajo, documento, rol) {
        (Ok(legajo), Ok(documento), Ok(rol)) if errors.is_empty() => Ok(UsuarioUpdate {
            email: form.email.trim().to_string(),
            nombre: form.nombre.trim().to_string(),
            apellido: form.apellido.trim().to_string(),
            legajo,
            documento,
            rol,
            is_active: form.is_active,
        }),
        _ => Err(FacetError::Form(errors)),
    }
}

pub async fn update_usuario<A: FacetApi>(api: &A, id: u32, form: &UsuarioForm) -> Result<Usuario> {
    let body = validate_usuario(form)?;
    update_record::<A, Usuario, _>(api, id, &body).await
}

/// Message for a failed [`update_usuario`].
pub fn usuario_error_message(err: &FacetError) -> String {
    err.user_message_with(USUARIO_FIELD_MESSAGES, USUARIO_UPDATE_ERROR_MESSAGE)
}

/// Everything the user edit page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct UsuarioEdit {
    pub usuario: Usuario,
    pub form: UsuarioForm,
    pub roles: Vec<Rol>,
}

/// Loads the user and the role catalogue side by side.
pub async fn load_usuario_form<A: FacetApi>(api: &A, id: u32) -> Result<UsuarioEdit> {
    let (usuario, roles) = future::try_join(
        fetch_record::<A, Usuario>(api, id),
        api.get_json::<Catalogue<Rol>>(ROLES_PATH),
    )
    .await?;
    Ok(UsuarioEdit {
        form: UsuarioForm::from(&usuario),
        usuario,
        roles: roles.into_items(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoDocenteEdit {
    pub nodocente: NoDocente,
    pub persona: Persona,
}

/// The non-teaching record only carries the person id, so the person is
/// fetched once the record is known.
pub async fn load_nodocente_form<A: FacetApi>(api: &A, id: u32) -> Result<NoDocenteEdit> {
    let nodocente = fetch_record::<A, NoDocente>(api, id).await?;
    let persona = fetch_record::<A, Persona>(api, nodocente.persona).await?;
    Ok(NoDocenteEdit { nodocente, persona })
}

pub async fn update_nodocente<A: FacetApi>(
    api: &A,
    id: u32,
    form: &RolPersonaForm,
) -> Result<NoDocente> {
    update_record::<A, NoDocente, _>(api, id, form).await
}

/// A subject assignment always links a teacher, a subject and a resolution.
fn require_assignment_links(form: &AsignaturaDocenteForm) -> Result<()> {
    if form.docente.is_none() || form.asignatura.is_none() || form.resolucion.is_none() {
        return Err(FacetError::Form(BTreeMap::from([(
            "asignacion".to_string(),
            MISSING_ASSIGNMENT_MESSAGE.to_string(),
        )])));
    }
    Ok(())
}

pub async fn create_asignatura_docente<A: FacetApi>(
    api: &A,
    form: &AsignaturaDocenteForm,
) -> Result<AsignaturaDocente> {
    require_assignment_links(form)?;
    create_record::<A, AsignaturaDocente, _>(api, form).await
}

pub async fn update_asignatura_docente<A: FacetApi>(
    api: &A,
    id: u32,
    form: &AsignaturaDocenteForm,
) -> Result<AsignaturaDocente> {
    require_assignment_links(form)?;
    update_record::<A, AsignaturaDocente, _>(api, id, form).await
}
