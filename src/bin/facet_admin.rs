use std::process::ExitCode;

use clap::Parser;
use facet_admin::{
    api_client::ApiClient,
    error::Result,
    forms::{create_docente, delete_record, fetch_record, ACTION_ERROR_MESSAGE},
    listing::{
        export::EXPORT_ERROR_MESSAGE, list_view::FETCH_ERROR_MESSAGE, sheet_writer::XlsxWriter,
    },
    models::{
        asignatura_model::AsignaturaDocente,
        departamento_model::Departamento,
        persona_model::{Docente, Jefe, NoDocente, Persona, RolPersonaForm},
        resolucion_model::Resolucion,
        usuario_model::Usuario,
        Args, Command, Config, EntityKind,
    },
    run_tool::{render_table, run_export, run_list},
};
use log::{error, info};

/// Runs `$body` with `$entity` bound to the record type behind `$kind`.
macro_rules! with_entity {
    ($kind:expr, $entity:ident => $body:expr) => {
        match $kind {
            EntityKind::Personas => {
                type $entity = Persona;
                $body
            }
            EntityKind::Docentes => {
                type $entity = Docente;
                $body
            }
            EntityKind::NoDocentes => {
                type $entity = NoDocente;
                $body
            }
            EntityKind::Jefes => {
                type $entity = Jefe;
                $body
            }
            EntityKind::Resoluciones => {
                type $entity = Resolucion;
                $body
            }
            EntityKind::AsignaturasDocentes => {
                type $entity = AsignaturaDocente;
                $body
            }
            EntityKind::Departamentos => {
                type $entity = Departamento;
                $body
            }
            EntityKind::Usuarios => {
                type $entity = Usuario;
                $body
            }
        }
    };
}

fn fallback_message(command: &Command) -> &'static str {
    match command {
        Command::List { .. } | Command::Show { .. } => FETCH_ERROR_MESSAGE,
        Command::Export { .. } => EXPORT_ERROR_MESSAGE,
        Command::Delete { .. } | Command::CreateDocente { .. } => ACTION_ERROR_MESSAGE,
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(&args)?;
    let api = ApiClient::new(&config)?;

    match args.command {
        Command::List {
            entity,
            filters,
            page,
        } => with_entity!(entity, E => {
            let view = run_list::<_, E>(&api, &config, filters.into(), page).await?;
            println!("{}", render_table(&view));
        }),
        Command::Export { entity, filters } => with_entity!(entity, E => {
            let writer = XlsxWriter::new(&config.export_dir);
            let path = run_export::<_, _, E>(&api, &writer, &config, filters.into()).await?;
            println!("{}", path.display());
        }),
        Command::Show { entity, id } => with_entity!(entity, E => {
            let record = fetch_record::<_, E>(&api, id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }),
        Command::Delete { entity, id } => with_entity!(entity, E => {
            delete_record::<_, E>(&api, id).await?;
            println!("Eliminado.");
        }),
        Command::CreateDocente {
            persona,
            observaciones,
            estado,
        } => {
            let form = RolPersonaForm {
                persona,
                observaciones,
                estado,
            };
            let docente = create_docente(&api, &form).await?;
            info!("Created docente {} for persona {}", docente.id, persona);
            println!("Se creó el docente con éxito.");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stderr)
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let fallback = fallback_message(&args.command);
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err.user_message(fallback));
            ExitCode::FAILURE
        }
    }
}
