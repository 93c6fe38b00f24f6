use std::{cell::RefCell, collections::BTreeMap, path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{FacetError, Result},
    facet_api::FacetApi,
    models::{
        persona_model::Persona, resolucion_model::Resolucion, usuario_model::Usuario, Entity,
        Estado,
    },
};

use super::{
    export::{collect_all, export_listing, Sheet},
    list_view::{ListView, ViewStatus, FETCH_ERROR_MESSAGE},
    query::{build_url, filtered_url, query_pairs, EstadoFilter, FilterSet},
    sheet_writer::{SheetWriter, XlsxWriter},
};

/// Serves canned JSON by path and remembers every path asked for.
#[derive(Default)]
struct StubApi {
    responses: BTreeMap<String, Value>,
    requests: Mutex<Vec<String>>,
}

impl StubApi {
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl FacetApi for StubApi {
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.requests.lock().unwrap().push(path.to_string());
        match self.responses.get(path) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Err(FacetError::Status {
                status: 500,
                url: path.to_string(),
            }),
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, _: &B) -> Result<T> {
        Err(FacetError::Status {
            status: 405,
            url: path.to_string(),
        })
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, _: &B) -> Result<T> {
        Err(FacetError::Status {
            status: 405,
            url: path.to_string(),
        })
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.requests.lock().unwrap().push(format!("DELETE {path}"));
        Ok(())
    }
}

#[derive(Default)]
struct StubWriter {
    written: RefCell<Vec<(Sheet, String)>>,
}

impl SheetWriter for StubWriter {
    fn write_sheet(&self, sheet: &Sheet, file_name: &str) -> Result<PathBuf> {
        self.written
            .borrow_mut()
            .push((sheet.clone(), file_name.to_string()));
        Ok(PathBuf::from(file_name))
    }
}

fn persona(id: u32) -> Value {
    json!({
        "id": id,
        "nombre": format!("Nombre{id}"),
        "apellido": format!("Apellido{id}"),
        "dni": format!("{}", 30000000 + id),
        "legajo": format!("L{id}"),
        "telefono": null,
        "email": format!("p{id}@facet.edu.ar"),
        "interno": "",
        "estado": 1
    })
}

fn offset_url(base: &str, offset: u64) -> String {
    if offset == 0 {
        base.to_string()
    } else {
        format!("{base}?limit=10&offset={offset}")
    }
}

/// Paginates `count` persons ten at a time under `base`, the way the API does.
fn persona_pages(base: &str, count: u64) -> BTreeMap<String, Value> {
    let mut responses = BTreeMap::new();
    let mut offset = 0;
    loop {
        let end = (offset + 10).min(count);
        let next = (end < count).then(|| offset_url(base, end));
        let previous = (offset > 0).then(|| offset_url(base, offset - 10));
        responses.insert(
            offset_url(base, offset),
            json!({
                "count": count,
                "next": next,
                "previous": previous,
                "results": (offset + 1..=end).map(|id| persona(id as u32)).collect::<Vec<_>>(),
            }),
        );
        if end >= count {
            break;
        }
        offset = end;
    }
    responses
}

fn stub_with(count: u64) -> StubApi {
    StubApi {
        responses: persona_pages("/facet/persona/", count),
        ..StubApi::default()
    }
}

#[test]
fn query_skips_blank_values() {
    let filters = FilterSet::new()
        .with("nombre", "")
        .with("apellido", "   ")
        .with("dni", " 3012 ");
    let pairs = query_pairs(Persona::FILTERS, true, &filters);
    assert_eq!(pairs, vec![("dni__icontains", "3012".to_string())]);
    assert!(pairs.iter().all(|(_, value)| !value.is_empty()));
}

#[test]
fn query_follows_declared_order_then_estado() {
    let filters = FilterSet::new()
        .with("legajo", "77")
        .with("nombre", "Ana")
        .with_estado(EstadoFilter::Only(Estado::Inactivo));
    assert_eq!(
        filtered_url::<Persona>(&filters).unwrap(),
        "/facet/persona/?nombre__icontains=Ana&legajo__icontains=77&estado=0"
    );
}

#[test]
fn estado_todos_sends_show_all_only() {
    let filters = FilterSet::new()
        .with("nombre", "Ana")
        .with_estado("todos".parse().unwrap());
    let url = filtered_url::<Persona>(&filters).unwrap();
    assert_eq!(url, "/facet/persona/?nombre__icontains=Ana&show_all=true");
    assert!(!url.contains("estado"));
}

#[test]
fn default_estado_is_omitted() {
    assert_eq!(
        filtered_url::<Persona>(&FilterSet::new()).unwrap(),
        "/facet/persona/"
    );
}

#[test]
fn listings_without_estado_ignore_the_state_filter() {
    let filters = FilterSet::new()
        .with("email", "ana@")
        .with_estado(EstadoFilter::All);
    assert_eq!(
        filtered_url::<Usuario>(&filters).unwrap(),
        "/facet/users/?email__icontains=ana%40"
    );
}

#[test]
fn dates_are_sent_as_calendar_dates() {
    let from_picker =
        FilterSet::new().with_date("fecha", NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    assert_eq!(
        filtered_url::<Resolucion>(&from_picker).unwrap(),
        "/facet/resolucion/?fecha__date=2024-03-05"
    );

    let typed = FilterSet::new().with("fecha", "05/03/2024").with("tipo", "Decano");
    assert_eq!(
        filtered_url::<Resolucion>(&typed).unwrap(),
        "/facet/resolucion/?tipo=Decano&fecha__date=2024-03-05"
    );
}

#[test]
fn invalid_dates_and_unknown_filters_are_dropped() {
    let filters = FilterSet::new()
        .with("fecha", "ayer")
        .with("color", "rojo")
        .with("nresolucion", "12/24");
    assert_eq!(
        filtered_url::<Resolucion>(&filters).unwrap(),
        "/facet/resolucion/?nresolucion__icontains=12%2F24"
    );
}

#[test]
fn build_url_form_encodes_values() {
    let url = build_url(
        "/facet/persona/",
        &[("apellido__icontains", "De la Fuente".to_string())],
    )
    .unwrap();
    assert_eq!(url, "/facet/persona/?apellido__icontains=De+la+Fuente");
}

#[tokio::test]
async fn paginates_twenty_five_records_in_three_pages() {
    let api = stub_with(25);
    let mut view = ListView::<Persona>::new(10);
    assert_eq!(view.status(), &ViewStatus::Idle);

    assert!(view.apply_filters(&api).await.unwrap());
    assert_eq!(view.current_page(), 1);
    assert_eq!(view.total_pages(), 3);
    assert!(view.has_next());
    assert!(!view.has_previous());
    assert_eq!(view.records().len(), 10);

    assert!(view.next_page(&api).await.unwrap());
    assert_eq!(view.current_page(), 2);
    assert_eq!(view.records()[0].id, 11);

    assert!(view.next_page(&api).await.unwrap());
    assert_eq!(view.current_page(), 3);
    assert!(!view.has_next());
    assert!(view.has_previous());
    assert_eq!(view.records().len(), 5);
    assert_eq!(view.status(), &ViewStatus::Displayed);

    let issued = api.requests().len();
    assert!(!view.next_page(&api).await.unwrap());
    assert_eq!(api.requests().len(), issued);
    assert_eq!(view.current_page(), 3);

    assert!(view.previous_page(&api).await.unwrap());
    assert_eq!(view.current_page(), 2);
    assert_eq!(view.records()[0].id, 11);
}

#[tokio::test]
async fn shown_records_match_page_size_and_remaining_count() {
    for count in [0u64, 7, 10, 25] {
        let api = stub_with(count);
        let mut view = ListView::<Persona>::new(10);
        view.apply_filters(&api).await.unwrap();
        let mut offset = 0;
        loop {
            assert_eq!(view.records().len() as u64, 10.min(count - offset));
            assert_eq!(view.total_pages(), count.div_ceil(10));
            if !view.next_page(&api).await.unwrap() {
                break;
            }
            offset += 10;
        }
    }
}

#[tokio::test]
async fn previous_is_disabled_on_first_page() {
    let api = stub_with(25);
    let mut view = ListView::<Persona>::new(10);
    view.apply_filters(&api).await.unwrap();
    assert!(!view.previous_page(&api).await.unwrap());
    assert_eq!(api.requests(), vec!["/facet/persona/".to_string()]);
}

#[tokio::test]
async fn failed_fetch_keeps_what_is_on_screen() {
    let mut api = stub_with(25);
    let mut view = ListView::<Persona>::new(10);
    view.apply_filters(&api).await.unwrap();
    view.next_page(&api).await.unwrap();
    let before = view.state().clone();

    api.responses.remove("/facet/persona/?limit=10&offset=20");
    let err = view.next_page(&api).await.unwrap_err();
    assert!(matches!(err, FacetError::Status { status: 500, .. }));
    assert_eq!(view.state(), &before);
    assert_eq!(
        view.status(),
        &ViewStatus::Error(FETCH_ERROR_MESSAGE.to_string())
    );

    view.filters_mut().set("nombre", "nadie");
    assert!(view.apply_filters(&api).await.is_err());
    assert_eq!(view.state(), &before);
}

#[tokio::test]
async fn clearing_filters_returns_to_default_listing() {
    let mut api = stub_with(25);
    api.responses.insert(
        "/facet/persona/?apellido__icontains=Apellido2&show_all=true".to_string(),
        json!({"count": 1, "next": null, "previous": null, "results": [persona(2)]}),
    );
    let mut view = ListView::<Persona>::new(10);
    view.apply_filters(&api).await.unwrap();
    view.next_page(&api).await.unwrap();
    assert_eq!(view.current_page(), 2);

    *view.filters_mut() = FilterSet::new()
        .with("apellido", "Apellido2")
        .with_estado(EstadoFilter::All);
    view.apply_filters(&api).await.unwrap();
    assert_eq!(view.current_page(), 1);
    assert_eq!(view.state().count, 1);

    view.clear_filters(&api).await.unwrap();
    assert_eq!(view.filters(), &FilterSet::default());
    assert_eq!(view.current_page(), 1);
    assert_eq!(view.state().url, "/facet/persona/");
    assert_eq!(view.state().count, 25);
    assert_eq!(api.requests().last().unwrap(), "/facet/persona/");
}

#[tokio::test]
async fn stale_responses_are_dropped() {
    let api = stub_with(25);
    let mut view = ListView::<Persona>::new(10);
    view.apply_filters(&api).await.unwrap();

    let slow = view.begin_next().unwrap();
    let fast = view.begin_reload();
    let slow_page = api.get_page::<Persona>(&slow.url).await;
    let fast_page = api.get_page::<Persona>(&fast.url).await;

    assert!(view.complete(fast, fast_page).unwrap());
    assert!(!view.complete(slow, slow_page).unwrap());
    assert_eq!(view.current_page(), 1);
    assert_eq!(view.records()[0].id, 1);
}

#[tokio::test]
async fn stale_failures_do_not_touch_status() {
    let api = stub_with(25);
    let mut view = ListView::<Persona>::new(10);
    let old = view.begin_filter().unwrap();
    let current = view.begin_clear();
    let current_page = api.get_page::<Persona>(&current.url).await;
    assert!(view.complete(current, current_page).unwrap());

    let failure = Err(FacetError::NotFound(old.url.clone()));
    assert!(!view.complete(old, failure).unwrap());
    assert_eq!(view.status(), &ViewStatus::Displayed);
}

#[tokio::test]
async fn delete_reloads_current_page() {
    let api = stub_with(25);
    let mut view = ListView::<Persona>::new(10);
    view.apply_filters(&api).await.unwrap();
    view.next_page(&api).await.unwrap();

    assert!(view.delete(&api, 12).await.unwrap());
    let requests = api.requests();
    assert_eq!(requests[requests.len() - 2], "DELETE /facet/persona/12/");
    assert_eq!(
        requests[requests.len() - 1],
        "/facet/persona/?limit=10&offset=10"
    );
    assert_eq!(view.current_page(), 2);
}

#[tokio::test]
async fn export_walks_every_page() {
    let api = stub_with(25);
    let records: Vec<Persona> = collect_all(&api, "/facet/persona/").await.unwrap();
    assert_eq!(records.len(), 25);
    assert_eq!(records.last().unwrap().id, 25);

    let writer = StubWriter::default();
    let view = ListView::<Persona>::new(10);
    let path = view.export(&api, &writer).await.unwrap();
    assert_eq!(path, PathBuf::from("personas.xlsx"));

    let written = writer.written.borrow();
    let (sheet, file_name) = &written[0];
    assert_eq!(file_name, "personas.xlsx");
    assert_eq!(sheet.rows.len(), 25);
    assert_eq!(sheet.headers.len(), sheet.rows[0].len());
    assert_eq!(sheet.rows[0][7], "Activo");
    assert_eq!(sheet.rows[0][4], "");
    assert_eq!(sheet.rows[0][5], "p1@facet.edu.ar");
    assert_eq!(sheet.rows[0][3], "L1");
}

#[tokio::test]
async fn export_aborts_on_failed_page() {
    let mut api = stub_with(25);
    api.responses.remove("/facet/persona/?limit=10&offset=10");
    let writer = StubWriter::default();
    let result = export_listing::<_, _, Persona>(&api, &writer, &FilterSet::new()).await;
    assert!(result.is_err());
    assert!(writer.written.borrow().is_empty());
}

#[tokio::test]
async fn export_of_nothing_is_header_only() {
    let api = stub_with(0);
    let writer = StubWriter::default();
    export_listing::<_, _, Persona>(&api, &writer, &FilterSet::new())
        .await
        .unwrap();
    let written = writer.written.borrow();
    assert_eq!(written[0].0.headers, Persona::HEADERS);
    assert!(written[0].0.rows.is_empty());
}

fn resolucion(id: u32, fecha: Value) -> Value {
    json!({
        "id": id,
        "nexpediente": format!("EXP-{id}"),
        "nresolucion": format!("{id}/24"),
        "tipo": "Consejo_Directivo",
        "fecha": fecha,
        "fecha_creacion": "2024-03-01T12:30:00.123456-03:00",
        "adjunto": null,
        "observaciones": "",
        "estado": 1
    })
}

#[tokio::test]
async fn export_reads_every_iso_date_form() {
    let api = StubApi {
        responses: BTreeMap::from([(
            "/facet/resolucion/".to_string(),
            json!({
                "count": 5,
                "next": null,
                "previous": null,
                "results": [
                    resolucion(1, json!("2024-03-05T10:00:00Z")),
                    resolucion(2, json!("2024-03-05T10:00:00-03:00")),
                    resolucion(3, json!("2024-03-05T10:00:00")),
                    resolucion(4, json!("2024-03-05")),
                    resolucion(5, json!(null)),
                ],
            }),
        )]),
        ..StubApi::default()
    };

    let records: Vec<Resolucion> = collect_all(&api, "/facet/resolucion/").await.unwrap();
    assert_eq!(records.len(), 5);
    let fechas = records
        .iter()
        .map(|r| r.row()[3].clone())
        .collect::<Vec<_>>();
    assert_eq!(
        fechas,
        vec!["05/03/2024", "05/03/2024", "05/03/2024", "05/03/2024", ""]
    );
    assert_eq!(records[0].row()[2], "Consejo Directivo");
    assert_eq!(records[0].row()[4], "01/03/2024");
}

#[test]
fn xlsx_writer_saves_into_export_dir() {
    let dir = tempfile::tempdir().unwrap();
    let writer = XlsxWriter::new(dir.path());
    let sheet = Sheet {
        name: "Jefes".to_string(),
        headers: vec!["Nombre".to_string(), "Estado".to_string()],
        rows: vec![vec!["Ana".to_string(), "Activo".to_string()]],
    };
    let path = writer.write_sheet(&sheet, "jefes.xlsx").unwrap();
    assert_eq!(path, dir.path().join("jefes.xlsx"));
    assert!(std::fs::metadata(&path).unwrap().len() > 0);

    let empty = Sheet {
        rows: Vec::new(),
        ..sheet
    };
    assert!(writer.write_sheet(&empty, "vacio.xlsx").unwrap().exists());
}
