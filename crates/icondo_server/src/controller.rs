//! Condominium controller.
//!
//! # Responsibility
//! - Bridge decoded requests to `CondominiumService`.
//! - Render the HTML list/create pages and the JSON/CSV API used by the
//!   dashboard list view.
//!
//! # Invariants
//! - Handlers hold no state between requests.
//! - Mutation endpoints answer with the confirmed collection.
//! - Create succeeds loudly: 201 with the record for JSON callers, 303 to the
//!   list page for form posts.
//! - HTML edit/delete posts answer 303 to the list page.

use crate::error::ControllerError;
use crate::response::{self, HttpResponse};
use crate::state::AppState;
use crate::templates::{form_inputs, FORM_TEMPLATE, LIST_TEMPLATE};
use bytes::Bytes;
use hyper::StatusCode;
use icondo_core::{
    Condominium, CondominiumDraft, CondominiumId, CondoListView, ListDisplay, RepoError,
    CSV_CONTENT_TYPE, EMPTY_LIST_MESSAGE, EXPORT_FILE_NAME,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tera::Context;

/// Body encodings accepted by write endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Form,
}

impl BodyFormat {
    /// Picks the decoder from a `Content-Type` value; JSON when absent.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(value)
                if value
                    .trim()
                    .to_ascii_lowercase()
                    .starts_with("application/x-www-form-urlencoded") =>
            {
                Self::Form
            }
            _ => Self::Json,
        }
    }

    fn decode<T: DeserializeOwned>(self, body: &Bytes) -> Result<T, ControllerError> {
        match self {
            Self::Json => serde_json::from_slice(body)
                .map_err(|err| ControllerError::BadRequest(format!("invalid JSON body: {err}"))),
            Self::Form => serde_urlencoded::from_bytes(body)
                .map_err(|err| ControllerError::BadRequest(format!("invalid form body: {err}"))),
        }
    }
}

/// Query string of the HTML list page.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Renders the list page with every stored record.
///
/// `query.q`, when present, filters rows by name exactly as the dashboard
/// search box does.
pub async fn list_condominiums(
    state: &AppState,
    query: ListQuery,
) -> Result<HttpResponse, ControllerError> {
    let condominiums = state
        .with_service(|service| Ok(service.list_condominiums()?))
        .await?;

    let mut view = CondoListView::loaded(condominiums);
    if let Some(search) = query.q {
        view.set_search(search);
    }
    let rows = match view.display() {
        ListDisplay::Rows(rows) => rows,
        ListDisplay::Empty | ListDisplay::Loading => Vec::new(),
    };

    let mut context = Context::new();
    context.insert("rows", &rows);
    context.insert("search", view.search());
    context.insert("empty_message", EMPTY_LIST_MESSAGE);
    let page = state.templates().render(LIST_TEMPLATE, &context)?;
    Ok(response::html(page))
}

/// Renders the empty creation form.
pub fn render_create_form(state: &AppState) -> Result<HttpResponse, ControllerError> {
    render_form(
        state,
        "Novo condomínio",
        "/condominiums/new",
        &CondominiumDraft::default(),
    )
}

/// Renders the edit form pre-filled with record `id`.
pub async fn render_edit_form(
    state: &AppState,
    id: CondominiumId,
) -> Result<HttpResponse, ControllerError> {
    let condominium = state
        .with_service(move |service| {
            service
                .get_condominium(id)?
                .ok_or(ControllerError::Repo(RepoError::NotFound(id)))
        })
        .await?;
    render_form(
        state,
        "Editar condomínio",
        &format!("/condominiums/{id}/edit"),
        &CondominiumDraft::from(&condominium),
    )
}

/// Stores an edit form submission over record `id`.
pub async fn update_condominium(
    state: &AppState,
    id: CondominiumId,
    format: BodyFormat,
    body: Bytes,
) -> Result<HttpResponse, ControllerError> {
    let draft: CondominiumDraft = format.decode(&body)?;
    let condominium = draft.into_condominium(id);
    state
        .with_service(move |service| Ok(service.update_and_list(&condominium)?))
        .await?;
    Ok(response::see_other("/condominiums"))
}

/// Deletes record `id` from the HTML list page.
pub async fn delete_condominium(
    state: &AppState,
    id: CondominiumId,
) -> Result<HttpResponse, ControllerError> {
    state
        .with_service(move |service| Ok(service.delete_and_list(id)?))
        .await?;
    Ok(response::see_other("/condominiums"))
}

fn render_form(
    state: &AppState,
    heading: &str,
    action: &str,
    draft: &CondominiumDraft,
) -> Result<HttpResponse, ControllerError> {
    let mut context = Context::new();
    context.insert("heading", heading);
    context.insert("action", action);
    context.insert("fields", &form_inputs(draft));
    let page = state.templates().render(FORM_TEMPLATE, &context)?;
    Ok(response::html(page))
}

/// Stores the ten submitted fields as a new record.
pub async fn create_condominium(
    state: &AppState,
    format: BodyFormat,
    body: Bytes,
) -> Result<HttpResponse, ControllerError> {
    let draft: CondominiumDraft = format.decode(&body)?;
    let created = state
        .with_service(move |service| Ok(service.create_condominium(draft)?))
        .await?;

    Ok(match format {
        BodyFormat::Json => response::json(StatusCode::CREATED, &created),
        BodyFormat::Form => response::see_other("/condominiums"),
    })
}

/// `GET /condos`: the whole collection as JSON.
pub async fn api_list(state: &AppState) -> Result<HttpResponse, ControllerError> {
    let condominiums = state
        .with_service(|service| Ok(service.list_condominiums()?))
        .await?;
    Ok(response::json(StatusCode::OK, &condominiums))
}

/// `GET /condos/export-csv`: the whole collection as a CSV attachment.
pub async fn api_export_csv(state: &AppState) -> Result<HttpResponse, ControllerError> {
    let csv = state
        .with_service(|service| Ok(service.export_csv()?))
        .await?;
    Ok(response::attachment(CSV_CONTENT_TYPE, EXPORT_FILE_NAME, csv))
}

/// `POST /condos`: create, then answer with the confirmed collection.
pub async fn api_create(state: &AppState, body: Bytes) -> Result<HttpResponse, ControllerError> {
    let draft: CondominiumDraft = BodyFormat::Json.decode(&body)?;
    let condominiums = state
        .with_service(move |service| Ok(service.create_and_list(draft)?))
        .await?;
    Ok(response::json(StatusCode::CREATED, &condominiums))
}

/// `PUT /condos/{id}`: replace the record, then answer with the confirmed
/// collection. The path id wins over any `id` in the body, which may be
/// omitted.
pub async fn api_update(
    state: &AppState,
    id: CondominiumId,
    body: Bytes,
) -> Result<HttpResponse, ControllerError> {
    let mut condominium: Condominium = BodyFormat::Json.decode(&body)?;
    condominium.id = id;
    let condominiums = state
        .with_service(move |service| Ok(service.update_and_list(&condominium)?))
        .await?;
    Ok(response::json(StatusCode::OK, &condominiums))
}

/// `DELETE /condos/{id}`: remove the record, then answer with the confirmed
/// collection.
pub async fn api_delete(
    state: &AppState,
    id: CondominiumId,
) -> Result<HttpResponse, ControllerError> {
    let condominiums = state
        .with_service(move |service| Ok(service.delete_and_list(id)?))
        .await?;
    Ok(response::json(StatusCode::OK, &condominiums))
}

pub fn health() -> HttpResponse {
    response::json(
        StatusCode::OK,
        &serde_json::json!({
            "status": "ok",
            "version": icondo_core::core_version(),
        }),
    )
}
