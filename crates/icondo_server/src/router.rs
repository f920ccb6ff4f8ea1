//! Request routing.
//!
//! # Responsibility
//! - Resolve a path into a `Route` and dispatch by method.
//! - Turn every controller error into its HTTP response.
//!
//! # Invariants
//! - Trailing slashes are ignored (`/condos/` == `/condos`).
//! - `/condominiums/new` is a single route entry whose GET and POST are two
//!   separate controller operations; `/condominiums/{id}/edit` follows the
//!   same shape.

use crate::controller::{self, BodyFormat, ListQuery};
use crate::error::ControllerError;
use crate::response::{self, HttpResponse};
use crate::state::AppState;
use bytes::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request};
use icondo_core::CondominiumId;
use once_cell::sync::Lazy;
use regex::Regex;

static CONDO_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/condos/([^/]+)$").expect("valid condo item route regex"));
static CONDO_PAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/condominiums/([^/]+)/(edit|delete)$").expect("valid condo page route regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Root,
    Health,
    ListPage,
    CreatePage,
    ApiCollection,
    ApiExportCsv,
    /// Raw id segment; parsed at dispatch so bad ids become 400, not 404.
    ApiItem(String),
    /// `/condominiums/{id}/edit`: edit form (GET) and its submission (POST).
    EditPage(String),
    /// `/condominiums/{id}/delete`: delete button of the list page.
    DeletePage(String),
}

/// Resolves a request path to a route.
pub fn resolve(path: &str) -> Option<Route> {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        other => other,
    };

    match trimmed {
        "/" => Some(Route::Root),
        "/health" => Some(Route::Health),
        "/condominiums" => Some(Route::ListPage),
        "/condominiums/new" => Some(Route::CreatePage),
        "/condos" => Some(Route::ApiCollection),
        "/condos/export-csv" => Some(Route::ApiExportCsv),
        other => resolve_item(other),
    }
}

fn resolve_item(path: &str) -> Option<Route> {
    if let Some(captures) = CONDO_ITEM_RE.captures(path) {
        return Some(Route::ApiItem(captures[1].to_string()));
    }
    let captures = CONDO_PAGE_RE.captures(path)?;
    let id = captures[1].to_string();
    match &captures[2] {
        "edit" => Some(Route::EditPage(id)),
        _ => Some(Route::DeletePage(id)),
    }
}

/// Handles one fully-buffered request.
pub async fn dispatch(state: &AppState, request: Request<Bytes>) -> HttpResponse {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();

    let result = match resolve(&path) {
        Some(route) => {
            let content_type = parts
                .headers
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok());
            let incoming = Incoming {
                method: &parts.method,
                query: parts.uri.query(),
                format: BodyFormat::from_content_type(content_type),
                body,
            };
            route_request(state, route, incoming).await
        }
        None => Err(ControllerError::RouteNotFound(path)),
    };

    result.unwrap_or_else(ControllerError::into_response)
}

struct Incoming<'a> {
    method: &'a Method,
    query: Option<&'a str>,
    format: BodyFormat,
    body: Bytes,
}

async fn route_request(
    state: &AppState,
    route: Route,
    incoming: Incoming<'_>,
) -> Result<HttpResponse, ControllerError> {
    let method = incoming.method;
    match route {
        Route::Root => only(method, &Method::GET, "GET")
            .map(|()| response::see_other("/condominiums")),
        Route::Health => only(method, &Method::GET, "GET").map(|()| controller::health()),
        Route::ListPage => {
            only(method, &Method::GET, "GET")?;
            let query = parse_query(incoming.query)?;
            controller::list_condominiums(state, query).await
        }
        Route::CreatePage => match *method {
            Method::GET => controller::render_create_form(state),
            Method::POST => {
                controller::create_condominium(state, incoming.format, incoming.body).await
            }
            _ => Err(ControllerError::MethodNotAllowed("GET, POST")),
        },
        Route::ApiCollection => match *method {
            Method::GET => controller::api_list(state).await,
            Method::POST => controller::api_create(state, incoming.body).await,
            _ => Err(ControllerError::MethodNotAllowed("GET, POST")),
        },
        Route::ApiExportCsv => {
            only(method, &Method::GET, "GET")?;
            controller::api_export_csv(state).await
        }
        Route::EditPage(raw_id) => {
            let id = parse_id(&raw_id)?;
            match *method {
                Method::GET => controller::render_edit_form(state, id).await,
                Method::POST => {
                    controller::update_condominium(state, id, incoming.format, incoming.body).await
                }
                _ => Err(ControllerError::MethodNotAllowed("GET, POST")),
            }
        }
        Route::DeletePage(raw_id) => {
            only(method, &Method::POST, "POST")?;
            controller::delete_condominium(state, parse_id(&raw_id)?).await
        }
        Route::ApiItem(raw_id) => {
            let id = parse_id(&raw_id)?;
            match *method {
                Method::PUT => controller::api_update(state, id, incoming.body).await,
                Method::DELETE => controller::api_delete(state, id).await,
                _ => Err(ControllerError::MethodNotAllowed("PUT, DELETE")),
            }
        }
    }
}

fn only(method: &Method, expected: &Method, allow: &'static str) -> Result<(), ControllerError> {
    if method == expected {
        Ok(())
    } else {
        Err(ControllerError::MethodNotAllowed(allow))
    }
}

fn parse_query(query: Option<&str>) -> Result<ListQuery, ControllerError> {
    match query {
        Some(raw) => serde_urlencoded::from_str(raw)
            .map_err(|err| ControllerError::BadRequest(format!("invalid query string: {err}"))),
        None => Ok(ListQuery::default()),
    }
}

fn parse_id(raw: &str) -> Result<CondominiumId, ControllerError> {
    raw.parse::<CondominiumId>()
        .map_err(|_| ControllerError::BadRequest(format!("invalid condominium id `{raw}`")))
}
