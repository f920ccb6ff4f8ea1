//! Searchable condominium table state.
//!
//! # Responsibility
//! - Load the collection once, filter it per keystroke and project it into
//!   display rows.
//! - Run export and the create/update/delete round-trips, replacing local
//!   state with the confirmed collection on acknowledgment.
//!
//! # Invariants
//! - `loading` starts `true` and is cleared by the first load attempt,
//!   whatever its outcome.
//! - A failed load leaves the collection empty.
//! - Filtering never mutates `condos`.

use super::adapter::{
    FetchAdapter, FetchError, FetchMethod, FetchRequest, FetchResponse, CONDOS_PATH,
    EXPORT_CSV_PATH,
};
use super::relative_time::format_relative_pt_br;
use super::toast::{Downloader, Notification, Notifier};
use crate::export::csv::EXPORT_FILE_NAME;
use crate::model::condominium::{Condominium, CondominiumDraft, CondominiumId};
use crate::search::filter::filter_by_razao_social;
use chrono::{DateTime, Local, TimeZone, Utc};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Message shown when the filtered view is empty.
pub const EMPTY_LIST_MESSAGE: &str = "Nenhum condomínio encontrado.";

const LOAD_ERROR_TITLE: &str = "Erro";
const LOAD_ERROR_DESCRIPTION: &str =
    "Ocorreu um erro ao carregar os condomínios, por favor contatar o suporte";
const EXPORT_OK_TITLE: &str = "Sucesso ao baixar CSV";
const EXPORT_ERROR_TITLE: &str = "Ocorreu algum erro";
const EXPORT_ERROR_DESCRIPTION: &str = "Por favor contatar um administrador";
const MUTATION_ERROR_TITLE: &str = "Erro";

/// Per-row actions offered by the row menu.
pub const ROW_ACTIONS: [&str; 2] = ["Editar", "Excluir"];

/// What the table area shows for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListDisplay {
    /// Spinner in place of the table.
    Loading,
    /// Literal [`EMPTY_LIST_MESSAGE`].
    Empty,
    /// One row per filtered record, in server order.
    Rows(Vec<ListRow>),
}

/// Display projection of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub id: CondominiumId,
    pub name: String,
    pub locality: String,
    pub street: String,
    pub neighborhood: String,
    pub postal_code: String,
    pub phone: String,
    pub created: String,
    pub actions: [&'static str; 2],
}

impl ListRow {
    fn project<Tz: TimeZone>(condominium: &Condominium, now: &DateTime<Tz>) -> Self {
        let created = DateTime::<Utc>::from_timestamp_millis(condominium.created_at)
            .map(|created| {
                format_relative_pt_br(
                    created.with_timezone(&now.timezone()).naive_local(),
                    now.naive_local(),
                )
            })
            .unwrap_or_default();

        Self {
            id: condominium.id,
            name: condominium.razao_social.clone(),
            locality: text(condominium.localidade.as_deref()),
            street: text(condominium.logradouro.as_deref()),
            neighborhood: text(condominium.bairro.as_deref()),
            postal_code: text(condominium.cep.as_deref()),
            phone: text(condominium.telefone.as_deref()),
            created,
            actions: ROW_ACTIONS,
        }
    }
}

/// Data carried by the delete confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub id: CondominiumId,
    pub razao_social: String,
}

impl DeletePrompt {
    pub fn for_record(condominium: &Condominium) -> Self {
        Self {
            id: condominium.id,
            razao_social: condominium.razao_social.clone(),
        }
    }

    /// Confirmation question shown to the user.
    pub fn message(&self) -> String {
        format!(
            "Tem certeza que deseja excluir o condomínio {}?",
            self.razao_social
        )
    }
}

/// Dashboard list state: collection, loading flag and search text.
#[derive(Debug, Clone)]
pub struct CondoListView {
    condos: Vec<Condominium>,
    loading: bool,
    search: String,
}

impl Default for CondoListView {
    fn default() -> Self {
        Self::new()
    }
}

impl CondoListView {
    pub fn new() -> Self {
        Self {
            condos: Vec::new(),
            loading: true,
            search: String::new(),
        }
    }

    /// Builds a view over an already-fetched collection (server-side pages).
    pub fn loaded(condos: Vec<Condominium>) -> Self {
        Self {
            condos,
            loading: false,
            search: String::new(),
        }
    }

    pub fn condos(&self) -> &[Condominium] {
        &self.condos
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Updates the search text; the filtered view is recomputed on read.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Replaces the collection with a server-confirmed one.
    pub fn replace_condos(&mut self, condos: Vec<Condominium>) {
        self.condos = condos;
    }

    /// Records matching the current search, in server order.
    pub fn filtered(&self) -> Vec<&Condominium> {
        filter_by_razao_social(&self.condos, &self.search)
    }

    /// Fetches the full collection.
    ///
    /// Success replaces the collection; any failure notifies and leaves the
    /// collection empty. The loading flag is cleared either way.
    pub fn load<A, N>(&mut self, adapter: &A, notifier: &N)
    where
        A: FetchAdapter + ?Sized,
        N: Notifier + ?Sized,
    {
        match fetch_json::<Vec<Condominium>, _>(adapter, FetchRequest::get(CONDOS_PATH), 200) {
            Ok(condos) => {
                info!(
                    "event=list_view_load module=view status=ok count={}",
                    condos.len()
                );
                self.condos = condos;
            }
            Err(err) => {
                warn!("event=list_view_load module=view status=error error={err}");
                self.condos.clear();
                notifier.notify(Notification::with_description(
                    LOAD_ERROR_TITLE,
                    LOAD_ERROR_DESCRIPTION,
                ));
            }
        }
        self.loading = false;
    }

    /// Downloads the CSV export and hands it to `downloader` as
    /// `condominios.csv`.
    ///
    /// Never fails past this call: the outcome is reported via `notifier`
    /// and returned. A failure also clears the loading flag.
    pub fn export_csv<A, D, N>(&mut self, adapter: &A, downloader: &D, notifier: &N) -> bool
    where
        A: FetchAdapter + ?Sized,
        D: Downloader + ?Sized,
        N: Notifier + ?Sized,
    {
        let outcome = expect_status(adapter.fetch(FetchRequest::get(EXPORT_CSV_PATH)), 200)
            .and_then(|response| {
                downloader
                    .save(EXPORT_FILE_NAME, &response.data)
                    .map_err(|err| FetchError::Transport(err.to_string()))
            });

        match outcome {
            Ok(()) => {
                info!("event=list_view_export module=view status=ok file={EXPORT_FILE_NAME}");
                notifier.notify(Notification::titled(EXPORT_OK_TITLE));
                true
            }
            Err(err) => {
                warn!("event=list_view_export module=view status=error error={err}");
                notifier.notify(Notification::with_description(
                    EXPORT_ERROR_TITLE,
                    EXPORT_ERROR_DESCRIPTION,
                ));
                self.loading = false;
                false
            }
        }
    }

    /// Submits a creation form; returns whether the server acknowledged it.
    pub fn create<A, N>(&mut self, adapter: &A, notifier: &N, draft: &CondominiumDraft) -> bool
    where
        A: FetchAdapter + ?Sized,
        N: Notifier + ?Sized,
    {
        let request = json_request(FetchMethod::Post, CONDOS_PATH.to_string(), draft);
        self.apply_mutation(
            adapter,
            notifier,
            request,
            "Condomínio adicionado",
            "Não foi possível adicionar o condomínio",
        )
    }

    /// Submits an edit form for `condominium`; returns whether the server
    /// acknowledged it.
    pub fn update<A, N>(&mut self, adapter: &A, notifier: &N, condominium: &Condominium) -> bool
    where
        A: FetchAdapter + ?Sized,
        N: Notifier + ?Sized,
    {
        let request = json_request(
            FetchMethod::Put,
            format!("{CONDOS_PATH}/{}", condominium.id),
            condominium,
        );
        self.apply_mutation(
            adapter,
            notifier,
            request,
            "Condomínio atualizado",
            "Não foi possível atualizar o condomínio",
        )
    }

    /// Confirms a delete prompt; returns whether the server acknowledged it.
    pub fn delete<A, N>(&mut self, adapter: &A, notifier: &N, prompt: &DeletePrompt) -> bool
    where
        A: FetchAdapter + ?Sized,
        N: Notifier + ?Sized,
    {
        let request = Ok(FetchRequest {
            method: FetchMethod::Delete,
            path: format!("{CONDOS_PATH}/{}", prompt.id),
            body: None,
        });
        self.apply_mutation(
            adapter,
            notifier,
            request,
            "Condomínio excluído",
            "Não foi possível excluir o condomínio",
        )
    }

    /// Projects the current state for rendering, relative to local "now".
    pub fn display(&self) -> ListDisplay {
        self.display_at(&Local::now())
    }

    /// Projects the current state for rendering, relative to `now`.
    pub fn display_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ListDisplay {
        if self.loading {
            return ListDisplay::Loading;
        }

        let rows = self
            .filtered()
            .into_iter()
            .map(|condominium| ListRow::project(condominium, now))
            .collect::<Vec<_>>();

        if rows.is_empty() {
            ListDisplay::Empty
        } else {
            ListDisplay::Rows(rows)
        }
    }

    fn apply_mutation<A, N>(
        &mut self,
        adapter: &A,
        notifier: &N,
        request: Result<FetchRequest, FetchError>,
        ok_title: &str,
        error_description: &str,
    ) -> bool
    where
        A: FetchAdapter + ?Sized,
        N: Notifier + ?Sized,
    {
        let method = request
            .as_ref()
            .map(|request| request.method.as_str())
            .unwrap_or("?");
        let confirmed = request.and_then(|request| {
            let response = adapter.fetch(request)?;
            if !(200..300).contains(&response.status) {
                return Err(FetchError::Status(response.status));
            }
            Ok(serde_json::from_slice::<Vec<Condominium>>(&response.data)?)
        });

        match confirmed {
            Ok(condos) => {
                info!(
                    "event=list_view_mutation module=view status=ok method={method} count={}",
                    condos.len()
                );
                self.condos = condos;
                notifier.notify(Notification::titled(ok_title));
                true
            }
            Err(err) => {
                warn!(
                    "event=list_view_mutation module=view status=error method={method} error={err}"
                );
                notifier.notify(Notification::with_description(
                    MUTATION_ERROR_TITLE,
                    error_description,
                ));
                false
            }
        }
    }
}

fn fetch_json<T, A>(adapter: &A, request: FetchRequest, expected: u16) -> Result<T, FetchError>
where
    T: DeserializeOwned,
    A: FetchAdapter + ?Sized,
{
    let response = expect_status(adapter.fetch(request), expected)?;
    Ok(serde_json::from_slice(&response.data)?)
}

fn expect_status(
    response: Result<FetchResponse, FetchError>,
    expected: u16,
) -> Result<FetchResponse, FetchError> {
    let response = response?;
    if response.status != expected {
        return Err(FetchError::Status(response.status));
    }
    Ok(response)
}

fn json_request<T: Serialize>(
    method: FetchMethod,
    path: String,
    body: &T,
) -> Result<FetchRequest, FetchError> {
    let body = serde_json::to_vec(body)?;
    Ok(FetchRequest::with_json(method, path, body))
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}
