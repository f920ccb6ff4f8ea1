use chrono::{TimeZone, Utc};
use icondo_core::view::{
    DeletePrompt, Downloader, FetchAdapter, FetchError, FetchMethod, FetchRequest, FetchResponse,
    Notification, Notifier,
};
use icondo_core::{Condominium, CondominiumDraft, CondoListView, ListDisplay, EMPTY_LIST_MESSAGE};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

/// Replays scripted responses and records every request.
#[derive(Default)]
struct ScriptedAdapter {
    responses: RefCell<VecDeque<Result<FetchResponse, FetchError>>>,
    requests: RefCell<Vec<FetchRequest>>,
}

impl ScriptedAdapter {
    fn push_json<T: serde::Serialize>(&self, status: u16, body: &T) -> &Self {
        self.responses.borrow_mut().push_back(Ok(FetchResponse {
            status,
            data: serde_json::to_vec(body).unwrap(),
        }));
        self
    }

    fn push_raw(&self, status: u16, data: &[u8]) -> &Self {
        self.responses.borrow_mut().push_back(Ok(FetchResponse {
            status,
            data: data.to_vec(),
        }));
        self
    }

    fn push_transport_error(&self) -> &Self {
        self.responses
            .borrow_mut()
            .push_back(Err(FetchError::Transport("connection refused".to_string())));
        self
    }
}

impl FetchAdapter for ScriptedAdapter {
    fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".to_string())))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    seen: RefCell<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.borrow_mut().push(notification);
    }
}

#[derive(Default)]
struct MemoryDownloader {
    fail: bool,
    saved: RefCell<Vec<(String, Vec<u8>)>>,
}

impl Downloader for MemoryDownloader {
    fn save(&self, file_name: &str, data: &[u8]) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.saved
            .borrow_mut()
            .push((file_name.to_string(), data.to_vec()));
        Ok(())
    }
}

fn condo(id: i64, name: &str) -> Condominium {
    Condominium {
        id,
        razao_social: name.to_string(),
        logradouro: Some("Rua A".to_string()),
        numend: Some("1".to_string()),
        complend: None,
        bairro: Some("Centro".to_string()),
        cidade: Some("Curitiba".to_string()),
        uf: Some("PR".to_string()),
        cep: Some("80000-000".to_string()),
        telefone: Some("(41) 3000-0000".to_string()),
        cnpj: None,
        localidade: Some("Curitiba - PR".to_string()),
        created_at: Utc
            .with_ymd_and_hms(2024, 5, 15, 9, 30, 0)
            .unwrap()
            .timestamp_millis(),
    }
}

fn loaded_view(condos: &[Condominium]) -> CondoListView {
    let adapter = ScriptedAdapter::default();
    adapter.push_json(200, &condos);
    let mut view = CondoListView::new();
    view.load(&adapter, &RecordingNotifier::default());
    view
}

#[test]
fn starts_loading_with_empty_state() {
    let view = CondoListView::new();
    assert!(view.is_loading());
    assert!(view.condos().is_empty());
    assert_eq!(view.search(), "");
    assert_eq!(view.display(), ListDisplay::Loading);
}

#[test]
fn load_success_replaces_collection_and_clears_loading() {
    let adapter = ScriptedAdapter::default();
    adapter.push_json(200, &vec![condo(2, "Beta"), condo(1, "Alfa")]);
    let notifier = RecordingNotifier::default();

    let mut view = CondoListView::new();
    view.load(&adapter, &notifier);

    assert!(!view.is_loading());
    let ids = view.condos().iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![2, 1]);
    assert!(notifier.seen.borrow().is_empty());

    let requests = adapter.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, FetchMethod::Get);
    assert_eq!(requests[0].path, "condos");
}

#[test]
fn load_server_error_notifies_and_leaves_collection_empty() {
    let adapter = ScriptedAdapter::default();
    adapter.push_json(500, &serde_json::json!({"error": "boom"}));
    let notifier = RecordingNotifier::default();

    let mut view = CondoListView::new();
    view.load(&adapter, &notifier);

    assert!(!view.is_loading());
    assert!(view.condos().is_empty());
    let seen = notifier.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].title, "Erro");
    assert!(seen[0]
        .description
        .as_deref()
        .unwrap()
        .contains("carregar os condomínios"));
}

#[test]
fn load_transport_or_decode_failure_is_reported_the_same_way() {
    for script in [0, 1] {
        let adapter = ScriptedAdapter::default();
        if script == 0 {
            adapter.push_transport_error();
        } else {
            adapter.push_raw(200, b"not json");
        }
        let notifier = RecordingNotifier::default();
        let mut view = CondoListView::new();
        view.load(&adapter, &notifier);

        assert!(!view.is_loading());
        assert!(view.condos().is_empty());
        assert_eq!(notifier.seen.borrow().len(), 1);
    }
}

#[test]
fn filter_is_case_insensitive_substring_on_name() {
    let mut view = loaded_view(&[condo(1, "Condomínio Alfa"), condo(2, "Residencial Beta")]);

    view.set_search("alfa");
    let hits = view.filtered();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 1);

    view.set_search("");
    assert_eq!(view.filtered().len(), 2);

    view.set_search("RESIDENCIAL");
    assert_eq!(view.filtered()[0].id, 2);
    assert_eq!(view.condos().len(), 2);
}

#[test]
fn filter_matches_exactly_the_lowercase_containment_set() {
    let names = ["Alfa", "alfaville", "Beta", "ALFA Sul", "Gama"];
    let condos = names
        .iter()
        .enumerate()
        .map(|(i, name)| condo(i as i64 + 1, name))
        .collect::<Vec<_>>();
    let mut view = loaded_view(&condos);

    for search in ["", "a", "alf", "ALFA", "sul", "zzz", "Ga"] {
        view.set_search(search);
        let expected = condos
            .iter()
            .filter(|c| {
                c.razao_social
                    .to_lowercase()
                    .contains(&search.to_lowercase())
            })
            .map(|c| c.id)
            .collect::<Vec<_>>();
        let actual = view.filtered().iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(actual, expected, "search `{search}`");
    }
}

#[test]
fn display_renders_one_row_per_record() {
    let view = loaded_view(&[condo(1, "Alfa"), condo(2, "Beta"), condo(3, "Gama")]);
    let now = Utc.with_ymd_and_hms(2024, 5, 15, 18, 0, 0).unwrap();

    match view.display_at(&now) {
        ListDisplay::Rows(rows) => {
            assert_eq!(rows.len(), 3);
            let first = &rows[0];
            assert_eq!(first.name, "Alfa");
            assert_eq!(first.locality, "Curitiba - PR");
            assert_eq!(first.street, "Rua A");
            assert_eq!(first.neighborhood, "Centro");
            assert_eq!(first.postal_code, "80000-000");
            assert_eq!(first.phone, "(41) 3000-0000");
            assert_eq!(first.created, "hoje às 09:30");
            assert_eq!(first.actions, ["Editar", "Excluir"]);
        }
        other => panic!("expected rows, got {other:?}"),
    }
}

#[test]
fn empty_collection_shows_literal_message() {
    let view = loaded_view(&[]);
    assert!(!view.is_loading());
    assert_eq!(view.display(), ListDisplay::Empty);
    assert_eq!(EMPTY_LIST_MESSAGE, "Nenhum condomínio encontrado.");
}

#[test]
fn search_without_hits_shows_empty_state_not_error() {
    let mut view = loaded_view(&[condo(1, "Alfa")]);
    view.set_search("omega");
    assert_eq!(view.display(), ListDisplay::Empty);
}

#[test]
fn export_saves_condominios_csv_and_notifies_success() {
    let adapter = ScriptedAdapter::default();
    adapter.push_raw(200, b"id,razao_social\n1,Alfa\n");
    let downloader = MemoryDownloader::default();
    let notifier = RecordingNotifier::default();

    let mut view = loaded_view(&[condo(1, "Alfa")]);
    assert!(view.export_csv(&adapter, &downloader, &notifier));

    let saved = downloader.saved.borrow();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, "condominios.csv");
    assert_eq!(saved[0].1, b"id,razao_social\n1,Alfa\n");
    assert_eq!(adapter.requests.borrow()[0].path, "condos/export-csv");
    assert_eq!(
        notifier.seen.borrow().as_slice(),
        &[Notification::titled("Sucesso ao baixar CSV")]
    );
}

#[test]
fn export_failures_always_end_in_a_notification() {
    for case in 0..3 {
        let adapter = ScriptedAdapter::default();
        let downloader = MemoryDownloader {
            fail: case == 2,
            ..MemoryDownloader::default()
        };
        match case {
            0 => {
                adapter.push_transport_error();
            }
            1 => {
                adapter.push_raw(500, b"{}");
            }
            _ => {
                adapter.push_raw(200, b"id\n");
            }
        }
        let notifier = RecordingNotifier::default();

        // Never loaded: the loading flag is still set before export.
        let mut view = CondoListView::new();
        assert!(!view.export_csv(&adapter, &downloader, &notifier), "case {case}");

        let seen = notifier.seen.borrow();
        assert_eq!(seen.len(), 1, "case {case}");
        assert_eq!(seen[0].title, "Ocorreu algum erro");
        assert!(!view.is_loading(), "case {case}");
        assert!(downloader.saved.borrow().is_empty());
    }
}

#[test]
fn create_posts_draft_and_replaces_with_confirmed_collection() {
    let mut view = loaded_view(&[condo(1, "Alfa")]);
    let adapter = ScriptedAdapter::default();
    adapter.push_json(201, &vec![condo(1, "Alfa"), condo(2, "Beta")]);
    let notifier = RecordingNotifier::default();

    let acknowledged = view.create(&adapter, &notifier, &CondominiumDraft::new("Beta"));

    assert!(acknowledged);
    assert_eq!(view.condos().len(), 2);
    let request = &adapter.requests.borrow()[0];
    assert_eq!(request.method, FetchMethod::Post);
    assert_eq!(request.path, "condos");
    let body: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
    assert_eq!(body["razao_social"], "Beta");
}

#[test]
fn update_puts_full_record_to_its_path() {
    let mut view = loaded_view(&[condo(1, "Alfa")]);
    let mut edited = condo(1, "Alfa Nova");
    edited.bairro = Some("Batel".to_string());
    let adapter = ScriptedAdapter::default();
    adapter.push_json(200, &vec![edited.clone()]);

    assert!(view.update(&adapter, &RecordingNotifier::default(), &edited));
    assert_eq!(view.condos()[0].razao_social, "Alfa Nova");
    let request = &adapter.requests.borrow()[0];
    assert_eq!(request.method, FetchMethod::Put);
    assert_eq!(request.path, "condos/1");
}

#[test]
fn delete_prompt_carries_id_and_name() {
    let record = condo(9, "Edifício Sol");
    let prompt = DeletePrompt::for_record(&record);
    assert_eq!(prompt.id, 9);
    assert_eq!(prompt.razao_social, "Edifício Sol");
    assert!(prompt.message().contains("Edifício Sol"));

    let mut view = loaded_view(&[record]);
    let adapter = ScriptedAdapter::default();
    adapter.push_json(200, &Vec::<Condominium>::new());
    assert!(view.delete(&adapter, &RecordingNotifier::default(), &prompt));
    assert!(view.condos().is_empty());
    let request = &adapter.requests.borrow()[0];
    assert_eq!(request.method, FetchMethod::Delete);
    assert_eq!(request.path, "condos/9");
    assert!(request.body.is_none());
}

#[test]
fn failed_mutation_keeps_state_and_notifies() {
    let mut view = loaded_view(&[condo(1, "Alfa")]);
    let adapter = ScriptedAdapter::default();
    adapter.push_json(404, &serde_json::json!({"error": "condominium not found: 1"}));
    let notifier = RecordingNotifier::default();

    let acknowledged = view.delete(&adapter, &notifier, &DeletePrompt::for_record(&condo(1, "Alfa")));

    assert!(!acknowledged);
    assert_eq!(view.condos().len(), 1);
    assert_eq!(notifier.seen.borrow()[0].title, "Erro");
}
