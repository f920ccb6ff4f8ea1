//! Condominium list view state model.
//!
//! # Responsibility
//! - Hold the dashboard's transient copy of the collection, its loading flag
//!   and its search text.
//! - Drive load/export/create/update/delete through injected seams
//!   (`FetchAdapter`, `Notifier`, `Downloader`) so any front end can host it.
//!
//! # Invariants
//! - The local collection is only ever replaced wholesale with a
//!   server-confirmed collection.
//! - No operation leaves the view in a terminal error state; failures become
//!   notifications.

pub mod adapter;
pub mod list_view;
pub mod relative_time;
pub mod toast;

pub use adapter::{FetchAdapter, FetchError, FetchMethod, FetchRequest, FetchResponse};
pub use list_view::{CondoListView, DeletePrompt, ListDisplay, ListRow, EMPTY_LIST_MESSAGE};
pub use relative_time::format_relative_pt_br;
pub use toast::{Downloader, Notification, Notifier};
