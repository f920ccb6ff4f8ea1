//! Domain model for condominium records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the wire shape shared by the server API and the list view.
//!
//! # Invariants
//! - Every record is identified by a storage-assigned `CondominiumId`.
//! - `razao_social` is never blank for a persisted record.

pub mod condominium;
