//! In-memory search over loaded condominium collections.
//!
//! # Responsibility
//! - Derive filtered views without touching the underlying collection.

pub mod filter;
