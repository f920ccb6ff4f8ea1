//! Export formats for the condominium collection.

pub mod csv;
