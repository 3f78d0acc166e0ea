//! Shared utility modules used across Folio components.

pub mod trigram;
