//! Job offer catalog: listing with filters, stats, matching and import.

pub mod catalog;
pub mod handlers;
