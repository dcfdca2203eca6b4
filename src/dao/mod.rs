//! Persistence seam for quiz definitions consumed by the session engine.

pub mod models;
pub mod quiz_store;
pub mod storage;
