//! Background indexing of shared links into the duplicate registry.

pub mod worker;

pub use worker::{BatchReport, IndexingWorker};
