// Crate root library declaration and module exports.
pub mod calendar;
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod form;
pub mod importer;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod reconciler;
pub mod storage;
pub mod store;

pub use error::WaiverError;
