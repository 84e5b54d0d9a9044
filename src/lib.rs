//! Catalog, bookings and contact messages for the Amazônia Viva tourism
//! guide, persisted as JSON collections in an embedded SQLite key-value table
//! and browsed through a Ratatui front-end.
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod models;
pub mod ui;

/// Entry point for everything that reads or mutates stored data.
pub use catalog::{Catalog, Change};

pub use config::AppConfig;
pub use error::{CatalogError, Result};
pub use export::ExportKind;
pub use filter::DurationBucket;
pub use logging::init_logging;

pub use models::{Booking, BookingDraft, Category, Contact, ContactDraft, Stats, Tour, TourDraft};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
