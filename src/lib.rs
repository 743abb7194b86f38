//! weekset - weekly working-set tracker
//!
//! Pick a week, record how many sets each muscle group got, and chart the
//! weekly breakdown or a muscle's trend over the last months.

pub mod catalog;
pub mod charts;
pub mod db;
pub mod error;
pub mod tracker;
pub mod tui;
pub mod week;
pub mod weekly;

pub use db::{KeyValueStore, MemoryStore, SqliteStore};
pub use error::{TrackerError, ValidationError};
pub use tracker::Tracker;
