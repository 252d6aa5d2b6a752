//! # Storage Module
//!
//! Handles all data persistence for the baby tracker.
//!
//! The domain layer only sees the traits in [`traits`]; the CSV implementation
//! in [`csv`] is constructed once at startup and injected into the services.
//! Nothing outside this module knows about file paths.
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: flat CSV files in a single data directory
//! - **Atomic rewrites**: deletes and profile saves write a temp file and rename it

pub mod csv;
pub mod traits;

pub use self::csv::CsvConnection;
pub use traits::{FeedStorage, PendingSleepStorage, ProfileStorage, SleepStorage};
