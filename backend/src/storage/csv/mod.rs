//! CSV storage implementation
//!
//! All files live directly in the data directory:
//!
//! - `baby_info.csv`: one-row profile (`Name,Birthday`)
//! - `sleep_log.csv`: `id,start,end`
//! - `feeding_log.csv`: `id,kind,start,end,amount,side,notes`
//! - `pending_sleep.txt`: `start` or `start|end`, absent when no session is pending
//!
//! Timestamps are stored as naive `YYYY-MM-DDTHH:MM` in UTC.

pub mod connection;
pub mod feed_repository;
pub mod pending_sleep_repository;
pub mod profile_repository;
pub mod sleep_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use feed_repository::FeedRepository;
pub use pending_sleep_repository::PendingSleepRepository;
pub use profile_repository::ProfileRepository;
pub use sleep_repository::SleepRepository;
