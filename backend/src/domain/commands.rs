//! Domain-level command types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST and HTML layers map the public DTOs
//! defined in the `shared` crate (already normalized to UTC) to these types.

pub mod profile {
    /// Input for saving the baby profile.
    #[derive(Debug, Clone)]
    pub struct SaveProfileCommand {
        pub name: String,
        pub birthdate: String,
    }
}

pub mod sleep {
    use chrono::{DateTime, Utc};

    /// Input for appending a sleep interval to the log.
    #[derive(Debug, Clone)]
    pub struct LogSleepCommand {
        pub start: DateTime<Utc>,
        pub end: DateTime<Utc>,
    }

    /// Input for committing the pending session with confirmed times.
    #[derive(Debug, Clone)]
    pub struct ConfirmSleepCommand {
        pub start: DateTime<Utc>,
        pub end: DateTime<Utc>,
    }
}

pub mod feed {
    use chrono::{DateTime, Utc};
    use shared::{BreastSide, FeedKind};

    /// Input for appending a feeding to the log.
    #[derive(Debug, Clone)]
    pub struct LogFeedCommand {
        pub kind: FeedKind,
        pub start: DateTime<Utc>,
        pub end: DateTime<Utc>,
        pub amount_ounces: f64,
        pub side: Option<BreastSide>,
        pub notes: String,
    }
}
