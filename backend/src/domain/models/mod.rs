pub mod feed;
pub mod pending_sleep;
pub mod profile;
pub mod sleep;
pub mod timestamp;

pub use feed::FeedEvent;
pub use pending_sleep::PendingSleep;
pub use profile::Profile;
pub use sleep::SleepEvent;
