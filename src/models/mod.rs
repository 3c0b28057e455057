pub mod person;
pub mod snapshot;

pub use person::{CycleStatus, PersonRecord, Presence};
pub use snapshot::SystemSnapshot;
