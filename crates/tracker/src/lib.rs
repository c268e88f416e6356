//! Prospect tracking engine: the entity store service and everything that
//! reacts to its mutations (next follow-up dates, color codes, gamification
//! counters, accountability rollups).

pub mod accountability;
pub mod clock;
pub mod error;
pub mod gamification;
pub mod locks;
pub mod service;
pub mod store;
pub mod sync;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, TrackerError};
pub use gamification::{
    GamificationStore, GamificationTracker, InMemoryGamificationStore, JsonFileGamificationStore,
};
pub use locks::ProspectLocks;
pub use service::{ProspectService, DEFAULT_UPCOMING_WINDOW_DAYS};
pub use store::{FollowUpStore, ProspectStore};
