mod accountability;
mod follow_up;
mod gamification;
mod interaction;
mod prospect;

pub use accountability::*;
pub use follow_up::*;
pub use gamification::*;
pub use interaction::*;
pub use prospect::*;
