mod follow_ups;
mod health;
mod prospects;
pub mod sse;
mod stats;
mod suggestions;

pub use follow_ups::*;
pub use health::*;
pub use prospects::*;
pub use stats::*;
pub use suggestions::*;
