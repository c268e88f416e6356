mod error;
pub mod models;
mod pool;
pub mod repositories;

pub use error::*;
pub use models::{FollowUpRow, InteractionRow, ProspectRow};
pub use pool::*;
pub use repositories::*;
