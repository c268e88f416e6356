mod follow_up_repository;
mod prospect_repository;

pub use follow_up_repository::*;
pub use prospect_repository::*;
