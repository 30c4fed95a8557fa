pub mod group;
pub mod user;

pub use group::*;
pub use user::*;
