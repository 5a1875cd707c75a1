pub mod location;
pub mod punch;
pub mod role;
pub mod session;
pub mod user;
