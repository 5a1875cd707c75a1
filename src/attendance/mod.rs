pub mod clock;
pub mod sessions;
pub mod state_machine;
