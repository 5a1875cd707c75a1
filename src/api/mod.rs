pub mod location;
pub mod punch;
pub mod reference;
pub mod report;
