//! Domain models for the Ice Watch dashboard

mod location;
mod record;
mod status;

pub use location::*;
pub use record::*;
pub use status::*;
