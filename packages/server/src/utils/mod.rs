pub mod filename;
pub mod jwt;
pub mod roster;
pub mod snapshot;
