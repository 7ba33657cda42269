pub mod document;
pub mod evaluation;
pub mod judge;
pub mod team;
