#[macro_use]
pub mod md;
pub mod sys;
