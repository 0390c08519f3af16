pub mod probe;
pub mod target;
