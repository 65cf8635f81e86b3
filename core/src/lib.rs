pub mod select;
pub mod types;
