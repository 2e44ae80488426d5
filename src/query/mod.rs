pub mod cache;
pub mod processor;
