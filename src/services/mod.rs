pub mod processor;
pub mod staging;
