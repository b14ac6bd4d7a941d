pub mod download;
pub mod process;
pub mod types;
pub mod upload;
