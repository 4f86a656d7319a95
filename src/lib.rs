pub mod config;
pub mod crawler;
pub mod errors;
pub mod extraction;
pub mod graph;
pub mod report;
pub mod source;
pub mod types;
