pub mod analytics;
pub mod config;
pub mod history;
pub mod jobs;
pub mod storage;
