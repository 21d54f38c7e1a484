pub mod collector;
pub mod config;
pub mod data_models;
pub mod matcher;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod summarizer;
