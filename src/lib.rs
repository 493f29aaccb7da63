#![forbid(unsafe_code)]

pub mod app;
pub mod catalog;
pub mod cli;
pub mod collection;
pub mod commands;
pub mod config;
pub mod extract;
pub mod logging;
pub mod openai;
pub mod schema;
pub mod store;
pub mod summary;
pub mod view;
