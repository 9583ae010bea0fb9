pub mod app;
pub mod cli;
pub mod composer;
pub mod config;
pub mod error;
pub mod mention;
pub mod widgets;
