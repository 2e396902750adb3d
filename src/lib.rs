pub mod calendar;
pub mod cli;
pub mod clients;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod service;
