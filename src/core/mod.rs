/// Core modules: configuration, constants, errors, logging and page state
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pages;
