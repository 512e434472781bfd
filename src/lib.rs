pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod repository;
pub mod services;

pub use domain::*;
pub use services::*;
