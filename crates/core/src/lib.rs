//! Core business logic for beanbook.

pub mod services;

pub use services::*;
