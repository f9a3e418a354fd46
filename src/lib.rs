//! Course Teams API Library
//!
//! REST backend for managing exercise teams, grading criteria and system
//! notifications within courses: domain logic, authorization policy,
//! repositories and the HTTP adapter.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod services;
