pub mod app;
pub mod auth;
pub mod cancel;
pub mod config;
pub mod error;
pub mod format;
pub mod gallery;
pub mod logging;
pub mod model;
pub mod mvi;
pub mod permissions;
pub mod routes;
pub mod services;
pub mod session;
pub mod ui;
