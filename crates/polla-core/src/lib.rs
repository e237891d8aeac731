// Library root: the console's domain layer. The terminal front-end in
// `polla-tui` drives everything through these modules.

pub mod auth;
pub mod config;
pub mod forms;
pub mod http;
pub mod listing;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod mock_backend;
