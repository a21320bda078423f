#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "Domain models, persistence, authentication, routing and error handling for"]
#![doc = "the todo list API. The binary (`main.rs`) loads the configuration, builds the"]
#![doc = "`AppState` and serves `app::create_app`."]

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use error::AppError;
pub use state::AppState;
