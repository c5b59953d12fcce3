pub mod api;
pub mod api_doc;
pub mod config;
pub mod server;
pub mod state;

pub use server::run_server;
