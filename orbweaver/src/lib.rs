// Include the server module directly from server.rs
#[path = "server.rs"]
pub mod server;

// Re-export the pieces integration tests drive
pub use server::{AppState, router, serve};
