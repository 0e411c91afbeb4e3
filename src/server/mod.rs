// Server module entry point
// Provides listener creation, connection handling, and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword and cannot name a module, so the file is mapped in
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
