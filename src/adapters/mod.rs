pub mod memory_history;
pub mod tracing_listener;

#[cfg(not(target_arch = "wasm32"))]
pub mod http_backend;
