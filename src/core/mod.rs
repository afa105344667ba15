pub mod context;
pub mod engine;
pub mod pending;
pub mod retry;
