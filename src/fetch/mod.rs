pub mod cache;
pub mod error;
pub mod retry;
pub mod session;
