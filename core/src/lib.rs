pub mod cache;
pub mod export;
pub mod models;
pub mod notify;
pub mod remote;
pub mod stats;
pub mod sync;
