pub mod batch;
pub mod handlers;
pub mod ranking;
