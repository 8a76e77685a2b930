pub mod app;
pub mod classify;
pub mod status;
