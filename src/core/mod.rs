pub mod builtin_models;
pub mod bus;
pub mod config;
pub mod session;
pub mod state;
