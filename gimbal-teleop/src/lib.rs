pub mod cli;
pub mod config;
pub mod error;
pub mod gimbal_control;
pub mod gimbal_defs;
pub mod gimbal_request;
pub mod gimbal_state;
pub mod http_client;
pub mod key_input;
pub mod session;
pub mod transport;
