//! HTTP gateway, configuration and process wiring around the worker pool.

pub mod config;
pub mod gateway;
pub mod handlers;
pub mod telemetry;
