// Library target for integration tests, benchmarks and the `build_catalog`
// helper. The terminal binary's entry point is main.rs, which re-declares the
// module tree. Some items are only reached through the binary.
#![allow(dead_code)]

pub mod app;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod services;
pub mod session;
pub mod store;

// Private: presentation only.
mod event;
mod ui;
