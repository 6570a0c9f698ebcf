// Library target exists for the criterion benchmarks and the integration
// tests. The binary entry point is main.rs; this file re-declares the module
// tree so harnesses can import types via `quizdr::engine::*` /
// `quizdr::app::App`. Some code is only exercised through the binary, so
// suppress dead_code warnings.
#![allow(dead_code)]

pub mod app;
pub mod bank;
pub mod config;
pub mod engine;
pub mod selector;
pub mod session;
pub mod store;
pub mod ui;

// Private: only the binary's event loop needs it
mod event;
