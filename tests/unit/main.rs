//! Unit test suite entry point.

mod config_tests;
mod engine_tests;
mod export_tests;
mod translate_tests;
