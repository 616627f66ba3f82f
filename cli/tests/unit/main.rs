//! Unit tests for the Local Beach CLI
//!
//! These tests use mocked container engines and object stores and run fast
//! without external processes or network access.

mod environment_loading;
mod local_beach_service;
mod mocks;
