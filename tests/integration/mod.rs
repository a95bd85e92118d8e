//! Integration tests

#[path = "../common/mod.rs"]
mod common;
