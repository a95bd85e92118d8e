//! Unit tests

mod config_test;
