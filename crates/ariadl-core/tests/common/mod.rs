//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod fake_aria2;
pub mod site_server;
