//! Shared fixtures for tests that run against a mock Hub

pub mod mock_server;
