// ABOUTME: Library root for atkmod - container plugin driven module deployment lifecycle.
// ABOUTME: The atk binary in main.rs is a thin CLI over these modules.

pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod hooks;
pub mod lifecycle;
pub mod manifest;
pub mod runner;
