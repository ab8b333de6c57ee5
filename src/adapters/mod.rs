//! Infrastructure adapters. Implement ports.
//!
//! Completion Service clients, HTTP and terminal front ends. Map errors to DomainError.

pub mod ai;
pub mod ui;
pub mod web;
