//! Utility library for Nexus REST.

pub mod collections;
