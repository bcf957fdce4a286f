//! Generic key-value store endpoints

pub mod handler;

// vim: ts=4
