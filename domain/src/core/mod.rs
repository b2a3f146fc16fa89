//! Core domain building blocks

pub mod error;
