//! Route handlers

pub mod drinks;
pub mod health;
