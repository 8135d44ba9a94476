// src/models/mod.rs

pub mod auth;
pub mod filter;
pub mod record;
