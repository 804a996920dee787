// src/models/mod.rs

pub mod access_code;
pub mod ai_thread;
pub mod attempt;
pub mod user;
