// src/handlers/mod.rs

pub mod assistant;
pub mod attempt;
pub mod auth;
pub mod quiz;
