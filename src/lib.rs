//! Monster Arena - turn-based monster battles against a personality-driven AI

pub mod battle;
pub mod core;
pub mod monster;
pub mod service;
