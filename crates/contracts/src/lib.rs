//! Общие типы и логика для frontend и backend панели администратора Tausi
//!
//! Everything here is target-independent: it compiles for `wasm32` (frontend) and
//! native (backend) alike and performs no I/O.

pub mod domain;
pub mod shared;
