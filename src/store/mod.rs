//! Cache stores. Only an in-process store exists; nothing is persisted.

pub mod memory;
