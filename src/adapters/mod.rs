// Adapters layer: concrete implementations for external systems (user store, plan store).

pub mod memory;
