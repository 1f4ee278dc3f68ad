//! Domain layer - core business logic and entities

pub mod execution;
pub mod price;
pub mod quote;
pub mod registry;
