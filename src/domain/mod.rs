//! Domain layer - core business logic and entities

pub mod dex;
pub mod route;
pub mod token;
