pub mod comparison;
pub mod price;
pub mod simulation;
pub mod strategy;
