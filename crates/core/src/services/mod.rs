pub mod comparison_service;
pub mod report_service;
pub mod simulation_service;
