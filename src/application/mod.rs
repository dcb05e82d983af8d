// Application layer - Use cases
pub mod chart_service;
pub mod dashboard_service;
pub mod energy_repository;
pub mod error;
