// Domain layer - Core business models
pub mod battery;
pub mod chart;
pub mod energy;
