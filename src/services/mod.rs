pub mod cost_basis;
pub mod holdings;
pub mod portfolio_service;
