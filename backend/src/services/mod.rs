//! Business logic services for the Ice Watch backend

pub mod dashboard;

pub use dashboard::DashboardService;
