// Domain layer - Equipment data, summaries and view models
pub mod chart;
pub mod dashboard;
pub mod equipment;
pub mod history;
pub mod summary;
pub mod table;
pub mod user;
