pub mod chart;
pub mod db;
pub mod output;
pub mod reports;
pub mod session;
pub mod stats;
