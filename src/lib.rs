pub mod config;
pub mod error;
pub mod feasibility;
pub mod grouping;
pub mod loader;
pub mod model;
pub mod optimizer;
pub mod packing;
pub mod reports;
pub mod sample;
pub mod units;
pub mod writer;
// cmd and tables are binary modules (see main.rs).
