pub mod config;
pub mod demo;
pub mod error;
pub mod filter;
pub mod goal_editor;
pub mod ledger;
pub mod match_form;
pub mod model;
pub mod season;
pub mod sql_store;
pub mod stats;
pub mod store;
