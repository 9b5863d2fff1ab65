//! Chess rules engine with a rule-of-thumb tutor, served over HTTP.

pub mod api;
pub mod config;
pub mod engine;
pub mod tutor;
