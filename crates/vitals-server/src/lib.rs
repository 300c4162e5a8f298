pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod records;
pub mod report;
pub mod state;
pub mod templates;
pub mod web;
