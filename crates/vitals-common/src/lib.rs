pub mod bmi;
pub mod models;
pub mod scoring;
