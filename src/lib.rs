pub mod analytics;
pub mod cli;
pub mod dashboard_service;
pub mod database;
pub mod database_factory;
pub mod date_provider;
pub mod error;
pub mod format;
pub mod id_generator;
pub mod models;
pub mod report;
pub mod row_factories;
pub mod seed;
pub mod validation;
