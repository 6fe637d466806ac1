//! Fiscal Registration Search API Library
//!
//! This library provides the core functionality for the registration search
//! service: normalizing search form input, filtering the CSV dataset, and
//! exporting results as CSV or XLSX.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `data`: Data access layer.
//! - `app`: Router assembly.
//! - `config`: Configuration management.
//! - `csv_provider`: Dataset loading and row filtering.
//! - `errors`: Error handling types.
//! - `export_service`: CSV/XLSX export encoding.
//! - `handlers`: HTTP request handlers.
//! - `models`: Records and request/response models.
//! - `query_normalizer`: Search form normalization.
//! - `search_service`: Search pipeline.

pub mod api;
pub mod core;
pub mod data;

// Re-export primary modules for shared use in tests and other binaries
pub mod app;
pub mod config;
pub mod csv_provider;
pub mod errors;
pub mod export_service;
pub mod handlers;
pub mod models;
pub mod query_normalizer;
pub mod search_service;
