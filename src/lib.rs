//! Lead Scoring API Library
//!
//! Scores inbound sales leads: validates the submission, normalizes it into
//! the model's feature schema, predicts a purchase-intent class with the
//! exported classifier, maps the class to a base score, and adjusts that
//! score using cues in the free-text comment.
//!
//! # Modules
//!
//! - `api`: API-layer namespace (handlers, routes).
//! - `core`: Scoring namespace (pipeline, model, models, errors).
//! - `config`: Configuration management.
//! - `errors`: HTTP error type and context helpers.
//! - `handlers`: HTTP request handlers.
//! - `model`: Feature schema, artifact loading, preprocessing and forest inference.
//! - `models`: Request, result, and response models.
//! - `normalizer`: Lead to feature vector conversion.
//! - `routes`: Router construction and middleware.
//! - `scoring`: Score mapping, comment reranking, and the pipeline orchestrator.
//! - `store`: Scored lead storage.
//! - `validation`: Lead validation rules.

pub mod api;
pub mod core;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod model;
pub mod models;
pub mod normalizer;
pub mod routes;
pub mod scoring;
pub mod store;
pub mod validation;
