//! Warden Core: domain models, repository traits and the error taxonomy
//! shared by every crate of the resource server admin plane.

pub mod error;
pub mod models;
pub mod repository;
