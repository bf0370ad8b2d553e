//! Entity to model mappers
//!
//! This module provides conversions between domain entities (hook-core) and database models.
//! `From<Model> for Entity` converts database rows to domain objects.

mod session;
mod user;
mod verification;
