//! Entity identity
//!
//! Entities are owned by the external lifecycle collaborator; the reaction
//! core only refers to them by id.

pub mod entity;

pub use entity::Entity;
