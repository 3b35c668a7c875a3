//! Core business logic - framework-agnostic services, one module per entity.
//!
//! Handlers in [`crate::api`] only translate HTTP into calls to these
//! functions. Every service validates its input, checks referenced rows, and
//! goes through [`repository`] for lookups, deletes and paged searches.

pub mod address;
pub mod category;
pub mod order;
pub mod order_item;
pub mod pagination;
pub mod password;
pub mod product;
pub mod repository;
pub mod session;
pub mod supplier;
pub mod user;
pub mod validation;
