//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod patch;
pub mod export;
pub mod auth;
pub mod storage;
pub mod genre;
pub mod developer;
pub mod game;
pub mod user;
#[cfg(test)]
pub mod test_support;
