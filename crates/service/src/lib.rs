//! Service layer providing generic CRUD operations on top of models.
//! - `crud` holds the entity-agnostic record service.
//! - Per-entity services specialize it through `crud::ModelKind`.
//! - Database errors pass through unchanged; `NotFound` is raised here.

pub mod errors;
pub mod pagination;
pub mod crud;
pub mod post_service;
#[cfg(test)]
pub mod test_support;
#[cfg(test)]
mod tests;

pub use crud::{ModelKind, ModelService, RecordId};
pub use errors::ServiceError;
pub use pagination::{PageWindow, PaginatedList, Pagination, PerPage};
