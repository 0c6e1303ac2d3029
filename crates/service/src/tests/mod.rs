/// CRUD operations through the generic record service
pub mod crud_tests;
