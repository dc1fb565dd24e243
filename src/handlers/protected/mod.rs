// handlers/protected/mod.rs - Catalogue handlers (bearer token required)
//
// Routes here are mounted behind `jwt_auth_middleware`, and each method is
// wrapped with `require_permission`. By the time a handler runs the caller
// is authenticated and authorized; handlers only validate input and call
// the store.

pub mod characters;
pub mod games;
