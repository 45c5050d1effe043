// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup wiring
// - infrastructure: Postgres, geocoding, crypto and image storage adapters
// - presentation: HTTP handlers and routing
// - application: ports, use cases and access policy
// - domain: users and places

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
