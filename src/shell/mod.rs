// Composition root.
//
// Responsibilities
// - Read config from flags and the environment.
// - Instantiate concrete infrastructure implementations and wire them into
//   use case handlers.
// - Expose the HTTP router and GraphQL schema to the binary.

pub mod actor;
pub mod config;
pub mod graphql;
pub mod http;
pub mod state;
