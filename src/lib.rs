pub mod domain;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod messaging;
pub mod server;
