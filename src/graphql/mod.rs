pub mod compose;
pub mod resolvers;
pub mod schema;
pub mod types;

pub use schema::{create_schema, GatewayContext, GatewaySchema};
