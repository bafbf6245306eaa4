use crate::graphql::compose::{compose, CompositionError};
use crate::graphql::resolvers::{queues, topics, QueueMutation, QueueQuery, TopicMutation, TopicQuery};
use crate::messaging::Messaging;
use async_graphql::{EmptySubscription, MergedObject, Schema};
use std::sync::Arc;

/// GraphQL context threaded through query execution. Holds the one shared
/// messaging client handle; resolvers close over nothing else.
pub struct GatewayContext {
    pub messaging: Arc<dyn Messaging>,
}

/// Root query, merged from the per-resource modules
#[derive(MergedObject, Default)]
pub struct Query(QueueQuery, TopicQuery);

/// Root mutation, merged from the per-resource modules
#[derive(MergedObject, Default)]
pub struct Mutation(QueueMutation, TopicMutation);

/// The complete GraphQL schema
pub type GatewaySchema = Schema<Query, Mutation, EmptySubscription>;

/// Composes the resource modules and builds the schema over the given
/// messaging backend. Fails when two modules declare the same field name.
pub fn create_schema(messaging: Arc<dyn Messaging>) -> Result<GatewaySchema, CompositionError> {
    compose(&[queues::fields(), topics::fields()])?;

    Ok(Schema::build(Query::default(), Mutation::default(), EmptySubscription)
        .data(GatewayContext { messaging })
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::InMemoryMessaging;

    #[test]
    fn schema_exposes_the_composed_root_fields() {
        let schema = create_schema(Arc::new(InMemoryMessaging::new())).unwrap();
        let sdl = schema.sdl();

        for field in ["queues", "receiveMessages", "topics"] {
            assert!(sdl.contains(field), "missing query field {field}");
        }
        for field in ["createQueue", "deleteQueue", "sendMessage", "deleteMessage", "createTopic", "deleteTopic"] {
            assert!(sdl.contains(field), "missing mutation field {field}");
        }
    }
}
