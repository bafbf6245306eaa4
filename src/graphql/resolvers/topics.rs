use crate::graphql::compose::ModuleFields;
use crate::graphql::schema::GatewayContext;
use crate::graphql::types::{Topic, TopicPage};
use async_graphql::{Context, FieldResult, Object};

/// The topic module's contribution to the composed schema.
pub fn fields() -> ModuleFields {
    ModuleFields {
        module: "topics",
        queries: &["topics"],
        mutations: &["createTopic", "deleteTopic"],
    }
}

/// Query fields for topics
#[derive(Default)]
pub struct TopicQuery;

#[Object]
impl TopicQuery {
    /// Lists one page of topics, resuming at `nextToken` when given.
    async fn topics(
        &self,
        ctx: &Context<'_>,
        next_token: Option<String>,
    ) -> FieldResult<TopicPage> {
        let context = ctx.data::<GatewayContext>()?;

        match context.messaging.list_topics(next_token.as_deref()).await {
            Ok(page) => Ok(page.into()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Mutation fields for topics
#[derive(Default)]
pub struct TopicMutation;

#[Object]
impl TopicMutation {
    /// Creates a new topic, or returns the ARN of an existing one.
    async fn create_topic(&self, ctx: &Context<'_>, name: String) -> FieldResult<Topic> {
        let context = ctx.data::<GatewayContext>()?;

        match context.messaging.create_topic(&name).await {
            Ok(topic) => Ok(topic.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a topic; returns the call's request id.
    async fn delete_topic(&self, ctx: &Context<'_>, arn: String) -> FieldResult<String> {
        let context = ctx.data::<GatewayContext>()?;

        match context.messaging.delete_topic(&arn).await {
            Ok(request_id) => Ok(request_id),
            Err(e) => Err(e.into()),
        }
    }
}
