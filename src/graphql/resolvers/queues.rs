use crate::domain;
use crate::graphql::compose::ModuleFields;
use crate::graphql::schema::GatewayContext;
use crate::graphql::types::{Message, Queue, QueueAttributesInput, SentMessage};
use async_graphql::{Context, FieldResult, Object};

/// The queue module's contribution to the composed schema.
pub fn fields() -> ModuleFields {
    ModuleFields {
        module: "queues",
        queries: &["queue", "queues", "receiveMessages"],
        mutations: &["createQueue", "deleteQueue", "sendMessage", "deleteMessage"],
    }
}

/// Query fields for queues and their messages
#[derive(Default)]
pub struct QueueQuery;

#[Object]
impl QueueQuery {
    /// A queue by url. Materialized locally; no remote call is made until a
    /// nested field needs one.
    async fn queue(&self, url: String) -> Queue {
        domain::Queue { url }.into()
    }

    /// Lists queues. Only queues whose name begins with `prefix` are
    /// returned when it is given.
    async fn queues(&self, ctx: &Context<'_>, prefix: Option<String>) -> FieldResult<Vec<Queue>> {
        let context = ctx.data::<GatewayContext>()?;

        match context.messaging.list_queues(prefix.as_deref()).await {
            Ok(queues) => Ok(queues.into_iter().map(|q| q.into()).collect()),
            Err(e) => Err(e.into()),
        }
    }

    /// Receives the messages currently available on a queue.
    async fn receive_messages(
        &self,
        ctx: &Context<'_>,
        queue_url: String,
    ) -> FieldResult<Vec<Message>> {
        let context = ctx.data::<GatewayContext>()?;

        match context.messaging.receive_messages(&queue_url).await {
            Ok(messages) => Ok(messages.into_iter().map(|m| m.into()).collect()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Mutation fields for queues and their messages
#[derive(Default)]
pub struct QueueMutation;

#[Object]
impl QueueMutation {
    /// Creates a new queue, or returns the URL of an existing one.
    async fn create_queue(
        &self,
        ctx: &Context<'_>,
        name: String,
        attributes: Option<QueueAttributesInput>,
    ) -> FieldResult<Queue> {
        let context = ctx.data::<GatewayContext>()?;
        let attributes = attributes.map(|a| a.into_attribute_map()).unwrap_or_default();

        match context.messaging.create_queue(&name, attributes).await {
            Ok(queue) => Ok(queue.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a queue; returns the call's request id.
    async fn delete_queue(&self, ctx: &Context<'_>, url: String) -> FieldResult<String> {
        let context = ctx.data::<GatewayContext>()?;

        match context.messaging.delete_queue(&url).await {
            Ok(request_id) => Ok(request_id),
            Err(e) => Err(e.into()),
        }
    }

    /// Sends one message body to a queue.
    async fn send_message(
        &self,
        ctx: &Context<'_>,
        queue_url: String,
        body: String,
    ) -> FieldResult<SentMessage> {
        let context = ctx.data::<GatewayContext>()?;

        match context.messaging.send_message(&queue_url, &body).await {
            Ok(sent) => Ok(sent.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes one received message instance by receipt handle; returns the
    /// call's request id.
    async fn delete_message(
        &self,
        ctx: &Context<'_>,
        queue_url: String,
        receipt_handle: String,
    ) -> FieldResult<String> {
        let context = ctx.data::<GatewayContext>()?;

        match context
            .messaging
            .delete_message(&queue_url, &receipt_handle)
            .await
        {
            Ok(request_id) => Ok(request_id),
            Err(e) => Err(e.into()),
        }
    }
}
