pub mod aws;
pub mod in_memory;

pub use aws::AwsMessaging;
pub use in_memory::InMemoryMessaging;

use crate::domain::{
    AttributeMap, Message, Queue, QueueAttributeName, QueueAttributes, SentMessage, Topic,
    TopicPage,
};
use crate::error::Result;
use async_trait::async_trait;

/// The outbound seam: one method per remote messaging-service call.
///
/// Implementations normalize the service's response shapes into the
/// canonical domain types at the call site, so resolvers never deal with
/// upstream inconsistencies. No retry, no timeout; a failed call surfaces as
/// a `GatewayError` on the field that issued it.
#[async_trait]
pub trait Messaging: Send + Sync {
    /// Creates a queue, or returns the existing one with the same name.
    async fn create_queue(&self, name: &str, attributes: AttributeMap) -> Result<Queue>;

    /// Lists queues, optionally restricted to names starting with `prefix`.
    async fn list_queues(&self, prefix: Option<&str>) -> Result<Vec<Queue>>;

    /// Fetches the named attributes of one queue.
    async fn queue_attributes(
        &self,
        url: &str,
        names: &[QueueAttributeName],
    ) -> Result<QueueAttributes>;

    /// Deletes a queue; returns the call's request id.
    async fn delete_queue(&self, url: &str) -> Result<String>;

    /// Sends one message body to a queue.
    async fn send_message(&self, queue_url: &str, body: &str) -> Result<SentMessage>;

    /// Receives the currently available messages of a queue. Each receive
    /// mints fresh receipt handles, superseding earlier ones.
    async fn receive_messages(&self, queue_url: &str) -> Result<Vec<Message>>;

    /// Deletes one received message instance; returns the call's request id.
    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> Result<String>;

    /// Creates a topic, or returns the existing one with the same name.
    async fn create_topic(&self, name: &str) -> Result<Topic>;

    /// Deletes a topic; returns the call's request id.
    async fn delete_topic(&self, arn: &str) -> Result<String>;

    /// Lists one page of topics, resuming at `next_token` when given.
    async fn list_topics(&self, next_token: Option<&str>) -> Result<TopicPage>;
}
