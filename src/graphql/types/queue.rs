use crate::domain::{self, prune_unset, AttributeMap, QueueAttributeName};
use crate::graphql::schema::GatewayContext;
use async_graphql::{Context, FieldResult, InputObject, Object};
use std::collections::BTreeMap;

/// GraphQL representation of a Queue
#[derive(Clone)]
pub struct Queue {
    pub inner: domain::Queue,
}

impl From<domain::Queue> for Queue {
    fn from(queue: domain::Queue) -> Self {
        Self { inner: queue }
    }
}

#[Object]
impl Queue {
    /// The url for the message queue.
    async fn url(&self) -> &str {
        &self.inner.url
    }

    /// The queue's attributes, restricted to `names` when given.
    ///
    /// Fetched lazily: listing queues issues no attribute calls; selecting
    /// this field issues one call per queue.
    async fn attributes(
        &self,
        ctx: &Context<'_>,
        names: Option<Vec<QueueAttributeName>>,
    ) -> Option<FieldResult<QueueAttributes>> {
        let context = match ctx.data::<GatewayContext>() {
            Ok(context) => context,
            Err(e) => return Some(Err(e)),
        };
        let names = names.unwrap_or_else(|| vec![QueueAttributeName::All]);

        match context
            .messaging
            .queue_attributes(&self.inner.url, &names)
            .await
        {
            Ok(attributes) => Some(Ok(attributes.into())),
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// GraphQL representation of a queue's attribute bag
#[derive(Clone)]
pub struct QueueAttributes {
    pub inner: domain::QueueAttributes,
}

impl From<domain::QueueAttributes> for QueueAttributes {
    fn from(attributes: domain::QueueAttributes) -> Self {
        Self { inner: attributes }
    }
}

#[Object]
impl QueueAttributes {
    /// The time in seconds that delivery of all messages in the queue is
    /// delayed.
    async fn delay_seconds(&self) -> Option<&str> {
        self.inner.delay_seconds.as_deref()
    }

    /// The limit of how many bytes a message can contain before the queue
    /// rejects it.
    async fn maximum_message_size(&self) -> Option<&str> {
        self.inner.maximum_message_size.as_deref()
    }

    /// The number of seconds the queue retains a message.
    async fn message_retention_period(&self) -> Option<&str> {
        self.inner.message_retention_period.as_deref()
    }

    /// The queue's access policy document.
    async fn policy(&self) -> Option<&str> {
        self.inner.policy.as_deref()
    }

    /// The time a receive call waits for a message to arrive.
    async fn receive_message_wait_time_seconds(&self) -> Option<&str> {
        self.inner.receive_message_wait_time_seconds.as_deref()
    }

    /// The visibility timeout for the queue, in seconds.
    async fn visibility_timeout(&self) -> Option<&str> {
        self.inner.visibility_timeout.as_deref()
    }
}

/// Attribute bag accepted on queue creation. Unset fields are pruned before
/// the bag is forwarded, so the remote call only sees explicitly set values.
#[derive(InputObject, Debug, Clone, Default)]
pub struct QueueAttributesInput {
    /// The time in seconds that delivery of all messages in the queue is
    /// delayed. An integer from 0 to 900. Defaults to 0.
    pub delay_seconds: Option<String>,
    /// The limit of how many bytes a message can contain. An integer from
    /// 1024 up to 262144. Defaults to 262144 (256 KiB).
    pub maximum_message_size: Option<String>,
    /// The number of seconds the queue retains a message, from 60 to
    /// 1209600. Defaults to 345600 (4 days).
    pub message_retention_period: Option<String>,
    /// The queue's policy. A valid AWS policy document.
    pub policy: Option<String>,
    /// The time in seconds a receive call waits for a message to arrive,
    /// from 0 to 20. Defaults to 0.
    pub receive_message_wait_time_seconds: Option<String>,
    /// The visibility timeout for the queue, from 0 to 43200 seconds.
    /// Defaults to 30.
    pub visibility_timeout: Option<String>,
}

impl QueueAttributesInput {
    pub fn into_attribute_map(self) -> AttributeMap {
        prune_unset(BTreeMap::from([
            (QueueAttributeName::DelaySeconds, self.delay_seconds),
            (
                QueueAttributeName::MaximumMessageSize,
                self.maximum_message_size,
            ),
            (
                QueueAttributeName::MessageRetentionPeriod,
                self.message_retention_period,
            ),
            (QueueAttributeName::Policy, self.policy),
            (
                QueueAttributeName::ReceiveMessageWaitTimeSeconds,
                self.receive_message_wait_time_seconds,
            ),
            (QueueAttributeName::VisibilityTimeout, self.visibility_timeout),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_input_fields_are_pruned_from_the_outgoing_bag() {
        let input = QueueAttributesInput {
            delay_seconds: Some("5".to_string()),
            visibility_timeout: Some("60".to_string()),
            ..Default::default()
        };

        let map = input.into_attribute_map();

        assert_eq!(
            map,
            BTreeMap::from([
                (QueueAttributeName::DelaySeconds, "5".to_string()),
                (QueueAttributeName::VisibilityTimeout, "60".to_string()),
            ])
        );
    }

    #[test]
    fn fully_unset_input_forwards_an_empty_bag() {
        assert!(QueueAttributesInput::default().into_attribute_map().is_empty());
    }
}
