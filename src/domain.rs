use async_graphql::Enum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Names of the queue attributes the gateway exposes.
///
/// `ALL` is only meaningful when selecting attributes to fetch; it is never
/// a key in an attribute bag.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum QueueAttributeName {
    All,
    DelaySeconds,
    MaximumMessageSize,
    MessageRetentionPeriod,
    Policy,
    ReceiveMessageWaitTimeSeconds,
    VisibilityTimeout,
}

impl QueueAttributeName {
    /// The name SQS uses on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueAttributeName::All => "All",
            QueueAttributeName::DelaySeconds => "DelaySeconds",
            QueueAttributeName::MaximumMessageSize => "MaximumMessageSize",
            QueueAttributeName::MessageRetentionPeriod => "MessageRetentionPeriod",
            QueueAttributeName::Policy => "Policy",
            QueueAttributeName::ReceiveMessageWaitTimeSeconds => "ReceiveMessageWaitTimeSeconds",
            QueueAttributeName::VisibilityTimeout => "VisibilityTimeout",
        }
    }
}

/// An attribute bag with every value explicitly set.
pub type AttributeMap = BTreeMap<QueueAttributeName, String>;

/// Drops entries whose value is absent, keeping everything else unchanged.
///
/// Remote calls must only receive explicitly set attributes; this is the one
/// normalization rule shared by every resolver that forwards an attribute
/// bag. Pruning an already pruned bag is a no-op.
pub fn prune_unset(bag: BTreeMap<QueueAttributeName, Option<String>>) -> AttributeMap {
    bag.into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
}

/// A queue, identified by its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub url: String,
}

/// The queue attribute bag as SQS reports it. All values are transmitted as
/// strings; an attribute the service did not return stays `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueAttributes {
    pub delay_seconds: Option<String>,
    pub maximum_message_size: Option<String>,
    pub message_retention_period: Option<String>,
    pub policy: Option<String>,
    pub receive_message_wait_time_seconds: Option<String>,
    pub visibility_timeout: Option<String>,
}

impl QueueAttributes {
    /// Keeps only the named attributes. Selecting `ALL` (or nothing) keeps
    /// the full bag.
    pub fn select(&self, names: &[QueueAttributeName]) -> QueueAttributes {
        if names.is_empty() || names.contains(&QueueAttributeName::All) {
            return self.clone();
        }
        let mut selected = QueueAttributes::default();
        for name in names {
            match name {
                QueueAttributeName::All => {}
                QueueAttributeName::DelaySeconds => {
                    selected.delay_seconds = self.delay_seconds.clone()
                }
                QueueAttributeName::MaximumMessageSize => {
                    selected.maximum_message_size = self.maximum_message_size.clone()
                }
                QueueAttributeName::MessageRetentionPeriod => {
                    selected.message_retention_period = self.message_retention_period.clone()
                }
                QueueAttributeName::Policy => selected.policy = self.policy.clone(),
                QueueAttributeName::ReceiveMessageWaitTimeSeconds => {
                    selected.receive_message_wait_time_seconds =
                        self.receive_message_wait_time_seconds.clone()
                }
                QueueAttributeName::VisibilityTimeout => {
                    selected.visibility_timeout = self.visibility_timeout.clone()
                }
            }
        }
        selected
    }
}

/// One received message instance. The receipt handle is single-use: a later
/// receive of the same logical message supersedes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
    pub body_md5: Option<String>,
}

/// Acknowledgement of a sent message. Upstream reports the body digest as
/// either `MD5OfMessageBody` or `MD5OfBody` depending on the call; both
/// normalize to `body_md5` here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub message_id: String,
    pub body_md5: Option<String>,
    pub attributes_md5: Option<String>,
}

/// A topic, identified by its ARN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub arn: String,
}

/// One page of a topic listing. `next_token` resumes the listing where this
/// page left off; `None` means the listing is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPage {
    pub topics: Vec<Topic>,
    pub next_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_removes_exactly_the_unset_keys() {
        let bag = BTreeMap::from([
            (QueueAttributeName::DelaySeconds, Some("5".to_string())),
            (QueueAttributeName::Policy, None),
            (QueueAttributeName::VisibilityTimeout, Some("30".to_string())),
            (QueueAttributeName::MaximumMessageSize, None),
        ]);

        let pruned = prune_unset(bag);

        assert_eq!(
            pruned,
            BTreeMap::from([
                (QueueAttributeName::DelaySeconds, "5".to_string()),
                (QueueAttributeName::VisibilityTimeout, "30".to_string()),
            ])
        );
    }

    #[test]
    fn prune_is_idempotent() {
        let bag = BTreeMap::from([
            (QueueAttributeName::DelaySeconds, Some("0".to_string())),
            (QueueAttributeName::Policy, None),
        ]);

        let once = prune_unset(bag);
        let again = prune_unset(once.iter().map(|(k, v)| (*k, Some(v.clone()))).collect());

        assert_eq!(once, again);
    }

    #[test]
    fn select_keeps_only_named_attributes() {
        let attrs = QueueAttributes {
            delay_seconds: Some("0".to_string()),
            visibility_timeout: Some("30".to_string()),
            message_retention_period: Some("345600".to_string()),
            ..Default::default()
        };

        let selected = attrs.select(&[QueueAttributeName::VisibilityTimeout]);

        assert_eq!(selected.visibility_timeout, Some("30".to_string()));
        assert_eq!(selected.delay_seconds, None);
        assert_eq!(selected.message_retention_period, None);
    }

    #[test]
    fn select_all_keeps_the_full_bag() {
        let attrs = QueueAttributes {
            delay_seconds: Some("0".to_string()),
            policy: Some("{}".to_string()),
            ..Default::default()
        };

        assert_eq!(attrs.select(&[QueueAttributeName::All]), attrs);
        assert_eq!(attrs.select(&[]), attrs);
    }
}
