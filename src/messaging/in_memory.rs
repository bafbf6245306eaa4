use super::Messaging;
use crate::domain::{
    AttributeMap, Message, Queue, QueueAttributeName, QueueAttributes, SentMessage, Topic,
    TopicPage,
};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use md5::{Digest, Md5};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

const ACCOUNT: &str = "000000000000";
const REGION: &str = "us-east-1";
const DEFAULT_TOPIC_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
struct StoredMessage {
    message_id: String,
    body: String,
    body_md5: String,
    // Minted fresh on every receive; the previous handle is superseded.
    receipt_handle: Option<String>,
}

#[derive(Debug, Clone)]
struct QueueState {
    attributes: QueueAttributes,
    messages: VecDeque<StoredMessage>,
}

/// In-memory messaging backend for tests and `--local` mode.
///
/// Models just enough SQS/SNS semantics to exercise the gateway:
/// prefix-filtered listing, per-queue attribute bags, receipt handles that
/// a later receive supersedes, MD5 body digests, and paginated topic
/// listing. Attribute fetches are counted so laziness is observable.
pub struct InMemoryMessaging {
    // Keyed by queue url / topic arn; BTreeMap keeps listings deterministic.
    queues: Mutex<BTreeMap<String, QueueState>>,
    topics: Mutex<Vec<Topic>>,
    attribute_fetches: AtomicUsize,
    topic_page_size: usize,
}

impl Default for InMemoryMessaging {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessaging {
    pub fn new() -> Self {
        Self {
            queues: Mutex::new(BTreeMap::new()),
            topics: Mutex::new(Vec::new()),
            attribute_fetches: AtomicUsize::new(0),
            topic_page_size: DEFAULT_TOPIC_PAGE_SIZE,
        }
    }

    pub fn with_topic_page_size(mut self, page_size: usize) -> Self {
        self.topic_page_size = page_size;
        self
    }

    /// Registers a queue under the given url with default attributes.
    pub fn seed_queue_url(&self, url: &str) {
        let mut queues = self.queues.lock().unwrap();
        queues.insert(
            url.to_string(),
            QueueState {
                attributes: default_attributes(),
                messages: VecDeque::new(),
            },
        );
    }

    /// How many attribute fetches have been issued so far.
    pub fn attribute_fetches(&self) -> usize {
        self.attribute_fetches.load(Ordering::SeqCst)
    }

    fn queue_url(name: &str) -> String {
        format!("https://sqs.{REGION}.amazonaws.com/{ACCOUNT}/{name}")
    }

    fn topic_arn(name: &str) -> String {
        format!("arn:aws:sns:{REGION}:{ACCOUNT}:{name}")
    }

    fn queue_name(url: &str) -> &str {
        url.rsplit('/').next().unwrap_or(url)
    }
}

fn default_attributes() -> QueueAttributes {
    // The SQS service defaults.
    QueueAttributes {
        delay_seconds: Some("0".to_string()),
        maximum_message_size: Some("262144".to_string()),
        message_retention_period: Some("345600".to_string()),
        policy: None,
        receive_message_wait_time_seconds: Some("0".to_string()),
        visibility_timeout: Some("30".to_string()),
    }
}

fn apply_attributes(attrs: &mut QueueAttributes, overrides: &AttributeMap) {
    for (name, value) in overrides {
        match name {
            QueueAttributeName::All => {}
            QueueAttributeName::DelaySeconds => attrs.delay_seconds = Some(value.clone()),
            QueueAttributeName::MaximumMessageSize => {
                attrs.maximum_message_size = Some(value.clone())
            }
            QueueAttributeName::MessageRetentionPeriod => {
                attrs.message_retention_period = Some(value.clone())
            }
            QueueAttributeName::Policy => attrs.policy = Some(value.clone()),
            QueueAttributeName::ReceiveMessageWaitTimeSeconds => {
                attrs.receive_message_wait_time_seconds = Some(value.clone())
            }
            QueueAttributeName::VisibilityTimeout => attrs.visibility_timeout = Some(value.clone()),
        }
    }
}

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

fn request_id() -> String {
    Uuid::new_v4().to_string()
}

#[async_trait]
impl Messaging for InMemoryMessaging {
    async fn create_queue(&self, name: &str, attributes: AttributeMap) -> Result<Queue> {
        let url = Self::queue_url(name);
        let mut queues = self.queues.lock().unwrap();
        if !queues.contains_key(&url) {
            let mut attrs = default_attributes();
            apply_attributes(&mut attrs, &attributes);
            debug!(name = %name, url = %url, "Creating queue");
            queues.insert(
                url.clone(),
                QueueState {
                    attributes: attrs,
                    messages: VecDeque::new(),
                },
            );
        }
        Ok(Queue { url })
    }

    async fn list_queues(&self, prefix: Option<&str>) -> Result<Vec<Queue>> {
        let queues = self.queues.lock().unwrap();
        Ok(queues
            .keys()
            .filter(|url| match prefix {
                Some(prefix) => Self::queue_name(url).starts_with(prefix),
                None => true,
            })
            .map(|url| Queue { url: url.clone() })
            .collect())
    }

    async fn queue_attributes(
        &self,
        url: &str,
        names: &[QueueAttributeName],
    ) -> Result<QueueAttributes> {
        self.attribute_fetches.fetch_add(1, Ordering::SeqCst);
        let queues = self.queues.lock().unwrap();
        let state = queues
            .get(url)
            .ok_or_else(|| GatewayError::QueueNotFound(url.to_string()))?;
        Ok(state.attributes.select(names))
    }

    async fn delete_queue(&self, url: &str) -> Result<String> {
        let mut queues = self.queues.lock().unwrap();
        queues
            .remove(url)
            .ok_or_else(|| GatewayError::QueueNotFound(url.to_string()))?;
        debug!(url = %url, "Deleted queue");
        Ok(request_id())
    }

    async fn send_message(&self, queue_url: &str, body: &str) -> Result<SentMessage> {
        let mut queues = self.queues.lock().unwrap();
        let state = queues
            .get_mut(queue_url)
            .ok_or_else(|| GatewayError::QueueNotFound(queue_url.to_string()))?;
        let message = StoredMessage {
            message_id: Uuid::new_v4().to_string(),
            body: body.to_string(),
            body_md5: md5_hex(body),
            receipt_handle: None,
        };
        let sent = SentMessage {
            message_id: message.message_id.clone(),
            body_md5: Some(message.body_md5.clone()),
            attributes_md5: None,
        };
        state.messages.push_back(message);
        Ok(sent)
    }

    async fn receive_messages(&self, queue_url: &str) -> Result<Vec<Message>> {
        let mut queues = self.queues.lock().unwrap();
        let state = queues
            .get_mut(queue_url)
            .ok_or_else(|| GatewayError::QueueNotFound(queue_url.to_string()))?;
        Ok(state
            .messages
            .iter_mut()
            .map(|message| {
                let handle = Uuid::new_v4().to_string();
                message.receipt_handle = Some(handle.clone());
                Message {
                    message_id: message.message_id.clone(),
                    receipt_handle: handle,
                    body: message.body.clone(),
                    body_md5: Some(message.body_md5.clone()),
                }
            })
            .collect())
    }

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> Result<String> {
        let mut queues = self.queues.lock().unwrap();
        let state = queues
            .get_mut(queue_url)
            .ok_or_else(|| GatewayError::QueueNotFound(queue_url.to_string()))?;
        let position = state
            .messages
            .iter()
            .position(|message| message.receipt_handle.as_deref() == Some(receipt_handle))
            .ok_or_else(|| GatewayError::InvalidReceiptHandle(receipt_handle.to_string()))?;
        state.messages.remove(position);
        Ok(request_id())
    }

    async fn create_topic(&self, name: &str) -> Result<Topic> {
        let arn = Self::topic_arn(name);
        let mut topics = self.topics.lock().unwrap();
        if !topics.iter().any(|topic| topic.arn == arn) {
            debug!(name = %name, arn = %arn, "Creating topic");
            topics.push(Topic { arn: arn.clone() });
        }
        Ok(Topic { arn })
    }

    async fn delete_topic(&self, arn: &str) -> Result<String> {
        let mut topics = self.topics.lock().unwrap();
        let position = topics
            .iter()
            .position(|topic| topic.arn == arn)
            .ok_or_else(|| GatewayError::TopicNotFound(arn.to_string()))?;
        topics.remove(position);
        Ok(request_id())
    }

    async fn list_topics(&self, next_token: Option<&str>) -> Result<TopicPage> {
        let start = match next_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| GatewayError::InvalidParameter(format!("next token: {token}")))?,
            None => 0,
        };
        let topics = self.topics.lock().unwrap();
        let page: Vec<Topic> = topics
            .iter()
            .skip(start)
            .take(self.topic_page_size)
            .cloned()
            .collect();
        let end = start + page.len();
        let next_token = (end < topics.len()).then(|| end.to_string());
        Ok(TopicPage {
            topics: page,
            next_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_filters_on_queue_name_prefix() {
        let backend = InMemoryMessaging::new();
        backend.create_queue("orders-1", AttributeMap::new()).await.unwrap();
        backend.create_queue("billing-1", AttributeMap::new()).await.unwrap();

        let queues = backend.list_queues(Some("orders-")).await.unwrap();

        assert_eq!(queues.len(), 1);
        assert!(queues[0].url.ends_with("/orders-1"));
    }

    #[tokio::test]
    async fn create_queue_is_idempotent() {
        let backend = InMemoryMessaging::new();
        let first = backend.create_queue("orders", AttributeMap::new()).await.unwrap();
        let second = backend.create_queue("orders", AttributeMap::new()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(backend.list_queues(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn receive_supersedes_earlier_receipt_handles() {
        let backend = InMemoryMessaging::new();
        let queue = backend.create_queue("orders", AttributeMap::new()).await.unwrap();
        backend.send_message(&queue.url, "hello").await.unwrap();

        let first = backend.receive_messages(&queue.url).await.unwrap();
        let second = backend.receive_messages(&queue.url).await.unwrap();
        assert_ne!(first[0].receipt_handle, second[0].receipt_handle);

        let stale = backend
            .delete_message(&queue.url, &first[0].receipt_handle)
            .await;
        assert!(matches!(stale, Err(GatewayError::InvalidReceiptHandle(_))));

        backend
            .delete_message(&queue.url, &second[0].receipt_handle)
            .await
            .unwrap();
        assert!(backend.receive_messages(&queue.url).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attribute_fetches_are_counted() {
        let backend = InMemoryMessaging::new();
        let queue = backend.create_queue("orders", AttributeMap::new()).await.unwrap();
        assert_eq!(backend.attribute_fetches(), 0);

        backend
            .queue_attributes(&queue.url, &[QueueAttributeName::All])
            .await
            .unwrap();
        assert_eq!(backend.attribute_fetches(), 1);
    }

    #[tokio::test]
    async fn topic_listing_pages_with_a_restartable_token() {
        let backend = InMemoryMessaging::new().with_topic_page_size(2);
        for name in ["alerts", "billing", "orders"] {
            backend.create_topic(name).await.unwrap();
        }

        let first = backend.list_topics(None).await.unwrap();
        assert_eq!(first.topics.len(), 2);
        let token = first.next_token.expect("a second page");

        let second = backend.list_topics(Some(&token)).await.unwrap();
        assert_eq!(second.topics.len(), 1);
        assert_eq!(second.next_token, None);
    }
}
