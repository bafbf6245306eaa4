use super::Messaging;
use crate::domain::{
    AttributeMap, Message, Queue, QueueAttributeName, QueueAttributes, SentMessage, Topic,
    TopicPage,
};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use aws_sdk_sqs::operation::RequestId;
use std::collections::HashMap;
use tracing::debug;

/// Messaging backend backed by the real SQS and SNS endpoints.
///
/// Both clients are cheap handles over a shared connection pool; the whole
/// struct is constructed once at process start and threaded through query
/// execution via the schema context.
pub struct AwsMessaging {
    sqs: aws_sdk_sqs::Client,
    sns: aws_sdk_sns::Client,
}

impl AwsMessaging {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            sqs: aws_sdk_sqs::Client::new(config),
            sns: aws_sdk_sns::Client::new(config),
        }
    }

    /// Builds clients from the ambient AWS configuration (environment,
    /// profile, instance metadata).
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(&config)
    }
}

fn missing(what: &str) -> GatewayError {
    GatewayError::MalformedResponse(format!("reply without a {what}"))
}

fn sdk_attribute_name(name: QueueAttributeName) -> aws_sdk_sqs::types::QueueAttributeName {
    aws_sdk_sqs::types::QueueAttributeName::from(name.as_str())
}

fn from_sdk_attributes(
    attributes: &HashMap<aws_sdk_sqs::types::QueueAttributeName, String>,
) -> QueueAttributes {
    let mut attrs = QueueAttributes::default();
    for (name, value) in attributes {
        // SQS returns more attributes than the gateway exposes (timestamps,
        // ARNs); anything outside the declared bag is dropped here.
        match name.as_str() {
            "DelaySeconds" => attrs.delay_seconds = Some(value.clone()),
            "MaximumMessageSize" => attrs.maximum_message_size = Some(value.clone()),
            "MessageRetentionPeriod" => attrs.message_retention_period = Some(value.clone()),
            "Policy" => attrs.policy = Some(value.clone()),
            "ReceiveMessageWaitTimeSeconds" => {
                attrs.receive_message_wait_time_seconds = Some(value.clone())
            }
            "VisibilityTimeout" => attrs.visibility_timeout = Some(value.clone()),
            _ => {}
        }
    }
    attrs
}

#[async_trait]
impl Messaging for AwsMessaging {
    async fn create_queue(&self, name: &str, attributes: AttributeMap) -> Result<Queue> {
        debug!(name = %name, "Creating queue");
        let sdk_attributes: HashMap<_, _> = attributes
            .iter()
            .map(|(name, value)| (sdk_attribute_name(*name), value.clone()))
            .collect();
        let out = self
            .sqs
            .create_queue()
            .queue_name(name)
            .set_attributes((!sdk_attributes.is_empty()).then_some(sdk_attributes))
            .send()
            .await?;
        let url = out.queue_url().ok_or_else(|| missing("queue url"))?;
        Ok(Queue {
            url: url.to_string(),
        })
    }

    async fn list_queues(&self, prefix: Option<&str>) -> Result<Vec<Queue>> {
        let out = self
            .sqs
            .list_queues()
            .set_queue_name_prefix(prefix.map(String::from))
            .send()
            .await?;
        Ok(out
            .queue_urls()
            .iter()
            .map(|url| Queue { url: url.clone() })
            .collect())
    }

    async fn queue_attributes(
        &self,
        url: &str,
        names: &[QueueAttributeName],
    ) -> Result<QueueAttributes> {
        debug!(url = %url, "Fetching queue attributes");
        let names = if names.is_empty() {
            vec![QueueAttributeName::All]
        } else {
            names.to_vec()
        };
        let out = self
            .sqs
            .get_queue_attributes()
            .queue_url(url)
            .set_attribute_names(Some(names.into_iter().map(sdk_attribute_name).collect()))
            .send()
            .await?;
        Ok(out.attributes().map(from_sdk_attributes).unwrap_or_default())
    }

    async fn delete_queue(&self, url: &str) -> Result<String> {
        debug!(url = %url, "Deleting queue");
        let out = self.sqs.delete_queue().queue_url(url).send().await?;
        Ok(out
            .request_id()
            .ok_or_else(|| missing("request id"))?
            .to_string())
    }

    async fn send_message(&self, queue_url: &str, body: &str) -> Result<SentMessage> {
        let out = self
            .sqs
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await?;
        Ok(SentMessage {
            message_id: out
                .message_id()
                .ok_or_else(|| missing("message id"))?
                .to_string(),
            body_md5: out.md5_of_message_body().map(String::from),
            attributes_md5: out.md5_of_message_attributes().map(String::from),
        })
    }

    async fn receive_messages(&self, queue_url: &str) -> Result<Vec<Message>> {
        let out = self
            .sqs
            .receive_message()
            .queue_url(queue_url)
            .send()
            .await?;
        out.messages()
            .iter()
            .map(|message| {
                Ok(Message {
                    message_id: message
                        .message_id()
                        .ok_or_else(|| missing("message id"))?
                        .to_string(),
                    receipt_handle: message
                        .receipt_handle()
                        .ok_or_else(|| missing("receipt handle"))?
                        .to_string(),
                    body: message.body().unwrap_or_default().to_string(),
                    // Receive reports the digest as MD5OfBody; send reports
                    // MD5OfMessageBody. Both normalize to body_md5.
                    body_md5: message.md5_of_body().map(String::from),
                })
            })
            .collect()
    }

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> Result<String> {
        debug!(queue_url = %queue_url, "Deleting message");
        let out = self
            .sqs
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;
        Ok(out
            .request_id()
            .ok_or_else(|| missing("request id"))?
            .to_string())
    }

    async fn create_topic(&self, name: &str) -> Result<Topic> {
        debug!(name = %name, "Creating topic");
        let out = self.sns.create_topic().name(name).send().await?;
        let arn = out.topic_arn().ok_or_else(|| missing("topic arn"))?;
        Ok(Topic {
            arn: arn.to_string(),
        })
    }

    async fn delete_topic(&self, arn: &str) -> Result<String> {
        debug!(arn = %arn, "Deleting topic");
        let out = self.sns.delete_topic().topic_arn(arn).send().await?;
        Ok(out
            .request_id()
            .ok_or_else(|| missing("request id"))?
            .to_string())
    }

    async fn list_topics(&self, next_token: Option<&str>) -> Result<TopicPage> {
        let out = self
            .sns
            .list_topics()
            .set_next_token(next_token.map(String::from))
            .send()
            .await?;
        let topics = out
            .topics()
            .iter()
            .filter_map(|topic| topic.topic_arn())
            .map(|arn| Topic {
                arn: arn.to_string(),
            })
            .collect();
        Ok(TopicPage {
            topics,
            next_token: out.next_token().map(String::from),
        })
    }
}
