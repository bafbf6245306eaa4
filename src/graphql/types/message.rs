use crate::domain;
use async_graphql::Object;

/// GraphQL representation of a received message instance
#[derive(Clone)]
pub struct Message {
    pub inner: domain::Message,
}

impl From<domain::Message> for Message {
    fn from(message: domain::Message) -> Self {
        Self { inner: message }
    }
}

#[Object]
impl Message {
    /// The message's service-assigned id.
    async fn message_id(&self) -> &str {
        &self.inner.message_id
    }

    /// The single-use token authorizing deletion of this received instance.
    /// Superseded by the handle of any later receive of the same message.
    async fn receipt_handle(&self) -> &str {
        &self.inner.receipt_handle
    }

    /// The message body.
    async fn body(&self) -> &str {
        &self.inner.body
    }

    /// MD5 digest of the body, for integrity checking.
    async fn body_md5(&self) -> Option<&str> {
        self.inner.body_md5.as_deref()
    }
}

/// GraphQL representation of a send-message acknowledgement
#[derive(Clone)]
pub struct SentMessage {
    pub inner: domain::SentMessage,
}

impl From<domain::SentMessage> for SentMessage {
    fn from(sent: domain::SentMessage) -> Self {
        Self { inner: sent }
    }
}

#[Object]
impl SentMessage {
    /// The id the service assigned to the sent message.
    async fn message_id(&self) -> &str {
        &self.inner.message_id
    }

    /// MD5 digest of the body as the service received it.
    async fn body_md5(&self) -> Option<&str> {
        self.inner.body_md5.as_deref()
    }

    /// MD5 digest of the message attributes, when any were sent.
    async fn attributes_md5(&self) -> Option<&str> {
        self.inner.attributes_md5.as_deref()
    }
}
