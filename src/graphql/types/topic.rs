use crate::domain;
use async_graphql::Object;

/// GraphQL representation of a Topic
#[derive(Clone)]
pub struct Topic {
    pub inner: domain::Topic,
}

impl From<domain::Topic> for Topic {
    fn from(topic: domain::Topic) -> Self {
        Self { inner: topic }
    }
}

#[Object]
impl Topic {
    /// The topic arn.
    async fn arn(&self) -> &str {
        &self.inner.arn
    }
}

/// One page of a topic listing
#[derive(Clone)]
pub struct TopicPage {
    pub inner: domain::TopicPage,
}

impl From<domain::TopicPage> for TopicPage {
    fn from(page: domain::TopicPage) -> Self {
        Self { inner: page }
    }
}

#[Object]
impl TopicPage {
    /// The topics on this page.
    async fn topics(&self) -> Vec<Topic> {
        self.inner.topics.iter().cloned().map(Topic::from).collect()
    }

    /// Token resuming the listing where this page ends; null when the
    /// listing is exhausted.
    async fn next_token(&self) -> Option<&str> {
        self.inner.next_token.as_deref()
    }
}
