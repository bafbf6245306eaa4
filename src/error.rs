use aws_sdk_sqs::error::{DisplayErrorContext, SdkError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("AWS request failed: {0}")]
    Aws(String),

    #[error("Malformed service response: {0}")]
    MalformedResponse(String),

    #[error("Queue does not exist: {0}")]
    QueueNotFound(String),

    #[error("Topic does not exist: {0}")]
    TopicNotFound(String),

    #[error("Receipt handle is invalid or superseded: {0}")]
    InvalidReceiptHandle(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

// SQS and SNS operations fail with the same smithy SdkError shape; both
// funnel through here so resolvers only ever see GatewayError.
impl<E, R> From<SdkError<E, R>> for GatewayError
where
    E: std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    fn from(err: SdkError<E, R>) -> Self {
        GatewayError::Aws(DisplayErrorContext(err).to_string())
    }
}
