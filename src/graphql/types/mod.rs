pub mod message;
pub mod queue;
pub mod topic;

pub use message::{Message, SentMessage};
pub use queue::{Queue, QueueAttributes, QueueAttributesInput};
pub use topic::{Topic, TopicPage};
