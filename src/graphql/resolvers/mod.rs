pub mod queues;
pub mod topics;

pub use queues::{QueueMutation, QueueQuery};
pub use topics::{TopicMutation, TopicQuery};
