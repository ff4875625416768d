use arena_core::{Address, Topic};
use serde::{Deserialize, Serialize};

use crate::error::RouterError;

/// Raw log entry emitted by the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub address: Address,
    /// Topic 0 identifies the event; later topics carry indexed inputs.
    pub topics: Vec<Topic>,
    pub data: Vec<u8>,
}

impl LogEvent {
    /// Primary topic identifying the event, if any.
    pub fn primary_topic(&self) -> Option<&Topic> {
        self.topics.first()
    }
}

/// Log subscription filter: address plus positional topic constraints,
/// `None` matching any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub address: Address,
    pub topics: Vec<Option<Topic>>,
}

impl EventFilter {
    pub fn matches(&self, log: &LogEvent) -> bool {
        if log.address != self.address {
            return false;
        }
        self.topics.iter().enumerate().all(|(i, want)| match want {
            None => true,
            Some(topic) => log.topics.get(i) == Some(topic),
        })
    }
}

/// Builds filters for one event of one facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConstructor {
    pub signature: String,
    pub address: Address,
    /// `None` for anonymous events.
    pub topic: Option<Topic>,
    pub indexed: usize,
}

impl FilterConstructor {
    /// Applies positional indexed-argument constraints.
    pub fn apply(&self, args: &[Option<Topic>]) -> Result<EventFilter, RouterError> {
        if args.len() > self.indexed {
            return Err(RouterError::TooManyFilterArgs {
                signature: self.signature.clone(),
                indexed: self.indexed,
                given: args.len(),
            });
        }
        let mut topics = Vec::with_capacity(1 + args.len());
        if self.topic.is_some() {
            topics.push(self.topic);
        }
        topics.extend_from_slice(args);
        Ok(EventFilter {
            address: self.address,
            topics,
        })
    }
}
