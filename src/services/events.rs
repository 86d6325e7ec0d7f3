//! Config change notifications
//!
//! Observers subscribe to a [`ConfigService`](super::ConfigService) and are
//! told about actions after the store has confirmed them.

use crate::models::{Access, TypeInfo};

/// Something that happened to the config entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEvent {
    /// Values and metadata were (re)loaded from the store
    Loaded { entries: usize },
    /// An entry was created or replaced
    Saved {
        key: String,
        type_info: TypeInfo,
        created: bool,
    },
    /// An entry was removed
    Deleted {
        key: String,
        type_info: Option<TypeInfo>,
    },
    /// A sealed entry was opened for one access
    Unlocked { key: String, access: Access },
}

/// Receives config events
pub trait ConfigObserver {
    fn on_event(&self, event: &ConfigEvent);
}

impl<F> ConfigObserver for F
where
    F: Fn(&ConfigEvent),
{
    fn on_event(&self, event: &ConfigEvent) {
        self(event)
    }
}

/// Ordered list of subscribed observers
#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn ConfigObserver>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer; observers are notified in subscription order
    pub fn subscribe(&mut self, observer: Box<dyn ConfigObserver>) {
        self.observers.push(observer);
    }

    pub fn emit(&self, event: &ConfigEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
