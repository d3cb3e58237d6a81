//! Queue configuration and builder.

use super::DeferredQueue;

/// Configuration for a [`DeferredQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Name used in log spans.
    pub name: String,

    /// Capacity reserved for pending entries up front.
    pub initial_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: String::from("deferred"),
            initial_capacity: 16,
        }
    }
}

/// QueueBuilder はキューを構築する
///
/// # 使用例
/// ```ignore
/// let queue: DeferredQueue = QueueBuilder::new()
///     .name("io")
///     .capacity(64)
///     .build();
/// ```
pub struct QueueBuilder {
    config: QueueConfig,
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self {
            config: QueueConfig::default(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn capacity(mut self, initial_capacity: usize) -> Self {
        self.config.initial_capacity = initial_capacity;
        self
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn build<E: 'static>(self) -> DeferredQueue<E> {
        DeferredQueue::with_config(self.config)
    }
}

impl Default for QueueBuilder {
    fn default() -> Self {
        Self::new()
    }
}
