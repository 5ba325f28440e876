//! Decoration worker
//!
//! All events go through one queue to a single task that owns the
//! [`Decorator`], so conversation state is never mutated concurrently.
//! Output goes through tokio's async writers.

use anyhow::{Context, Result};
use cosmic_ext_connect_decorator::{Decoration, Decorator, StaticSourceApp};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::events::InboundEvent;

/// Capacity of the event queue
pub const EVENT_QUEUE_SIZE: usize = 100;

/// Counters reported when the worker stops
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub decorated: u64,
    pub skipped: u64,
    pub thread_keys: u64,
}

/// Single owner of the decorator, writing one JSON line per decoration
pub struct Worker<W> {
    decorator: Decorator<StaticSourceApp>,
    output: W,
    stats: WorkerStats,
}

impl<W: AsyncWrite + Unpin> Worker<W> {
    pub fn new(decorator: Decorator<StaticSourceApp>, output: W) -> Self {
        Self {
            decorator,
            output,
            stats: WorkerStats::default(),
        }
    }

    pub fn stats(&self) -> WorkerStats {
        self.stats
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Process events until every sender is dropped
    pub async fn run(mut self, mut events: mpsc::Receiver<InboundEvent>) -> Result<Self> {
        while let Some(event) = events.recv().await {
            self.handle(event).await?;
        }
        info!(
            "Event queue closed: {} decorated, {} skipped, {} thread keys",
            self.stats.decorated, self.stats.skipped, self.stats.thread_keys
        );
        Ok(self)
    }

    /// Handle one event
    ///
    /// Recoverable decoration errors are logged and skipped; output errors
    /// and configuration errors abort the worker.
    pub async fn handle(&mut self, event: InboundEvent) -> Result<()> {
        match event {
            InboundEvent::Notification(notification) => match self.decorator.apply(&notification) {
                Ok(Decoration::Conversation(decorated)) => {
                    if let Some(conversation) = self
                        .decorator
                        .registry()
                        .get(decorated.profile, decorated.conversation_id)
                    {
                        debug!("Decorated {}", conversation.debug_summary());
                    }
                    let mut line = serde_json::to_vec(&decorated)
                        .context("Failed to serialize decorated conversation")?;
                    line.push(b'\n');
                    self.output
                        .write_all(&line)
                        .await
                        .context("Failed to write output")?;
                    self.output.flush().await.context("Failed to flush output")?;
                    self.stats.decorated += 1;
                }
                Ok(Decoration::NotConversation) => {
                    debug!("Not a conversation: {}", notification.key);
                    self.stats.skipped += 1;
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Skipped notification {}: {}", notification.key, e);
                    self.stats.skipped += 1;
                }
                Err(e) => return Err(anyhow::Error::from(e).context("Decoration failed")),
            },
            InboundEvent::ThreadKey {
                profile,
                conversation_id,
                thread_key,
            } => {
                if self
                    .decorator
                    .apply_thread_key(profile, conversation_id, &thread_key)
                {
                    info!(
                        "Conversation {} reclassified by thread key {}",
                        conversation_id, thread_key
                    );
                }
                self.stats.thread_keys += 1;
            }
            InboundEvent::PackageChanged { version } => {
                info!("Source app package changed: version {:?}", version);
                self.decorator.source_app_mut().version_code = version;
                self.decorator.on_source_package_changed();
            }
        }
        Ok(())
    }
}
