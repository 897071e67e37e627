use crate::config::PreviewConfig;
use crate::error::{LinkPreviewError, Result};
use crate::metadata::{PageMetadata, PageSource};
use crate::preview::state::LinkPreviewState;
use crate::preview::widget::{LinkPreview, wait_resolved};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hosts the link previews of one page
///
/// Every instance keeps its own state and fetch; nothing is shared between
/// two links, even when they point at the same url.
pub struct PreviewBoard<S: PageSource> {
    source: Arc<S>,
    config: PreviewConfig,
    instances: DashMap<InstanceId, LinkPreview<S>>,
}

impl<S: PageSource> PreviewBoard<S> {
    pub fn new(source: Arc<S>, config: PreviewConfig) -> Self {
        tracing::info!(
            unmount_delay_ms = config.unmount_delay.as_millis() as u64,
            fetch_trigger = ?config.fetch_trigger,
            "Creating preview board"
        );

        Self {
            source,
            config,
            instances: DashMap::new(),
        }
    }

    /// Mount a new link preview; must be called inside a tokio runtime
    pub fn mount(&self, url: impl Into<String>) -> Result<InstanceId> {
        let url = url.into();
        let id = InstanceId::new();
        tracing::debug!(instance_id = %id, url = %url, "Mounting link preview");

        let preview = LinkPreview::new(url, self.source.clone(), self.config.clone())?;
        self.instances.insert(id, preview);
        Ok(id)
    }

    /// Tear an instance down, cancelling its timer and fetch
    pub fn unmount(&self, id: InstanceId) -> Result<()> {
        self.instances
            .remove(&id)
            .map(|_| tracing::debug!(instance_id = %id, "Unmounted link preview"))
            .ok_or_else(|| LinkPreviewError::InstanceNotFound(id.to_string()))
    }

    pub fn pointer_enter(&self, id: InstanceId) -> Result<()> {
        self.with(id, |preview| preview.pointer_enter())
    }

    pub fn pointer_leave(&self, id: InstanceId) -> Result<()> {
        self.with(id, |preview| preview.pointer_leave())
    }

    pub fn set_url(&self, id: InstanceId, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        self.with(id, move |preview| preview.set_url(url))
    }

    pub fn snapshot(&self, id: InstanceId) -> Result<LinkPreviewState> {
        self.with(id, |preview| preview.snapshot())
    }

    pub fn render(&self, id: InstanceId) -> Result<String> {
        self.with(id, |preview| preview.render())
    }

    /// Wait for one instance's metadata, fetching it if needed
    pub async fn metadata(&self, id: InstanceId) -> Result<PageMetadata> {
        let rx = self.with(id, |preview| {
            preview.ensure_metadata();
            preview.subscribe()
        })?;

        wait_resolved(rx)
            .await
            .ok_or_else(|| LinkPreviewError::InstanceNotFound(id.to_string()))
    }

    /// Fetch every instance's metadata and wait for all of them
    ///
    /// Instances unmounted while waiting are left out of the result.
    pub async fn resolve_all(&self) -> Vec<(InstanceId, PageMetadata)> {
        // Collect receivers first so no map shard stays locked across an await
        let pending: Vec<_> = self
            .instances
            .iter()
            .map(|entry| {
                entry.value().ensure_metadata();
                (*entry.key(), entry.value().subscribe())
            })
            .collect();

        let results = futures::future::join_all(
            pending
                .into_iter()
                .map(|(id, rx)| async move { wait_resolved(rx).await.map(|meta| (id, meta)) }),
        )
        .await;

        results.into_iter().flatten().collect()
    }

    pub fn ids(&self) -> Vec<InstanceId> {
        self.instances.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn with<T>(&self, id: InstanceId, f: impl FnOnce(&LinkPreview<S>) -> T) -> Result<T> {
        self.instances
            .get(&id)
            .map(|preview| f(preview.value()))
            .ok_or_else(|| LinkPreviewError::InstanceNotFound(id.to_string()))
    }
}
