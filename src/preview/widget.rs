//! One link preview instance and the effects it runs
//!
//! State lives in a `watch` channel so observers re-render on every change.
//! Each instance owns at most one unmount countdown and one metadata fetch,
//! both spawned on the tokio runtime. Spawned tasks only hold a `Weak` to the
//! instance and check their token on completion, so a late timer or fetch
//! never touches a torn-down or re-targeted instance.
//!
//! Lock order: `effects` first, then the state channel.

use crate::config::{FetchTrigger, PreviewConfig};
use crate::error::{LinkPreviewError, Result};
use crate::metadata::{PageMetadata, PageSource, fetch_metadata_or_placeholder};
use crate::preview::hover::{HoverEffect, TimerToken};
use crate::preview::render::render_preview;
use crate::preview::state::{LinkPreviewState, MetadataState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FetchToken(u64);

#[derive(Debug, Default)]
struct Effects {
    unmount_timer: Option<AbortHandle>,
    fetch: Option<(FetchToken, AbortHandle)>,
    fetches_issued: u64,
    destroyed: bool,
}

struct Inner<S: PageSource> {
    source: Arc<S>,
    config: PreviewConfig,
    runtime: Handle,
    state: watch::Sender<LinkPreviewState>,
    effects: Mutex<Effects>,
}

/// A hyperlink that previews its target on hover
///
/// Created inside a tokio runtime, which then runs its countdowns and fetches;
/// hover events may come from any thread afterwards. Dropping the instance
/// cancels its pending countdown and fetch.
pub struct LinkPreview<S: PageSource> {
    inner: Arc<Inner<S>>,
}

impl<S: PageSource> LinkPreview<S> {
    pub fn new(url: impl Into<String>, source: Arc<S>, config: PreviewConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            LinkPreviewError::Internal(format!("link preview needs a tokio runtime: {e}"))
        })?;

        let (state, _) = watch::channel(LinkPreviewState::new(url));
        let inner = Arc::new(Inner {
            source,
            config,
            runtime,
            state,
            effects: Mutex::new(Effects::default()),
        });

        if inner.config.fetch_trigger == FetchTrigger::OnMount {
            inner.ensure_metadata();
        }

        Ok(Self { inner })
    }

    pub fn url(&self) -> String {
        self.inner.state.borrow().url.clone()
    }

    /// Current state, cloned out of the channel
    pub fn snapshot(&self) -> LinkPreviewState {
        self.inner.state.borrow().clone()
    }

    /// Receive every state change; closes when the instance is dropped
    pub fn subscribe(&self) -> watch::Receiver<LinkPreviewState> {
        self.inner.state.subscribe()
    }

    pub fn render(&self) -> String {
        render_preview(&self.inner.state.borrow())
    }

    pub fn pointer_enter(&self) {
        self.inner.pointer_enter();
    }

    pub fn pointer_leave(&self) {
        self.inner.pointer_leave();
    }

    /// Issue the metadata fetch unless one is pending or done
    pub fn ensure_metadata(&self) {
        self.inner.ensure_metadata();
    }

    /// Point the link somewhere else; fetch state starts over
    pub fn set_url(&self, url: impl Into<String>) {
        self.inner.set_url(url.into());
    }

    /// Wait for the metadata, issuing the fetch if nothing asked for it yet
    pub async fn metadata(&self) -> Result<PageMetadata> {
        let rx = self.subscribe();
        self.ensure_metadata();
        wait_resolved(rx).await.ok_or_else(|| {
            LinkPreviewError::Internal("preview torn down while waiting for metadata".to_string())
        })
    }
}

impl<S: PageSource> Drop for LinkPreview<S> {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

/// Resolve once the watched instance has metadata; `None` if it was dropped first
pub async fn wait_resolved(mut rx: watch::Receiver<LinkPreviewState>) -> Option<PageMetadata> {
    let state = rx
        .wait_for(|state| matches!(state.metadata, MetadataState::Resolved(_)))
        .await
        .ok()?;
    state.metadata().cloned()
}

impl<S: PageSource> Inner<S> {
    fn effects(&self) -> MutexGuard<'_, Effects> {
        self.effects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pointer_enter(self: &Arc<Self>) {
        let mut effects = self.effects();
        if effects.destroyed {
            return;
        }

        let mut effect = HoverEffect::None;
        self.state.send_if_modified(|state| {
            let was_hovered = state.hover.hovered();
            effect = state.hover.enter();
            !was_hovered
        });

        if let HoverEffect::CancelUnmount(token) = effect {
            tracing::trace!(?token, "Re-entered before unmount, countdown cancelled");
            if let Some(timer) = effects.unmount_timer.take() {
                timer.abort();
            }
        }

        if self.config.fetch_trigger == FetchTrigger::OnHover {
            self.start_fetch(&mut effects);
        }
    }

    fn pointer_leave(self: &Arc<Self>) {
        let mut effects = self.effects();
        if effects.destroyed {
            return;
        }

        let mut effect = HoverEffect::None;
        self.state.send_if_modified(|state| {
            effect = state.hover.leave();
            effect != HoverEffect::None
        });

        let HoverEffect::ScheduleUnmount(token) = effect else {
            return;
        };

        let weak: Weak<Self> = Arc::downgrade(self);
        let delay = self.config.unmount_delay;
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.expire_unmount(token);
            }
        });

        if let Some(previous) = effects.unmount_timer.replace(handle.abort_handle()) {
            previous.abort();
        }
    }

    fn expire_unmount(&self, token: TimerToken) {
        let mut effects = self.effects();
        if effects.destroyed {
            return;
        }

        let unmounted = self
            .state
            .send_if_modified(|state| state.hover.expire(token));
        if unmounted {
            effects.unmount_timer = None;
            tracing::trace!(?token, "Preview panel unmounted");
        }
    }

    fn ensure_metadata(self: &Arc<Self>) {
        let mut effects = self.effects();
        if effects.destroyed {
            return;
        }
        self.start_fetch(&mut effects);
    }

    /// Caller holds the effects lock
    fn start_fetch(self: &Arc<Self>, effects: &mut Effects) {
        let mut target = None;
        self.state.send_if_modified(|state| {
            if state.metadata != MetadataState::NotRequested {
                return false;
            }
            state.metadata = MetadataState::Pending;
            target = Some(state.url.clone());
            true
        });

        let Some(url) = target else {
            return;
        };

        effects.fetches_issued += 1;
        let token = FetchToken(effects.fetches_issued);
        tracing::debug!(url = %url, fetch = token.0, "Fetching preview metadata");

        let weak: Weak<Self> = Arc::downgrade(self);
        let source = self.source.clone();
        let handle = self.runtime.spawn(async move {
            let metadata = fetch_metadata_or_placeholder(source.as_ref(), &url).await;
            if let Some(inner) = weak.upgrade() {
                inner.complete_fetch(token, metadata);
            }
        });

        if let Some((_, previous)) = effects.fetch.replace((token, handle.abort_handle())) {
            previous.abort();
        }
    }

    fn complete_fetch(&self, token: FetchToken, metadata: PageMetadata) {
        let mut effects = self.effects();
        if effects.destroyed || effects.fetch.as_ref().map(|(t, _)| *t) != Some(token) {
            tracing::debug!(fetch = token.0, "Discarding stale metadata fetch");
            return;
        }
        effects.fetch = None;

        self.state.send_if_modified(|state| {
            if !state.metadata.is_pending() {
                return false;
            }
            tracing::info!(
                url = %state.url,
                title = %metadata.title,
                failed = metadata.is_failure_placeholder(),
                "Preview metadata resolved"
            );
            state.metadata = MetadataState::Resolved(metadata);
            true
        });
    }

    fn set_url(self: &Arc<Self>, url: String) {
        let mut effects = self.effects();
        if effects.destroyed {
            return;
        }

        let changed = self.state.send_if_modified(|state| {
            if state.url == url {
                return false;
            }
            state.url = url.clone();
            state.metadata = MetadataState::NotRequested;
            true
        });
        if !changed {
            return;
        }

        if let Some((token, previous)) = effects.fetch.take() {
            tracing::debug!(fetch = token.0, "Url changed, aborting in-flight fetch");
            previous.abort();
        }

        let hovered = self.state.borrow().hovered();
        if self.config.fetch_trigger == FetchTrigger::OnMount || hovered {
            self.start_fetch(&mut effects);
        }
    }

    fn teardown(&self) {
        let mut effects = self.effects();
        effects.destroyed = true;

        if let Some(timer) = effects.unmount_timer.take() {
            timer.abort();
        }
        if let Some((token, fetch)) = effects.fetch.take() {
            tracing::debug!(fetch = token.0, "Preview torn down, aborting in-flight fetch");
            fetch.abort();
        }

        self.state.send_if_modified(|state| {
            state.hover.teardown();
            false
        });
    }
}
