use crate::metadata::PageMetadata;
use crate::preview::hover::{HoverLifecycle, HoverPhase};

/// Fetch progress of one instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MetadataState {
    #[default]
    NotRequested,
    Pending,
    /// Extracted metadata or the failure placeholder; never re-fetched
    Resolved(PageMetadata),
}

impl MetadataState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn resolved(&self) -> Option<&PageMetadata> {
        match self {
            Self::Resolved(metadata) => Some(metadata),
            _ => None,
        }
    }
}

/// Everything a render of one link preview needs
#[derive(Debug, Clone)]
pub struct LinkPreviewState {
    pub(crate) url: String,
    pub(crate) hover: HoverLifecycle,
    pub(crate) metadata: MetadataState,
}

impl LinkPreviewState {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            hover: HoverLifecycle::default(),
            metadata: MetadataState::NotRequested,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn phase(&self) -> HoverPhase {
        self.hover.phase()
    }

    pub fn hovered(&self) -> bool {
        self.hover.hovered()
    }

    pub fn mounted(&self) -> bool {
        self.hover.mounted()
    }

    pub fn loading(&self) -> bool {
        self.metadata.is_pending()
    }

    pub fn metadata_state(&self) -> &MetadataState {
        &self.metadata
    }

    pub fn metadata(&self) -> Option<&PageMetadata> {
        self.metadata.resolved()
    }
}
