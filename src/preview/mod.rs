//! Hover link previews
//!
//! A [`LinkPreview`] is one hyperlink: pointer events drive the
//! [`HoverLifecycle`], the first activation fetches [`PageMetadata`] once,
//! and [`render_preview`] turns the current [`LinkPreviewState`] into markup.
//! A [`PreviewBoard`] hosts many independent instances.
//!
//! [`PageMetadata`]: crate::metadata::PageMetadata

mod board;
mod hover;
mod render;
mod state;
mod widget;

pub use board::{InstanceId, PreviewBoard};
pub use hover::{HoverEffect, HoverLifecycle, HoverPhase, TimerToken};
pub use render::{LOADING_TEXT, escape_html, render_preview};
pub use state::{LinkPreviewState, MetadataState};
pub use widget::{LinkPreview, wait_resolved};
