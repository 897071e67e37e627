use crate::preview::hover::HoverPhase;
use crate::preview::state::{LinkPreviewState, MetadataState};

pub const LOADING_TEXT: &str = "Loading preview...";

/// Render a link and, while mounted, its floating preview panel
///
/// The link opens in a new browsing context without access to the opener.
/// The panel is `open` while hovered and `closing` during the exit grace
/// period, where it no longer takes pointer events.
pub fn render_preview(state: &LinkPreviewState) -> String {
    let url = escape_html(state.url());
    let mut lines = vec![
        r#"<span class="link-preview">"#.to_string(),
        format!(
            r#"<a class="link-preview__link" href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            url, url
        ),
    ];

    if state.mounted() {
        let (modifier, pointer_events) = match state.phase() {
            HoverPhase::Visible => ("open", "auto"),
            _ => ("closing", "none"),
        };
        lines.push(format!(
            r#"<div class="link-preview__panel link-preview__panel--{}" data-state="{}" style="pointer-events:{}">"#,
            modifier, modifier, pointer_events
        ));

        match state.metadata_state() {
            MetadataState::NotRequested => {}
            MetadataState::Pending => {
                lines.push(format!(
                    r#"<p class="link-preview__loading">{}</p>"#,
                    LOADING_TEXT
                ));
            }
            MetadataState::Resolved(metadata) => {
                if let Some(image) = &metadata.image {
                    let alt = if metadata.title.is_empty() {
                        "Preview"
                    } else {
                        metadata.title.as_str()
                    };
                    lines.push(format!(
                        r#"<img src="{}" alt="{}" class="link-preview__image" onerror="this.style.display='none'">"#,
                        escape_html(image),
                        escape_html(alt)
                    ));
                }
                lines.push(format!(
                    r#"<p class="link-preview__title">{}</p>"#,
                    escape_html(&metadata.title)
                ));
                lines.push(format!(
                    r#"<p class="link-preview__description line-clamp-3">{}</p>"#,
                    escape_html(&metadata.description)
                ));
            }
        }

        lines.push("</div>".to_string());
    }

    lines.push("</span>".to_string());
    lines.join("\n")
}

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
