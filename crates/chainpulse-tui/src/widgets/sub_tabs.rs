//! Horizontal tab bar for the network and timeframe selectors.

use ratatui::style::Color;
use ratatui::text::{Line, Span};

use crate::theme;

/// Renders a horizontal tab bar line with the active tab highlighted in the
/// given accent color.
pub fn render_sub_tabs<'a>(labels: &[&'a str], active_index: usize, accent: Color) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2);

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }

        if i == active_index {
            spans.push(Span::styled(format!("[{label}]"), theme::tab_active(accent)));
        } else {
            spans.push(Span::styled(*label, theme::tab_inactive()));
        }
    }

    Line::from(spans)
}
