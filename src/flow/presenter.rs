//! Completion-side presentation helpers.
//!
//! The completion callback gets a `Presenter` rather than the whole session:
//! enough to push a result card and ask for an email, nothing that could
//! mutate flow state.

use std::sync::Arc;

use crate::capture::{share_links, ShareLinks};
use crate::flow::input::InputControl;
use crate::flow::model::FlowMetadata;
use crate::surface::{ResultRow, Surface};

pub struct Presenter {
    surface: Arc<dyn Surface>,
    metadata: FlowMetadata,
}

impl Presenter {
    pub(crate) fn new(surface: Arc<dyn Surface>, metadata: FlowMetadata) -> Self {
        Self { surface, metadata }
    }

    pub fn metadata(&self) -> &FlowMetadata {
        &self.metadata
    }

    /// Pushes the final result card.
    pub fn show_results(&self, rows: &[ResultRow]) {
        self.surface.show_result_card(rows);
    }

    /// Prompts for an email address to deliver the detailed report.
    pub fn prompt_email_capture(&self, message: &str) {
        self.surface.show_prompt(message, Some("📧"));
        self.surface
            .show_input(&InputControl::EmailField { placeholder: None });
    }

    /// Share links for this flow, as offered after a successful capture.
    pub fn share_links(&self) -> ShareLinks {
        share_links(&self.metadata)
    }
}

/// "$1,234" from a raw figure.
pub fn format_currency(value: f64) -> String {
    format!("${}", group_thousands(value.round() as i64))
}

/// "1,234" from a raw figure.
pub fn format_number(value: f64) -> String {
    group_thousands(value.round() as i64)
}

/// "42%" from a raw figure.
pub fn format_percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
