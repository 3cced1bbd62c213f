//! Condensed view: the most severe error groups first.

use std::fmt::Write as _;

use crate::config::SUMMARY_LIMIT;
use crate::models::ProcessedErrorGroup;
use crate::notice::{Notice, NoticeLevel};

/// An example value that can be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleChip {
    pub value: String,
}

impl ExampleChip {
    /// Text to put on the clipboard and the confirmation to show.
    pub fn copy(&self) -> (String, Notice) {
        (
            self.value.clone(),
            Notice::new(NoticeLevel::Success, format!("Copied \"{}\" to clipboard", self.value)),
        )
    }
}

/// First [`SUMMARY_LIMIT`] groups of a classified error list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub groups: Vec<ProcessedErrorGroup>,
    /// Number of groups not shown.
    pub hidden: usize,
}

impl SummaryView {
    /// `groups` must already be sorted (see [`crate::classify::classify_errors`]).
    pub fn new(groups: &[ProcessedErrorGroup]) -> Self {
        let shown = groups.len().min(SUMMARY_LIMIT);
        Self {
            groups: groups[..shown].to_vec(),
            hidden: groups.len() - shown,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_errors(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }

    pub fn chips(group: &ProcessedErrorGroup) -> Vec<ExampleChip> {
        group
            .examples
            .iter()
            .map(|value| ExampleChip { value: value.clone() })
            .collect()
    }

    /// "N more error types found", when groups were cut.
    pub fn footer(&self) -> Option<String> {
        match self.hidden {
            0 => None,
            1 => Some("1 more error type found".to_string()),
            n => Some(format!("{} more error types found", n)),
        }
    }

    /// Plain-text rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.is_empty() {
            out.push_str("No errors to summarize.\n");
            return out;
        }

        for group in &self.groups {
            let _ = writeln!(
                out,
                "{} [{}] {} ({})",
                group.severity.marker(),
                group.severity,
                group.title,
                group.count
            );
            let _ = writeln!(out, "   {}", group.message);
            let _ = writeln!(out, "   → {}", group.suggestion);
            if !group.examples.is_empty() {
                let chips: Vec<String> = Self::chips(group)
                    .iter()
                    .map(|chip| format!("[{}]", chip.value))
                    .collect();
                let _ = writeln!(out, "   Examples: {}", chips.join(" "));
            }
        }

        if let Some(footer) = self.footer() {
            let _ = writeln!(out, "\n{}", footer);
        }
        out
    }
}
