//! Chat payload rendered from an analysis event.
//!
//! The builder is a pure function over the event and the project's
//! notification settings: same inputs, same payload. Absent pieces of
//! the event (no gate, no branch, empty mention) simply drop out of
//! the output.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::ProjectConfig;
use crate::analysis::{AnalysisEvent, Condition};

/// Message posted to the incoming webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub color: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub title: String,
    pub value: String,
}

/// Builds the notification payload for one analyzed project.
pub struct PayloadBuilder<'a> {
    analysis: &'a AnalysisEvent,
    project: &'a ProjectConfig,
    project_url: Option<String>,
    username: Option<String>,
    include_branch: bool,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(analysis: &'a AnalysisEvent, project: &'a ProjectConfig) -> Self {
        Self {
            analysis,
            project,
            project_url: None,
            username: None,
            include_branch: false,
        }
    }

    /// Dashboard URL shown as the message link target.
    pub fn project_url(mut self, url: impl Into<String>) -> Self {
        self.project_url = Some(url.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Append the branch name to the message for non-main branches.
    pub fn include_branch(mut self, include: bool) -> Self {
        self.include_branch = include;
        self
    }

    pub fn build(self) -> Payload {
        let url = self
            .project_url
            .as_deref()
            .or(self.analysis.project.url.as_deref())
            .unwrap_or_default();

        let mut text = String::new();
        let notify = self.project.notify();
        if !notify.is_empty() {
            let _ = write!(text, "<{}> ", notify);
        }
        let _ = write!(text, "Project <{}|{}> analyzed", url, self.analysis.project.name);
        if self.include_branch {
            if let Some(branch) = &self.analysis.branch {
                if !branch.is_main {
                    if let Some(name) = &branch.name {
                        let _ = write!(text, " for branch [{}]", name);
                    }
                }
            }
        }
        text.push('.');

        let mut attachments = None;
        if let Some(gate) = &self.analysis.quality_gate {
            let _ = write!(text, "\nQuality gate status: {}", gate.status);

            let fail_only = self.project.qg_fail_only();
            let fields = gate
                .conditions
                .iter()
                .filter(|c| !fail_only || !c.status.is_ok())
                .map(condition_field)
                .collect();
            attachments = Some(vec![Attachment {
                color: gate.status.color().to_string(),
                fields,
            }]);
        }

        let channel = Some(self.project.channel.clone()).filter(|c| !c.is_empty());

        Payload {
            text,
            channel,
            username: self.username,
            attachments,
        }
    }
}

/// One attachment field per gate condition, e.g. title
/// `new_coverage: ERROR` with value `75.51%, error if <80.0%`.
fn condition_field(condition: &Condition) -> Field {
    Field {
        title: format!("{}: {}", condition.metric, condition.status),
        value: format!(
            "{}, error if {}{}",
            condition.value,
            condition.comparator.symbol(),
            condition.threshold
        ),
    }
}
