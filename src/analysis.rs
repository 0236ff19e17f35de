//! Analysis completion event delivered by the quality platform.
//!
//! Mirrors the JSON body of the platform's post-analysis webhook:
//! project identity, an optional quality gate with its condition list,
//! and an optional branch.

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEvent {
    pub project: ProjectInfo,
    #[serde(default)]
    pub quality_gate: Option<QualityGate>,
    #[serde(default)]
    pub branch: Option<Branch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub key: String,
    pub name: String,
    /// Dashboard URL reported by the platform itself.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QualityGate {
    pub status: GateStatus,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Aggregate pass/fail state of the quality gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateStatus {
    Ok,
    Error,
    None,
}

impl GateStatus {
    /// Slack attachment color for this gate state.
    pub fn color(&self) -> &'static str {
        match self {
            GateStatus::Ok => "good",
            GateStatus::Error => "danger",
            GateStatus::None => "warning",
        }
    }
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GateStatus::Ok => "OK",
            GateStatus::Error => "ERROR",
            GateStatus::None => "NONE",
        };
        write!(f, "{}", s)
    }
}

/// One metric threshold check within the quality gate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub metric: String,
    pub status: ConditionStatus,
    /// Measured value, as reported (may carry a unit suffix like `%`).
    #[serde(default)]
    pub value: String,
    #[serde(alias = "operator")]
    pub comparator: Comparator,
    #[serde(default, alias = "errorThreshold")]
    pub threshold: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionStatus {
    Ok,
    Warn,
    Error,
}

impl ConditionStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ConditionStatus::Ok)
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionStatus::Ok => "OK",
            ConditionStatus::Warn => "WARN",
            ConditionStatus::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Direction of the threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Comparator {
    #[serde(rename = "GT", alias = "GREATER_THAN")]
    GreaterThan,
    #[serde(rename = "LT", alias = "LESS_THAN")]
    LessThan,
}

impl Comparator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::GreaterThan => ">",
            Comparator::LessThan => "<",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_main: bool,
}
