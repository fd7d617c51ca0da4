//! Session artifacts: the structured insights produced from a transcript.
//!
//! Artifacts are produced in a batch per synthesis (or fallback) invocation
//! and handed to the host's persistence layer; the core never stores them.

use serde::{Deserialize, Serialize};

/// The kind of a synthesized or heuristically-extracted insight.
///
/// Serialized with the camelCase names the document store expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactKind {
    Insight,
    OpenQuestion,
    Quote,
    FollowUpQuestion,
    ContextExpansion,
}

impl ArtifactKind {
    pub fn id(&self) -> &'static str {
        match self {
            ArtifactKind::Insight => "insight",
            ArtifactKind::OpenQuestion => "openQuestion",
            ArtifactKind::Quote => "quote",
            ArtifactKind::FollowUpQuestion => "followUpQuestion",
            ArtifactKind::ContextExpansion => "contextExpansion",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            ArtifactKind::Insight,
            ArtifactKind::OpenQuestion,
            ArtifactKind::Quote,
            ArtifactKind::FollowUpQuestion,
            ArtifactKind::ContextExpansion,
        ]
    }

    /// Maximum artifacts of this kind per session, or `None` for uncapped.
    pub fn max_per_session(&self) -> Option<usize> {
        match self {
            ArtifactKind::Insight => Some(3),
            ArtifactKind::OpenQuestion => Some(4),
            ArtifactKind::Quote => None,
            ArtifactKind::FollowUpQuestion => Some(1),
            ArtifactKind::ContextExpansion => Some(1),
        }
    }
}

/// A single reading-session artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub title: String,
    pub content: String,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Enforces the per-kind caps on a batch, preserving order and keeping the
/// earliest artifacts of each kind.
pub fn clamp_per_kind(artifacts: Vec<Artifact>) -> Vec<Artifact> {
    let mut counts = std::collections::HashMap::new();
    artifacts
        .into_iter()
        .filter(|artifact| {
            let count = counts.entry(artifact.kind).or_insert(0usize);
            *count += 1;
            match artifact.kind.max_per_session() {
                Some(cap) => *count <= cap,
                None => true,
            }
        })
        .collect()
}
