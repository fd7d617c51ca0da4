//! Reading-session pipeline stages.
//!
//! A session moves through five fixed stages, always forward:
//!
//! ```text
//! recording ──▶ uploading ──▶ transcribing ──▶ synthesizing ──▶ completing
//! ```
//!
//! The orchestrating session controller owns the current stage and advances
//! it one step at a time; this module only guarantees the value set, the
//! ordering, and the no-backward rule.

use serde::{Deserialize, Serialize};

/// Position of a session in its lifecycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    /// Audio is being captured on the device.
    #[default]
    Recording,
    /// The finished clip is being uploaded to storage.
    Uploading,
    /// A transcription provider is working on the clip.
    Transcribing,
    /// The transcript is being turned into artifacts.
    Synthesizing,
    /// Artifacts are being persisted and the session closed out.
    Completing,
}

impl PipelineStage {
    /// Stable identifier, used in persisted session records.
    pub fn id(&self) -> &'static str {
        match self {
            PipelineStage::Recording => "recording",
            PipelineStage::Uploading => "uploading",
            PipelineStage::Transcribing => "transcribing",
            PipelineStage::Synthesizing => "synthesizing",
            PipelineStage::Completing => "completing",
        }
    }

    /// A short human-readable label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Recording => "Recording",
            PipelineStage::Uploading => "Uploading",
            PipelineStage::Transcribing => "Transcribing",
            PipelineStage::Synthesizing => "Synthesizing",
            PipelineStage::Completing => "Completing",
        }
    }

    /// Parses a stage identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "recording" => Some(PipelineStage::Recording),
            "uploading" => Some(PipelineStage::Uploading),
            "transcribing" => Some(PipelineStage::Transcribing),
            "synthesizing" => Some(PipelineStage::Synthesizing),
            "completing" => Some(PipelineStage::Completing),
            _ => None,
        }
    }

    /// All stages in pipeline order.
    pub fn all() -> &'static [Self] {
        &[
            PipelineStage::Recording,
            PipelineStage::Uploading,
            PipelineStage::Transcribing,
            PipelineStage::Synthesizing,
            PipelineStage::Completing,
        ]
    }

    /// The stage that follows this one, or `None` at the end of the pipeline.
    pub fn next(&self) -> Option<Self> {
        match self {
            PipelineStage::Recording => Some(PipelineStage::Uploading),
            PipelineStage::Uploading => Some(PipelineStage::Transcribing),
            PipelineStage::Transcribing => Some(PipelineStage::Synthesizing),
            PipelineStage::Synthesizing => Some(PipelineStage::Completing),
            PipelineStage::Completing => None,
        }
    }

    /// Whether moving from `self` to `target` respects the no-backward rule.
    pub fn can_advance_to(&self, target: PipelineStage) -> bool {
        target >= *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_five_stages_in_order() {
        let ids: Vec<&str> = PipelineStage::all().iter().map(|s| s.id()).collect();
        assert_eq!(
            ids,
            vec![
                "recording",
                "uploading",
                "transcribing",
                "synthesizing",
                "completing"
            ]
        );
    }

    #[test]
    fn stages_are_totally_ordered() {
        let all = PipelineStage::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn next_walks_the_whole_pipeline() {
        let mut stage = PipelineStage::Recording;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen, PipelineStage::all());
    }

    #[test]
    fn no_skipping_backward() {
        assert!(PipelineStage::Recording.can_advance_to(PipelineStage::Uploading));
        assert!(PipelineStage::Transcribing.can_advance_to(PipelineStage::Transcribing));
        assert!(!PipelineStage::Synthesizing.can_advance_to(PipelineStage::Uploading));
        assert!(!PipelineStage::Completing.can_advance_to(PipelineStage::Recording));
    }

    #[test]
    fn id_round_trip() {
        for stage in PipelineStage::all() {
            assert_eq!(PipelineStage::from_id(stage.id()), Some(*stage));
        }
        assert_eq!(PipelineStage::from_id("paused"), None);
    }

    #[test]
    fn serializes_as_lowercase_id() {
        let json = serde_json::to_string(&PipelineStage::Transcribing).unwrap();
        assert_eq!(json, "\"transcribing\"");
    }

    #[test]
    fn default_stage_is_recording() {
        assert_eq!(PipelineStage::default(), PipelineStage::Recording);
    }
}
