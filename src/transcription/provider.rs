//! Transcription provider definitions and metadata.
//!
//! Each provider has its own API endpoint, authentication method, and wire
//! protocol (see the adapter implementations under [`super::api`]).

use serde::{Deserialize, Serialize};

/// Represents a supported transcription provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    ElevenLabs,
    Deepgram,
    AssemblyAI,
}

impl TranscriptionProvider {
    pub fn id(&self) -> &'static str {
        match self {
            TranscriptionProvider::ElevenLabs => "elevenlabs",
            TranscriptionProvider::Deepgram => "deepgram",
            TranscriptionProvider::AssemblyAI => "assemblyai",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TranscriptionProvider::ElevenLabs => "ElevenLabs",
            TranscriptionProvider::Deepgram => "Deepgram",
            TranscriptionProvider::AssemblyAI => "AssemblyAI",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "elevenlabs" => Some(TranscriptionProvider::ElevenLabs),
            "deepgram" => Some(TranscriptionProvider::Deepgram),
            "assemblyai" => Some(TranscriptionProvider::AssemblyAI),
            _ => None,
        }
    }

    /// The batch speech model requested from the provider.
    pub fn api_model_name(&self) -> &'static str {
        match self {
            TranscriptionProvider::ElevenLabs => "scribe_v2",
            TranscriptionProvider::Deepgram => "nova-3",
            TranscriptionProvider::AssemblyAI => "universal-2",
        }
    }

    /// Returns a human-readable description of the provider's batch model
    pub fn description(&self) -> &'static str {
        match self {
            TranscriptionProvider::ElevenLabs => "Scribe v2 (batch, primary)",
            TranscriptionProvider::Deepgram => "Nova-3 (batch, fastest)",
            TranscriptionProvider::AssemblyAI => "Universal-2 (batch, async job API)",
        }
    }

    /// Batch transcription cost in USD per audio minute.
    ///
    /// Updated 2026-02-20. Re-check provider pricing pages before relying on
    /// these for anything beyond the provider picker.
    pub fn batch_cost_per_minute_usd(&self) -> f64 {
        match self {
            TranscriptionProvider::ElevenLabs => 0.22 / 60.0,
            TranscriptionProvider::Deepgram => 0.0043,
            TranscriptionProvider::AssemblyAI => 0.65 / 60.0,
        }
    }

    /// Whether the provider is administratively enabled when no explicit
    /// override is configured.
    pub fn default_enabled(&self) -> bool {
        match self {
            TranscriptionProvider::ElevenLabs => true,
            TranscriptionProvider::Deepgram => true,
            TranscriptionProvider::AssemblyAI => false,
        }
    }

    /// All providers, in fallback priority order.
    pub fn all() -> &'static [Self] {
        &[
            TranscriptionProvider::ElevenLabs,
            TranscriptionProvider::Deepgram,
            TranscriptionProvider::AssemblyAI,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip() {
        for provider in TranscriptionProvider::all() {
            assert_eq!(
                TranscriptionProvider::from_id(provider.id()),
                Some(*provider)
            );
        }
        assert_eq!(TranscriptionProvider::from_id("whisper"), None);
    }

    #[test]
    fn two_providers_on_by_default_one_off() {
        let enabled: Vec<bool> = TranscriptionProvider::all()
            .iter()
            .map(|p| p.default_enabled())
            .collect();
        assert_eq!(enabled, vec![true, true, false]);
    }

    #[test]
    fn priority_order_starts_with_elevenlabs() {
        assert_eq!(
            TranscriptionProvider::all()[0],
            TranscriptionProvider::ElevenLabs
        );
    }
}
