//! Provider flag resolution and adapter construction.
//!
//! Two separate concerns live here. Flag resolution answers "is this
//! provider administratively enabled?" from a tri-state override plus the
//! documented default. Construction answers "can we actually call it?" by
//! resolving the provider's credential; a missing or blank credential yields
//! "no adapter available" rather than an error, so the fallback loop can
//! move on to the next provider.
//!
//! The registry never retries and never falls back itself — that is the
//! caller's job (see [`super::transcribe_with_fallback`]).

use crate::config::SttSettings;
use crate::transcription::api::{AssemblyAiAdapter, DeepgramAdapter, ElevenLabsAdapter};
use crate::transcription::provider::TranscriptionProvider;
use crate::transcription::Transcriber;

/// Resolved enable/disable state for every provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderFlags {
    elevenlabs: bool,
    deepgram: bool,
    assemblyai: bool,
}

impl ProviderFlags {
    /// Resolves flags from configuration overrides.
    ///
    /// An unset or unrecognized override falls back to the provider default
    /// (ElevenLabs on, Deepgram on, AssemblyAI off). Only an explicit
    /// false-like value (`false`, `0`, `no`, `off`) disables a default-on
    /// provider, and only an explicit true-like value (`true`, `1`, `yes`,
    /// `on`) enables a default-off one.
    pub fn resolve(settings: &SttSettings) -> Self {
        Self {
            elevenlabs: resolve_flag(
                settings.elevenlabs_enabled.as_deref(),
                TranscriptionProvider::ElevenLabs,
            ),
            deepgram: resolve_flag(
                settings.deepgram_enabled.as_deref(),
                TranscriptionProvider::Deepgram,
            ),
            assemblyai: resolve_flag(
                settings.assemblyai_enabled.as_deref(),
                TranscriptionProvider::AssemblyAI,
            ),
        }
    }

    pub fn enabled(&self, provider: TranscriptionProvider) -> bool {
        match provider {
            TranscriptionProvider::ElevenLabs => self.elevenlabs,
            TranscriptionProvider::Deepgram => self.deepgram,
            TranscriptionProvider::AssemblyAI => self.assemblyai,
        }
    }
}

fn resolve_flag(raw: Option<&str>, provider: TranscriptionProvider) -> bool {
    parse_bool(raw).unwrap_or_else(|| provider.default_enabled())
}

/// Lenient tri-state boolean parse: `None` for anything that is not an
/// explicit true-like or false-like value.
fn parse_bool(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Constructs a fresh, stateless adapter for the given provider.
///
/// Returns `None` when the provider's credential is unset or blank after
/// trimming — "no adapter available", not an error. Credentials are trimmed
/// before use.
pub fn build_adapter(
    provider: TranscriptionProvider,
    settings: &SttSettings,
) -> Option<Box<dyn Transcriber>> {
    let api_key = credential(provider, settings)?;

    match provider {
        TranscriptionProvider::ElevenLabs => Some(Box::new(ElevenLabsAdapter::new(api_key))),
        TranscriptionProvider::Deepgram => Some(Box::new(DeepgramAdapter::new(api_key))),
        TranscriptionProvider::AssemblyAI => Some(Box::new(AssemblyAiAdapter::new(api_key))),
    }
}

fn credential(provider: TranscriptionProvider, settings: &SttSettings) -> Option<String> {
    let raw = match provider {
        TranscriptionProvider::ElevenLabs => settings.elevenlabs_api_key.as_deref(),
        TranscriptionProvider::Deepgram => settings.deepgram_api_key.as_deref(),
        TranscriptionProvider::AssemblyAI => settings.assemblyai_api_key.as_deref(),
    };
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_two_on_one_off() {
        let flags = ProviderFlags::resolve(&SttSettings::default());
        assert!(flags.enabled(TranscriptionProvider::ElevenLabs));
        assert!(flags.enabled(TranscriptionProvider::Deepgram));
        assert!(!flags.enabled(TranscriptionProvider::AssemblyAI));
    }

    #[test]
    fn explicit_false_disables_a_default_on_provider() {
        let settings = SttSettings {
            elevenlabs_enabled: Some("false".into()),
            ..Default::default()
        };
        let flags = ProviderFlags::resolve(&settings);
        assert!(!flags.enabled(TranscriptionProvider::ElevenLabs));
        assert!(flags.enabled(TranscriptionProvider::Deepgram));
    }

    #[test]
    fn explicit_true_enables_a_default_off_provider() {
        let settings = SttSettings {
            assemblyai_enabled: Some("1".into()),
            ..Default::default()
        };
        let flags = ProviderFlags::resolve(&settings);
        assert!(flags.enabled(TranscriptionProvider::AssemblyAI));
    }

    #[test]
    fn unrecognized_override_uses_the_default() {
        let settings = SttSettings {
            deepgram_enabled: Some("maybe".into()),
            assemblyai_enabled: Some("   ".into()),
            ..Default::default()
        };
        let flags = ProviderFlags::resolve(&settings);
        assert!(flags.enabled(TranscriptionProvider::Deepgram));
        assert!(!flags.enabled(TranscriptionProvider::AssemblyAI));
    }

    #[test]
    fn flag_values_are_case_insensitive_and_trimmed() {
        let settings = SttSettings {
            elevenlabs_enabled: Some(" OFF ".into()),
            assemblyai_enabled: Some("Yes".into()),
            ..Default::default()
        };
        let flags = ProviderFlags::resolve(&settings);
        assert!(!flags.enabled(TranscriptionProvider::ElevenLabs));
        assert!(flags.enabled(TranscriptionProvider::AssemblyAI));
    }

    #[test]
    fn missing_credential_means_no_adapter() {
        let settings = SttSettings::default();
        for provider in TranscriptionProvider::all() {
            assert!(build_adapter(*provider, &settings).is_none());
        }
    }

    #[test]
    fn blank_credential_means_no_adapter() {
        let settings = SttSettings {
            elevenlabs_api_key: Some("   ".into()),
            deepgram_api_key: Some("".into()),
            ..Default::default()
        };
        assert!(build_adapter(TranscriptionProvider::ElevenLabs, &settings).is_none());
        assert!(build_adapter(TranscriptionProvider::Deepgram, &settings).is_none());
    }

    #[test]
    fn present_credential_constructs_an_adapter() {
        let settings = SttSettings {
            assemblyai_api_key: Some("  aai-key  ".into()),
            ..Default::default()
        };
        let adapter = build_adapter(TranscriptionProvider::AssemblyAI, &settings).unwrap();
        assert_eq!(adapter.provider(), TranscriptionProvider::AssemblyAI);
    }
}
