//! lectio — reading-session speech-to-text and note-synthesis core.
//!
//! The host application records an audio note against a book, uploads it,
//! and drives a session through the five-stage pipeline. This crate owns the
//! middle of that journey:
//!
//! - [`transcription`]: one contract, three provider adapters (ElevenLabs,
//!   Deepgram, AssemblyAI), flag- and credential-driven selection with
//!   caller-orchestrated fallback.
//! - [`synthesis`]: model-chain resolution for the artifact synthesis call,
//!   cost estimation with observability-only guardrails, and a
//!   deterministic fallback generator so a session always ends with
//!   artifacts, never a hard error.
//! - [`pipeline`]: the fixed, ordered stage set a session moves through.
//!
//! Persistence, auth, billing, upload transport, and the LLM call itself
//! stay in the host; this crate reaches them only through narrow traits and
//! the [`config::CoreConfig`] the host constructs once.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod synthesis;
pub mod transcription;

pub use config::CoreConfig;
pub use error::{SttError, SttErrorKind};
pub use pipeline::PipelineStage;
pub use transcription::{
    transcribe_with_fallback, Transcriber, TranscriptionProvider, TranscriptionRequest,
    TranscriptionResult,
};
