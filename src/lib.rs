//! Molecule-seeded procedural music themes
//!
//! Turns a SMILES string plus an externally computed molecular property record
//! into a short, fully deterministic music theme and plays it through the
//! system audio device. The same molecule always produces the same theme:
//! properties are folded into a seed string, hashed (FNV-1a), and the resulting
//! 32-bit seed drives a mulberry32 PRNG that fills a 16-slot note grid over a
//! pentatonic-minor interval set.
//!
//! Chemistry itself is out of scope — property calculation is delegated to an
//! opaque [`PropertySource`] collaborator, so the engine runs against a stub
//! table with zero chemistry dependencies.
//!
//! # Crate feature flags
//! - `streaming` (opt-in): Real-time audio output via rodio (`AudioDevice`)
//!
//! # Quick start
//! ## Build a theme deterministically
//! ```
//! use molsong::{build_theme, PropertyRecord};
//!
//! let props = PropertyRecord {
//!     molecular_weight: 46.07,
//!     atom_count: 9,
//!     bond_count: 8,
//!     ring_count: 0,
//! };
//! let theme = build_theme("CCO", &props);
//! assert_eq!(theme.slots.len(), 16);
//! assert!((70..=120).contains(&theme.tempo_bpm));
//! ```
//!
//! ## Real-time playback
//! ```no_run
//! # #[cfg(feature = "streaming")]
//! # {
//! use molsong::{PlaybackController, TablePropertySource};
//!
//! let mut controller = PlaybackController::new(TablePropertySource::new());
//! controller.ensure_theme("CCO").unwrap();
//! controller.play().unwrap();
//! // control returns immediately; sound continues on the audio thread
//! controller.stop();
//! # }
//! ```

#![warn(missing_docs)]

// Domain modules (leaf to root)
pub mod hash; // FNV-1a string hashing (seed derivation)
pub mod prng; // Mulberry32 seeded PRNG
pub mod properties; // Property record + upstream collaborator trait
pub mod render; // Offline synthesis of an event plan
pub mod sequencer; // Theme -> timed sound events
pub mod theme; // Property-seeded theme generator

pub mod playback; // Playback controller / session owner

#[cfg(feature = "streaming")]
pub mod streaming; // Audio Output & Streaming

/// Error types for theme generation and playback operations
#[derive(thiserror::Error, Debug)]
pub enum MolsongError {
    /// Caller input was empty or unusable before any work started
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The upstream property calculator failed; no theme is produced
    #[error("property computation failed: {0}")]
    PropertyCompute(String),

    /// Audio device error (playback aborted, theme data stays valid)
    #[error("audio device error: {0}")]
    AudioDevice(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for MolsongError {
    /// Converts a String into `MolsongError::Other`.
    ///
    /// Convenience conversion for generic string errors. All string errors land
    /// in the `Other` variant, losing semantic information about the error
    /// type; prefer the specific variant constructors where the kind matters:
    /// - `MolsongError::InvalidInput(msg)` for rejected caller input
    /// - `MolsongError::PropertyCompute(msg)` for upstream calculator failures
    /// - `MolsongError::AudioDevice(msg)` for device initialization/playback
    fn from(msg: String) -> Self {
        MolsongError::Other(msg)
    }
}

impl From<&str> for MolsongError {
    /// Converts a string slice into `MolsongError::Other`.
    ///
    /// See [`From<String>`] for guidance on when to use explicit variant
    /// constructors instead.
    fn from(msg: &str) -> Self {
        MolsongError::Other(msg.to_string())
    }
}

/// Result type for theme generation and playback operations
pub type Result<T> = std::result::Result<T, MolsongError>;

// Public API exports
pub use hash::fnv1a_32;
pub use playback::PlaybackController;
pub use prng::Mulberry32;
pub use properties::{PropertyRecord, PropertySource, TablePropertySource};
pub use render::render_plan;
pub use sequencer::{midi_to_freq, schedule_theme, EventPlan};
pub use theme::{build_theme, build_theme_variant, Note, Slot, Theme};

#[cfg(feature = "streaming")]
pub use streaming::{AudioDevice, StreamConfig};
