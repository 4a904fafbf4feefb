//! Playback controller
//!
//! Owns the single mutable piece of state in the engine: the current theme and
//! (under the `streaming` feature) the active playback session. Sessions are
//! replaced wholesale on every start/stop/regenerate transition — the previous
//! one is fully stopped and dropped before a new theme becomes audible, so two
//! themes can never overlap.

use crate::properties::PropertySource;
use crate::theme::{build_theme, build_theme_variant, Theme};
use crate::{MolsongError, Result};

#[cfg(feature = "streaming")]
use crate::render::render_plan;
#[cfg(feature = "streaming")]
use crate::sequencer::schedule_theme;
#[cfg(feature = "streaming")]
use crate::streaming::{AudioDevice, StreamConfig};

/// One active playback session: the device handle and the theme it plays.
#[cfg(feature = "streaming")]
struct Session {
    device: AudioDevice,
    theme_id: String,
}

/// Holds at most one current theme and at most one active session.
///
/// The property source collaborator is owned by the controller so every theme
/// build goes through the same upstream boundary, and its failures abort theme
/// construction instead of being masked.
pub struct PlaybackController<P: PropertySource> {
    source: P,
    theme: Option<Theme>,
    #[cfg(feature = "streaming")]
    config: StreamConfig,
    #[cfg(feature = "streaming")]
    session: Option<Session>,
}

impl<P: PropertySource> PlaybackController<P> {
    /// Create a controller around a property source. No theme, nothing playing.
    pub fn new(source: P) -> Self {
        PlaybackController {
            source,
            theme: None,
            #[cfg(feature = "streaming")]
            config: StreamConfig::default(),
            #[cfg(feature = "streaming")]
            session: None,
        }
    }

    /// The current theme, if one has been built.
    pub fn current_theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// Return the current theme, building one first if none exists.
    ///
    /// Fails with [`MolsongError::InvalidInput`] on an empty SMILES string and
    /// propagates upstream [`MolsongError::PropertyCompute`] failures; in both
    /// cases no partial theme is stored.
    pub fn ensure_theme(&mut self, smiles: &str) -> Result<&Theme> {
        let smiles = validated(smiles)?;
        if self.theme.is_none() {
            let props = self.source.compute_properties(smiles)?;
            return Ok(self.theme.insert(build_theme(smiles, &props)));
        }
        match &self.theme {
            Some(theme) => Ok(theme),
            None => unreachable!("theme stored above"),
        }
    }

    /// Build and store a fresh salted variant, replacing any current theme.
    ///
    /// The salt is the current UNIX-epoch time in milliseconds, so repeated
    /// regeneration on the same molecule yields audibly different themes. Use
    /// [`regenerate_with_salt`](Self::regenerate_with_salt) directly when the
    /// variant must be reproducible.
    pub fn regenerate(&mut self, smiles: &str) -> Result<&Theme> {
        let salt = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis().to_string())
            .unwrap_or_else(|_| "0".to_string());
        self.regenerate_with_salt(smiles, &salt)
    }

    /// Build and store a fresh variant with an explicit salt.
    ///
    /// Fully deterministic given (smiles, properties, salt); the resulting
    /// `theme_id` carries the regenerated `-r` marker. Safe to call regardless
    /// of playback state — the active session, if any, keeps playing the old
    /// theme until [`stop`](Self::stop) or the next `play`.
    pub fn regenerate_with_salt(&mut self, smiles: &str, salt: &str) -> Result<&Theme> {
        let smiles = validated(smiles)?;
        let props = self.source.compute_properties(smiles)?;
        Ok(self.theme.insert(build_theme_variant(smiles, &props, salt)))
    }

    /// Drop the current theme without touching playback.
    pub fn clear_theme(&mut self) {
        self.theme = None;
    }

    /// Stop the active session, if any.
    ///
    /// Idempotent and infallible: safe when nothing is playing and when the
    /// session already finished naturally.
    pub fn stop(&mut self) {
        #[cfg(feature = "streaming")]
        if let Some(session) = self.session.take() {
            session.device.stop();
        }
    }
}

#[cfg(feature = "streaming")]
impl<P: PropertySource> PlaybackController<P> {
    /// Override the stream configuration for subsequent sessions.
    pub fn set_stream_config(&mut self, config: StreamConfig) {
        self.config = config;
    }

    /// Schedule and play the current theme.
    ///
    /// Any previous session is fully stopped and released first. Control
    /// returns as soon as the rendered buffer is handed to the device; sound
    /// continues on the audio thread over the following seconds. Fails with
    /// [`MolsongError::AudioDevice`] when no output device exists — the theme
    /// stays valid and playable once audio becomes available.
    pub fn play(&mut self) -> Result<()> {
        if self.theme.is_none() {
            return Err(MolsongError::InvalidInput(
                "no theme to play; call ensure_theme first".into(),
            ));
        }

        // No overlapping sessions: clear before the new device starts. Must
        // happen before the theme is borrowed below.
        self.stop();

        let Some(theme) = self.theme.as_ref() else {
            unreachable!("theme checked above; stop() never clears it");
        };
        let plan = schedule_theme(theme);
        let samples = render_plan(&plan, self.config.sample_rate);
        let device = AudioDevice::play(self.config, samples)?;
        self.session = Some(Session {
            device,
            theme_id: theme.theme_id.clone(),
        });
        Ok(())
    }

    /// The theme id of the active session, if one is playing.
    pub fn active_theme_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.theme_id.as_str())
    }

    /// True while a session exists and its buffer has not drained or been
    /// stopped.
    pub fn is_playing(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.device.is_finished())
    }

    /// Block until the active session drains naturally.
    pub fn wait_for_finish(&self) {
        if let Some(session) = &self.session {
            session.device.wait_for_finish();
        }
    }
}

/// Reject empty/whitespace SMILES before any upstream work.
fn validated(smiles: &str) -> Result<&str> {
    let trimmed = smiles.trim();
    if trimmed.is_empty() {
        return Err(MolsongError::InvalidInput("empty SMILES string".into()));
    }
    Ok(trimmed)
}
