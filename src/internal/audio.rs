//! Sound cues and the registry that owns their loaded handles.
//!
//! The registry is created once at startup, shared through an `Arc`, and
//! lives for the rest of the process. Playback is fire-and-forget: the
//! outcome is only logged.

use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::config::SoundConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Cue {
    /// Played once per successful joke load.
    Laugh,
    /// Played once per bonus reveal.
    Trombone,
}

impl Cue {
    pub fn asset(&self) -> SoundAsset {
        match self {
            Cue::Laugh => SoundAsset {
                name: "laugh",
                file: "dolphin.m4a",
            },
            Cue::Trombone => SoundAsset {
                name: "trombone",
                file: "trombone.mp3",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundAsset {
    pub name: &'static str,
    pub file: &'static str,
}

/// Session category passed to the backend before any sound is loaded.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Display, Default)]
pub enum AudioCategory {
    #[default]
    Playback,
    Ambient,
    SoloAmbient,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Display, Default)]
pub enum SoundBackendKind {
    /// Rings the terminal bell.
    #[default]
    Bell,
    /// Logs cues without making noise.
    Silent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundHandle {
    pub id: u64,
    pub asset: SoundAsset,
}

/// Invoked once playback finishes; `true` on success.
pub type PlaybackCallback = Box<dyn FnOnce(bool) + Send + 'static>;

/// The audio subsystem as seen by the application.
pub trait SoundBackend: Send + Sync {
    fn set_category(&self, category: AudioCategory);
    fn load(&self, asset: &SoundAsset) -> Result<SoundHandle>;
    fn set_volume(&self, handle: &SoundHandle, level: f32);
    fn play(&self, handle: &SoundHandle, on_complete: PlaybackCallback);
}

pub fn backend_for(kind: SoundBackendKind) -> Arc<dyn SoundBackend> {
    match kind {
        SoundBackendKind::Bell => Arc::new(BellBackend::default()),
        SoundBackendKind::Silent => Arc::new(SilentBackend::default()),
    }
}

/// Terminal bell. A muted handle (volume 0) does not ring.
#[derive(Default)]
pub struct BellBackend {
    next_id: AtomicU64,
    volumes: Mutex<HashMap<u64, f32>>,
}

impl SoundBackend for BellBackend {
    fn set_category(&self, category: AudioCategory) {
        tracing::debug!(%category, "bell backend ignores audio category");
    }

    fn load(&self, asset: &SoundAsset) -> Result<SoundHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut volumes) = self.volumes.lock() {
            volumes.insert(id, 1.0);
        }
        Ok(SoundHandle { id, asset: *asset })
    }

    fn set_volume(&self, handle: &SoundHandle, level: f32) {
        if let Ok(mut volumes) = self.volumes.lock() {
            volumes.insert(handle.id, level.clamp(0.0, 1.0));
        }
    }

    fn play(&self, handle: &SoundHandle, on_complete: PlaybackCallback) {
        let volume = self
            .volumes
            .lock()
            .ok()
            .and_then(|v| v.get(&handle.id).copied())
            .unwrap_or(1.0);
        if volume <= 0.0 {
            on_complete(true);
            return;
        }

        let mut stdout = std::io::stdout();
        let rang = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
        on_complete(rang.is_ok());
    }
}

#[derive(Default)]
pub struct SilentBackend {
    next_id: AtomicU64,
}

impl SoundBackend for SilentBackend {
    fn set_category(&self, _category: AudioCategory) {}

    fn load(&self, asset: &SoundAsset) -> Result<SoundHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Ok(SoundHandle { id, asset: *asset })
    }

    fn set_volume(&self, _handle: &SoundHandle, _level: f32) {}

    fn play(&self, handle: &SoundHandle, on_complete: PlaybackCallback) {
        tracing::debug!(asset = handle.asset.name, "silent playback");
        on_complete(true);
    }
}

/// Loaded cue handles plus the backend that plays them.
pub struct AudioRegistry {
    backend: Arc<dyn SoundBackend>,
    category: AudioCategory,
    volume: f32,
    handles: OnceCell<HashMap<Cue, SoundHandle>>,
}

impl AudioRegistry {
    pub fn new(backend: Arc<dyn SoundBackend>, config: &SoundConfig) -> Self {
        Self {
            backend,
            category: config.category,
            volume: config.volume,
            handles: OnceCell::new(),
        }
    }

    /// Set the category and load every cue. Runs at most once; later calls
    /// return the existing handles. Cues that fail to load are skipped.
    pub fn init(&self) -> &HashMap<Cue, SoundHandle> {
        self.handles.get_or_init(|| {
            self.backend.set_category(self.category);

            let mut handles = HashMap::new();
            for cue in Cue::iter() {
                let asset = cue.asset();
                match self.backend.load(&asset) {
                    Ok(handle) => {
                        self.backend.set_volume(&handle, self.volume);
                        tracing::info!(cue = %cue, file = asset.file, "Loaded sound");
                        handles.insert(cue, handle);
                    }
                    Err(e) => {
                        tracing::error!(cue = %cue, "failed to load the sound: {:#}", e);
                    }
                }
            }
            handles
        })
    }

    /// Play `cue` now without waiting for it to finish.
    pub fn play(&self, cue: Cue) {
        let Some(handle) = self.init().get(&cue) else {
            tracing::warn!(cue = %cue, "Cue not loaded; skipping playback");
            return;
        };

        self.backend.play(
            handle,
            Box::new(move |success| match success {
                true => tracing::debug!(cue = %cue, "successfully finished playing"),
                false => tracing::warn!(cue = %cue, "playback failed"),
            }),
        );
    }
}
