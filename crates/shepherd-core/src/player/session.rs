use tracing::{debug, warn};

use super::{AudioPlayer, PlaybackEvent};
use crate::catalog::{AudioResource, Catalog, Quote};
use crate::error::PlayerError;

/// Playlist navigation over an [`AudioPlayer`].
///
/// Player errors are logged and do not stop navigation: the UI still shows
/// the selected quote even when its audio cannot be played.
pub struct PlaybackSession<P, K> {
    player: P,
    catalog: K,
    playlist: Vec<Quote>,
    current_index: usize,
    is_playing: bool,
    tiktok_mode: bool,
}

impl<P: AudioPlayer, K: Catalog> PlaybackSession<P, K> {
    pub fn new(player: P, catalog: K) -> Self {
        Self {
            player,
            catalog,
            playlist: Vec::new(),
            current_index: 0,
            is_playing: false,
            tiktok_mode: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current(&self) -> Option<&Quote> {
        self.playlist.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn playlist(&self) -> &[Quote] {
        &self.playlist
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn tiktok_mode(&self) -> bool {
        self.tiktok_mode
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_tiktok_mode(&mut self, enabled: bool) {
        self.tiktok_mode = enabled;
    }

    /// Start `quote`, replacing the playlist. An empty `playlist` means
    /// "just this quote"; a quote missing from the playlist starts at index 0.
    pub fn play_quote(&mut self, quote: Quote, playlist: Vec<Quote>) -> PlaybackEvent {
        let playlist = if playlist.is_empty() {
            vec![quote.clone()]
        } else {
            playlist
        };
        self.current_index = playlist.iter().position(|q| q.id == quote.id).unwrap_or(0);
        self.playlist = playlist;
        self.start_current(true)
    }

    pub fn pause(&mut self) -> Option<PlaybackEvent> {
        let quote_id = self.current()?.id.clone();
        if let Err(e) = self.player.pause() {
            warn!(error = %e, "failed to pause playback");
        }
        self.is_playing = false;
        Some(PlaybackEvent::Paused { quote_id })
    }

    pub fn resume(&mut self) -> Option<PlaybackEvent> {
        let quote_id = self.current()?.id.clone();
        if let Err(e) = self.player.play() {
            warn!(error = %e, "failed to resume playback");
        }
        self.is_playing = true;
        Some(PlaybackEvent::Resumed { quote_id })
    }

    /// Advance with wrap-around.
    pub fn next_quote(&mut self) -> Option<PlaybackEvent> {
        if self.playlist.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.playlist.len();
        Some(self.start_current(false))
    }

    /// Step back with wrap-around.
    pub fn previous_quote(&mut self) -> Option<PlaybackEvent> {
        if self.playlist.is_empty() {
            return None;
        }
        self.current_index = if self.current_index == 0 {
            self.playlist.len() - 1
        } else {
            self.current_index - 1
        };
        Some(self.start_current(false))
    }

    /// `next_quote()` in swipe mode; `None` when swiping is off.
    pub fn swipe_next(&mut self) -> Option<PlaybackEvent> {
        if !self.tiktok_mode {
            return None;
        }
        self.next_quote()
    }

    /// `previous_quote()` in swipe mode; `None` when swiping is off.
    pub fn swipe_previous(&mut self) -> Option<PlaybackEvent> {
        if !self.tiktok_mode {
            return None;
        }
        self.previous_quote()
    }

    /// The backend reported the end of the current track.
    pub fn finish_current(&mut self) -> Option<PlaybackEvent> {
        let quote_id = self.current()?.id.clone();
        self.is_playing = false;
        Some(PlaybackEvent::Finished { quote_id })
    }

    fn start_current(&mut self, restarted: bool) -> PlaybackEvent {
        let quote_id = self.current().map(|q| q.id.clone()).unwrap_or_default();
        match self.catalog.resolve_audio(&quote_id) {
            Some(resource) => match self.load_and_play(&resource) {
                Ok(()) => self.is_playing = true,
                Err(e) => {
                    warn!(%quote_id, error = %e, "failed to start audio");
                    self.is_playing = false;
                }
            },
            None => {
                debug!(%quote_id, "no audio for quote");
                self.is_playing = false;
            }
        }
        PlaybackEvent::Started { quote_id, restarted }
    }

    fn load_and_play(&mut self, resource: &AudioResource) -> Result<(), PlayerError> {
        self.player.load(resource)?;
        self.player.play()
    }
}

/// Looping ambient track played under the teachings.
pub struct BackgroundMusic<P> {
    player: P,
    volume: f32,
    playing: bool,
}

impl<P: AudioPlayer> BackgroundMusic<P> {
    pub fn new(player: P, volume: f32) -> Self {
        Self {
            player,
            volume,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Load, loop and play `resource`. No-op when already playing.
    pub fn start(&mut self, resource: &AudioResource) {
        if self.playing {
            return;
        }
        match self.try_start(resource) {
            Ok(()) => self.playing = true,
            Err(e) => warn!(error = %e, "error starting background music"),
        }
    }

    /// Pause the track. No-op when not playing.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        match self.player.pause() {
            Ok(()) => self.playing = false,
            Err(e) => warn!(error = %e, "error stopping background music"),
        }
    }

    fn try_start(&mut self, resource: &AudioResource) -> Result<(), PlayerError> {
        self.player.load(resource)?;
        self.player.set_looping(true)?;
        self.player.set_volume(self.volume)?;
        self.player.play()
    }
}
