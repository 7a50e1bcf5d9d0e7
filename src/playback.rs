use std::time::Duration;

use crate::{
    core::Speed,
    error::{SpriteError, SpriteResult},
};

/// Playback configuration. Echoed back unchanged; never persisted here.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSettings {
    pub speed: Speed,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub ping_pong: bool,
    pub reverse: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

/// What a single tick produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Playback moved to this frame index.
    Advanced(usize),
    /// Playback ran off the end, stopped, and reset to frame 0. Emitted once.
    Ended,
}

/// Deterministic frame sequencer over an ordered frame list.
///
/// The player never raises errors while ticking; loop wrap, ping-pong bounce
/// and end-of-animation are resolved by policy. Time is supplied by the
/// caller as timestamps from any monotonic clock, expressed as elapsed time
/// since an arbitrary fixed origin.
#[derive(Clone, Debug)]
pub struct Player {
    settings: AnimationSettings,
    frame_count: usize,
    state: PlayState,
    index: usize,
    direction: Direction,
    last_tick: Option<Duration>,
}

impl Player {
    pub fn new(frame_count: usize, settings: AnimationSettings) -> Self {
        Self {
            settings,
            frame_count,
            state: PlayState::Stopped,
            index: 0,
            direction: Direction::Forward,
            last_tick: None,
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn frame_index(&self) -> usize {
        self.index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn settings(&self) -> AnimationSettings {
        self.settings
    }

    /// Begin playing, resuming from the retained frame index.
    ///
    /// No-op when there are no frames. `now` becomes the tick reference; the
    /// first frame advance happens one interval later.
    pub fn start(&mut self, now: Duration) {
        if self.frame_count == 0 {
            return;
        }
        self.state = PlayState::Playing;
        self.last_tick = Some(now);
    }

    /// Stop ticking; the current frame index is retained.
    pub fn stop(&mut self) {
        self.state = PlayState::Stopped;
        self.last_tick = None;
    }

    pub fn pause(&mut self) {
        self.stop();
    }

    /// Replace the frame list. Position resets to frame 0, forward.
    pub fn set_frames(&mut self, frame_count: usize) {
        self.frame_count = frame_count;
        self.index = 0;
        self.direction = Direction::Forward;
        if frame_count == 0 {
            self.stop();
        }
    }

    /// Replace the settings. Toggling `reverse` resets position to frame 0,
    /// forward; other changes leave the position untouched.
    pub fn set_settings(&mut self, settings: AnimationSettings) {
        if settings.reverse != self.settings.reverse {
            self.index = 0;
            self.direction = Direction::Forward;
        }
        self.settings = settings;
    }

    /// Jump to a frame without ticking.
    pub fn seek(&mut self, index: usize) -> SpriteResult<()> {
        if index >= self.frame_count {
            return Err(SpriteError::playback(format!(
                "seek index {index} out of range for {} frames",
                self.frame_count
            )));
        }
        self.index = index;
        Ok(())
    }

    /// Apply at most one tick for the given timestamp.
    ///
    /// A tick fires only once the elapsed time since the last applied tick
    /// reaches one frame interval; the reference then resets to `now` rather
    /// than incrementing by exactly one interval, so leftover time is
    /// discarded (best-effort, not drift-corrected).
    pub fn advance(&mut self, now: Duration) -> Option<PlaybackEvent> {
        if self.state != PlayState::Playing {
            return None;
        }
        let last = match self.last_tick {
            Some(last) => last,
            None => {
                self.last_tick = Some(now);
                return None;
            }
        };
        let elapsed = now.checked_sub(last).unwrap_or(Duration::ZERO);
        if elapsed < self.settings.speed.frame_interval() {
            return None;
        }
        self.last_tick = Some(now);
        Some(self.step())
    }

    /// The pure single-tick transition, independent of any clock.
    ///
    /// Policy precedence: ping-pong bounce, then loop wrap, then stop at the
    /// end. `reverse` inverts the effective direction without mutating the
    /// stored one; a ping-pong bounce stores its flip back through the same
    /// inversion.
    pub fn step(&mut self) -> PlaybackEvent {
        if self.frame_count == 0 {
            self.stop();
            return PlaybackEvent::Ended;
        }

        let count = self.frame_count as i64;
        let mut effective = if self.settings.reverse {
            self.direction.opposite()
        } else {
            self.direction
        };
        let mut next = self.index as i64
            + match effective {
                Direction::Forward => 1,
                Direction::Backward => -1,
            };

        if self.settings.ping_pong {
            if effective == Direction::Backward && next < 0 {
                // Skip re-showing frame 0 immediately after the bounce.
                effective = Direction::Forward;
                next = 1;
            } else if effective == Direction::Forward && next >= count {
                effective = Direction::Backward;
                next = count - 2;
            }
            next = next.clamp(0, count - 1);
            self.direction = if self.settings.reverse {
                effective.opposite()
            } else {
                effective
            };
            self.index = next as usize;
            return PlaybackEvent::Advanced(self.index);
        }

        if self.settings.looped {
            if next >= count {
                next = 0;
            } else if next < 0 {
                next = count - 1;
            }
            self.index = next as usize;
            return PlaybackEvent::Advanced(self.index);
        }

        if next < 0 || next >= count {
            self.stop();
            self.index = 0;
            return PlaybackEvent::Ended;
        }
        self.index = next as usize;
        PlaybackEvent::Advanced(self.index)
    }
}
