//! Sound triggers the simulation fires by symbolic name
//!
//! The sim knows nothing about buffering, volume or mixing; it calls a
//! fire-and-forget sink and the audio collaborator does the rest.

/// Sound effect vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    /// Player jumped (ground or wall)
    Jump,
    /// Player landed hard
    Land,
    /// Player died
    Death,
    /// Cannons fired a volley
    Shoot,
    /// Cannonball hit something
    CannonballExplosion,
    /// Wall slide (looping; stop is idempotent)
    Slide,
    /// Mid-air jump pickup
    JumpToken,
}

/// Where the sim sends its sound triggers.
///
/// `stop` must be safe to call for sounds that are not currently playing,
/// and `play` of a looping sound that is already playing must not restart it.
pub trait AudioSink {
    fn play(&mut self, sound: Sound);
    fn stop(&mut self, sound: Sound);
}

/// Sink that discards everything (headless runs, benchmarks)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _sound: Sound) {}
    fn stop(&mut self, _sound: Sound) {}
}

/// Sink that records triggers in order; used by tests to assert on
/// edge-triggered sound behavior.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<Sound>,
    pub stopped: Vec<Sound>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `sound` was played
    pub fn count(&self, sound: Sound) -> usize {
        self.played.iter().filter(|s| **s == sound).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }

    fn stop(&mut self, sound: Sound) {
        self.stopped.push(sound);
    }
}
