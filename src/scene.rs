//! Scene table: paired pattern assignments switched atomically
//!
//! A scene assigns one pattern player to each of the two channels. The
//! table owns every player, keeps at most one scene active and enforces
//! stop-before-start ordering on switches so no channel is left at a
//! stale non-zero level.

use embassy_time::Duration;
use heapless::Vec;

use crate::pattern::PatternPlayer;
use crate::waveform::Shape;
use crate::{Channel, PwmOutput};

/// Errors from scene table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SceneError {
    /// The requested index is outside the table.
    UnknownScene(usize),
}

impl core::fmt::Display for SceneError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SceneError::UnknownScene(index) => write!(f, "unknown scene {}", index),
        }
    }
}

/// One pattern player per channel, started and stopped together.
#[derive(Debug)]
pub struct Scene {
    a: PatternPlayer,
    b: PatternPlayer,
}

impl Scene {
    pub fn new(a: PatternPlayer, b: PatternPlayer) -> Self {
        Self { a, b }
    }

    pub fn players(&self) -> (&PatternPlayer, &PatternPlayer) {
        (&self.a, &self.b)
    }

    fn start(&mut self) {
        self.a.start();
        self.b.start();
    }

    /// Stop both players. Both zero writes are attempted even when the
    /// first is rejected; returns how many writes failed.
    fn stop<O: PwmOutput>(&mut self, output: &mut O, frequency_hz: u32) -> u32 {
        let mut failures = 0;
        if self.a.stop(output, frequency_hz).is_err() {
            failures += 1;
        }
        if self.b.stop(output, frequency_hz).is_err() {
            failures += 1;
        }
        failures
    }

    /// One tick for both players; returns how many writes were rejected.
    fn service<O: PwmOutput>(
        &mut self,
        output: &mut O,
        frequency_hz: u32,
        tick: Duration,
    ) -> u32 {
        let mut failures = 0;
        if self.a.service(output, frequency_hz, tick).is_err() {
            failures += 1;
        }
        if self.b.service(output, frequency_hz, tick).is_err() {
            failures += 1;
        }
        failures
    }
}

/// Ordered table of up to `N` scenes.
///
/// Scene 0 is the base scene (both channels off by convention).
#[derive(Debug, Default)]
pub struct SceneTable<const N: usize> {
    scenes: Vec<Scene, N>,
    active: Option<usize>,
    write_failures: u32,
}

impl<const N: usize> SceneTable<N> {
    pub const fn new() -> Self {
        Self {
            scenes: Vec::new(),
            active: None,
            write_failures: 0,
        }
    }

    /// Append a scene. Returns the scene back when the table is full.
    pub fn push(&mut self, scene: Scene) -> Result<(), Scene> {
        self.scenes.push(scene)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Index of the active scene, if any.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Scene at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    /// Rejected channel writes observed so far, across stops and ticks.
    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }

    /// Start scene `index`, stopping the active scene first.
    pub fn start_scene<O: PwmOutput>(
        &mut self,
        index: usize,
        output: &mut O,
        frequency_hz: u32,
    ) -> Result<(), SceneError> {
        if index >= self.scenes.len() {
            return Err(SceneError::UnknownScene(index));
        }

        self.stop_scene(output, frequency_hz);
        self.active = Some(index);
        self.scenes[index].start();
        Ok(())
    }

    /// Stop the active scene, if any, zeroing both of its channels.
    ///
    /// Rejected zero writes are counted; the scene is considered
    /// stopped regardless.
    pub fn stop_scene<O: PwmOutput>(&mut self, output: &mut O, frequency_hz: u32) {
        let Some(index) = self.active.take() else {
            return;
        };

        let failed = self.scenes[index].stop(output, frequency_hz);
        if failed > 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} zero writes rejected while stopping scene", failed);
            self.write_failures += failed;
        }
    }

    /// One driver tick: service every running player in the table, not
    /// just the active scene's.
    ///
    /// A rejected write is counted and skipped; the remaining players
    /// are still serviced this tick.
    pub fn service<O: PwmOutput>(
        &mut self,
        output: &mut O,
        frequency_hz: u32,
        tick: Duration,
    ) {
        let mut failures = 0;
        for scene in &mut self.scenes {
            failures += scene.service(output, frequency_hz, tick);
        }
        if failures > 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("{} channel writes rejected this tick", failures);
            self.write_failures += failures;
        }
    }
}

impl SceneTable<5> {
    /// The built-in five-scene show of the reference installation.
    ///
    /// Scene 0 is the dark base scene; the others pair identical shapes
    /// on both channels, channel B phase-shifted by half a period where
    /// the show calls for alternation.
    pub fn standard() -> Self {
        let mut table = Self::new();
        let scenes = [
            Scene::new(
                player(Channel::A, Shape::Off, 1_000, 0),
                player(Channel::B, Shape::Off, 1_000, 0),
            ),
            Scene::new(
                player(Channel::A, Shape::Arch, 4_000, 0),
                player(Channel::B, Shape::Arch, 4_000, 0),
            ),
            Scene::new(
                player(Channel::A, Shape::RampHold, 2_000, 0),
                player(Channel::B, Shape::RampHold, 2_000, 1_000),
            ),
            Scene::new(
                player(Channel::A, Shape::TripleFlash, 1_300, 0),
                player(Channel::B, Shape::TripleFlash, 1_300, 650),
            ),
            Scene::new(
                player(Channel::A, Shape::HalfDuty, 100, 0),
                player(Channel::B, Shape::HalfDuty, 100, 50),
            ),
        ];
        for scene in scenes {
            let _ = table.push(scene);
        }
        table
    }
}

fn player(channel: Channel, shape: Shape, period_ms: u64, offset_ms: u64) -> PatternPlayer {
    PatternPlayer::new(
        channel,
        shape,
        Duration::from_millis(period_ms),
        Duration::from_millis(offset_ms),
    )
    .expect("built-in periods are non-zero")
}
