//! Multi-frame player sequences as `{phase, elapsed}` machines.
//!
//! Each machine is driven in two steps: `advance(dt)` accumulates time, then
//! `poll()` is called until it returns `None`, yielding one step per phase
//! boundary crossed. Leftover time carries into the next phase, so a large
//! `dt` never skips a step. `abort()` drops back to idle; steps already
//! yielded are not undone.

use serde::Serialize;

use crate::config::SequenceSettings;

/// Consumes `duration` from `elapsed` when it has fully elapsed.
fn take_elapsed(elapsed: &mut f32, duration: f32) -> bool {
    let duration = duration.max(0.0);
    if *elapsed < duration {
        return false;
    }
    *elapsed -= duration;
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RespawnPhase {
    Idle,
    /// Player is gone; nothing on screen yet.
    Hidden,
    /// "GET READY" is up, counting down to the arrival warp.
    Countdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RespawnStep {
    ShowGetReady,
    Arrive,
}

#[derive(Clone, Debug)]
pub struct RespawnSequence {
    phase: RespawnPhase,
    elapsed: f32,
    delay: f32,
    hidden_secs: f32,
    audio_offset: f32,
}

impl RespawnSequence {
    pub fn new(timing: &SequenceSettings) -> Self {
        Self {
            phase: RespawnPhase::Idle,
            elapsed: 0.0,
            delay: 0.0,
            hidden_secs: timing.respawn_hidden_secs,
            audio_offset: timing.hyperspace_audio_offset,
        }
    }

    pub fn phase(&self) -> RespawnPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != RespawnPhase::Idle
    }

    /// Restarts from `Hidden`. `delay` is the countdown length including the
    /// arrival audio lead-in.
    pub fn start(&mut self, delay: f32) {
        self.phase = RespawnPhase::Hidden;
        self.elapsed = 0.0;
        self.delay = delay;
    }

    pub fn abort(&mut self) {
        self.phase = RespawnPhase::Idle;
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        if self.is_active() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn poll(&mut self) -> Option<RespawnStep> {
        match self.phase {
            RespawnPhase::Idle => None,
            RespawnPhase::Hidden => {
                if !take_elapsed(&mut self.elapsed, self.hidden_secs) {
                    return None;
                }
                self.phase = RespawnPhase::Countdown;
                Some(RespawnStep::ShowGetReady)
            }
            RespawnPhase::Countdown => {
                if !take_elapsed(&mut self.elapsed, self.delay - self.audio_offset) {
                    return None;
                }
                self.abort();
                Some(RespawnStep::Arrive)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HyperspacePhase {
    Idle,
    /// Jump audio lead-in before the ship vanishes.
    Charging,
    Away,
    /// Arrival audio lead-in before the ship reappears.
    Reentry,
    /// Arrival effect still playing; a new jump is not allowed yet.
    Settling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HyperspaceStep {
    Depart,
    Arrive,
    Settled,
}

#[derive(Clone, Debug)]
pub struct HyperspaceSequence {
    phase: HyperspacePhase,
    elapsed: f32,
    audio_offset: f32,
    effect_secs: f32,
    away_secs: f32,
}

impl HyperspaceSequence {
    pub fn new(timing: &SequenceSettings) -> Self {
        Self {
            phase: HyperspacePhase::Idle,
            elapsed: 0.0,
            audio_offset: timing.hyperspace_audio_offset,
            effect_secs: timing.hyperspace_effect_secs,
            away_secs: timing.hyperspace_away_secs,
        }
    }

    pub fn phase(&self) -> HyperspacePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != HyperspacePhase::Idle
    }

    pub fn start(&mut self) {
        self.phase = HyperspacePhase::Charging;
        self.elapsed = 0.0;
    }

    pub fn abort(&mut self) {
        self.phase = HyperspacePhase::Idle;
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        if self.is_active() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn poll(&mut self) -> Option<HyperspaceStep> {
        loop {
            match self.phase {
                HyperspacePhase::Idle => return None,
                HyperspacePhase::Charging => {
                    if !take_elapsed(&mut self.elapsed, self.audio_offset) {
                        return None;
                    }
                    self.phase = HyperspacePhase::Away;
                    return Some(HyperspaceStep::Depart);
                }
                HyperspacePhase::Away => {
                    if !take_elapsed(&mut self.elapsed, self.effect_secs + self.away_secs) {
                        return None;
                    }
                    self.phase = HyperspacePhase::Reentry;
                }
                HyperspacePhase::Reentry => {
                    if !take_elapsed(&mut self.elapsed, self.audio_offset) {
                        return None;
                    }
                    self.phase = HyperspacePhase::Settling;
                    return Some(HyperspaceStep::Arrive);
                }
                HyperspacePhase::Settling => {
                    if !take_elapsed(&mut self.elapsed, self.effect_secs) {
                        return None;
                    }
                    self.abort();
                    return Some(HyperspaceStep::Settled);
                }
            }
        }
    }
}

/// Countdown for a transient on-screen message.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MessageTimer {
    remaining: Option<f32>,
}

impl MessageTimer {
    pub fn show(&mut self, secs: f32) {
        self.remaining = Some(secs);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Returns `true` on the tick the message should be cleared.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };
        *remaining -= dt.max(0.0);
        if *remaining > 0.0 {
            return false;
        }
        self.remaining = None;
        true
    }
}
