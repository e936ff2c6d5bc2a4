use serde::Serialize;

use crate::config::ScoreSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreState {
    pub score: u32,
    pub lives: u32,
    pub jumps_available: u32,
    pub next_jump_score: u32,
}

/// Score, lives and the hyperspace-jump ladder.
#[derive(Clone, Debug)]
pub struct ScoreBoard {
    state: ScoreState,
    alien_points: u32,
}

/// Points for a player kill of an asteroid of `mass`, in steps of 50.
/// Lighter asteroids are harder to hit and pay more.
pub fn asteroid_points(mass: f32) -> u32 {
    if !(mass > 0.0) || !mass.is_finite() {
        return 0;
    }
    let raw = (100.0 / f64::from(mass)) / 50.0;
    let steps = raw.ceil();
    if steps >= f64::from(u32::MAX / 50) {
        return u32::MAX / 50 * 50;
    }
    steps as u32 * 50
}

impl ScoreBoard {
    pub fn new(settings: &ScoreSettings) -> Self {
        Self {
            state: ScoreState {
                score: 0,
                lives: settings.starting_lives,
                jumps_available: 0,
                next_jump_score: settings.first_jump_score,
            },
            alien_points: settings.alien_points,
        }
    }

    #[inline]
    pub fn state(&self) -> ScoreState {
        self.state
    }

    pub fn hyperspace_available(&self) -> bool {
        self.state.jumps_available > 0
    }

    pub fn is_game_over(&self) -> bool {
        self.state.lives == 0
    }

    /// A non-positive mass is the "not a player kill" sentinel and awards nothing.
    pub fn award_asteroid_kill(&mut self, mass: f32) -> u32 {
        let points = asteroid_points(mass);
        self.add_score(points);
        points
    }

    pub fn award_alien_kill(&mut self, level: u32) -> u32 {
        let points = self.alien_points.saturating_mul(level.saturating_add(1));
        self.add_score(points);
        points
    }

    fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.state.score = self.state.score.saturating_add(points);

        while self.state.score > self.state.next_jump_score {
            self.state.jumps_available += 1;
            let doubled = self.state.next_jump_score.saturating_mul(2);
            tracing::info!(
                score = self.state.score,
                jumps = self.state.jumps_available,
                next_jump_score = doubled,
                "hyperspace jump awarded"
            );
            if doubled == self.state.next_jump_score {
                break;
            }
            self.state.next_jump_score = doubled;
        }
    }

    /// Spends one jump. No-op when none are banked.
    pub fn consume_jump(&mut self) -> bool {
        if self.state.jumps_available == 0 {
            return false;
        }
        self.state.jumps_available -= 1;
        true
    }

    /// Returns whether this was the last life.
    pub fn lose_life(&mut self) -> bool {
        self.state.lives = self.state.lives.saturating_sub(1);
        self.state.lives == 0
    }
}
