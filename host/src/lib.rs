//! Headless stand-in for the game engine: drives a `LevelDirector` at a fixed
//! rate, flies a scripted pilot and resolves contacts by distance.

pub mod settings;

use anyhow::{anyhow, Context, Result};
use arcade_core::{
    BulletId, Command, CommandSink, DirectorSnapshot, EffectKind, EntityRef,
    GameConfig, LevelDirector, PlayerState, Vec3,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::settings::{seed_to_hex, SessionSettings};

pub const SHIP_RADIUS: f32 = 1.5;
pub const ALIEN_RADIUS: f32 = 2.0;

/// Fixed behavior for unattended runs: sit still, shoot whatever is closest
/// on a timer, jump away when something gets too close.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedPilot {
    pub fire_every_ticks: u32,
    pub gun_range: f32,
    pub panic_radius: f32,
}

impl Default for ScriptedPilot {
    fn default() -> Self {
        Self {
            fire_every_ticks: 20,
            gun_range: 60.0,
            panic_radius: 10.0,
        }
    }
}

impl ScriptedPilot {
    fn pick_target(&self, director: &LevelDirector, ship: &PlayerState) -> Option<EntityRef> {
        let alien = director.alien();
        if alien.is_active() && alien.state().position.distance(ship.position) <= self.gun_range {
            return Some(EntityRef::Alien);
        }
        director
            .field()
            .iter()
            .map(|rock| (rock.position.distance(ship.position), rock.id))
            .filter(|(distance, _)| *distance <= self.gun_range)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| EntityRef::Asteroid(id))
    }

    fn in_danger(&self, director: &LevelDirector, ship: &PlayerState) -> bool {
        director
            .field()
            .iter()
            .any(|rock| rock.position.distance(ship.position) <= self.panic_radius)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u32,
    pub seed_hex: String,
    pub tick_hz: u32,
    pub ticks_requested: u32,
    pub ticks_run: u32,
    pub simulated_secs: f32,
    /// One-based, as shown on the HUD.
    pub final_level: u32,
    pub final_score: u32,
    pub final_lives: u32,
    pub jumps_available: u32,
    pub game_over: bool,
    pub asteroids_destroyed: u64,
    pub aliens_destroyed: u64,
    pub alien_shots: u64,
    pub player_deaths: u64,
    pub hyperspace_jumps: u64,
    pub command_counts: BTreeMap<String, u64>,
}

#[derive(Serialize)]
struct EventLine<'a> {
    tick: u32,
    #[serde(flatten)]
    command: &'a Command,
}

/// Per-session command bookkeeping.
#[derive(Default)]
struct Recorder {
    pending: Vec<Command>,
    counts: BTreeMap<String, u64>,
    asteroids_destroyed: u64,
    aliens_destroyed: u64,
    alien_shots: u64,
    player_deaths: u64,
}

impl CommandSink for Recorder {
    fn emit(&mut self, command: Command) {
        self.pending.push(command);
    }
}

impl Recorder {
    /// Tallies the tick's commands, mirrors teleports onto the ship and
    /// streams them to the optional event log.
    fn drain<W: Write>(
        &mut self,
        tick: u32,
        ship: &mut PlayerState,
        mut events: Option<&mut W>,
    ) -> Result<()> {
        for command in self.pending.drain(..) {
            *self.counts.entry(command.name().to_string()).or_default() += 1;
            match &command {
                Command::DespawnAsteroid { .. } => self.asteroids_destroyed += 1,
                Command::HideAlien => self.aliens_destroyed += 1,
                Command::FireAlienBullet { .. } => self.alien_shots += 1,
                Command::PlayEffect {
                    kind: EffectKind::PlayerExplosion,
                    ..
                } => self.player_deaths += 1,
                Command::TeleportPlayer { position } => {
                    ship.position = *position;
                    ship.velocity = Vec3::ZERO;
                }
                _ => {}
            }
            if let Some(out) = events.as_deref_mut() {
                serde_json::to_writer(
                    &mut *out,
                    &EventLine {
                        tick,
                        command: &command,
                    },
                )
                .context("failed writing event")?;
                out.write_all(b"\n").context("failed writing event")?;
            }
        }
        Ok(())
    }
}

/// Contacts the engine's physics would report, found by plain distance checks.
fn find_contacts(director: &LevelDirector, ship: &PlayerState) -> Vec<(EntityRef, EntityRef)> {
    let mut contacts = Vec::new();
    let radius_per_mass = director.field().radius_per_mass();

    for (bullet, position) in director.alien_bullets() {
        if let Some(rock) = director
            .field()
            .iter()
            .find(|rock| rock.position.distance(position) <= rock.radius(radius_per_mass))
        {
            contacts.push((EntityRef::AlienBullet(bullet), EntityRef::Asteroid(rock.id)));
        } else if director.player_collidable() && position.distance(ship.position) <= SHIP_RADIUS
        {
            contacts.push((EntityRef::Player, EntityRef::AlienBullet(bullet)));
        }
    }

    if director.player_collidable() {
        if let Some(rock) = director.field().iter().find(|rock| {
            rock.position.distance(ship.position) <= rock.radius(radius_per_mass) + SHIP_RADIUS
        }) {
            contacts.push((EntityRef::Player, EntityRef::Asteroid(rock.id)));
        }
        let alien = director.alien();
        if alien.is_active()
            && alien.state().position.distance(ship.position) <= ALIEN_RADIUS + SHIP_RADIUS
        {
            contacts.push((EntityRef::Player, EntityRef::Alien));
        }
    }
    contacts
}

pub fn run_session(settings: &SessionSettings) -> Result<RunReport> {
    drive(settings, ScriptedPilot::default(), None::<&mut io::Sink>)
}

pub fn run_session_with_pilot(
    settings: &SessionSettings,
    pilot: ScriptedPilot,
) -> Result<RunReport> {
    drive(settings, pilot, None::<&mut io::Sink>)
}

/// Like `run_session`, also streaming every command as one JSON line.
pub fn run_session_with_events<W: Write>(
    settings: &SessionSettings,
    events: &mut W,
) -> Result<RunReport> {
    drive(settings, ScriptedPilot::default(), Some(events))
}

fn drive<W: Write>(
    settings: &SessionSettings,
    pilot: ScriptedPilot,
    mut events: Option<&mut W>,
) -> Result<RunReport> {
    let mut director = LevelDirector::new(settings.config.clone(), settings.seed)
        .with_context(|| {
            format!(
                "failed creating director for seed {}",
                seed_to_hex(settings.seed)
            )
        })?;
    let dt = settings.dt();
    let mut recorder = Recorder::default();
    let mut ship = PlayerState::default();
    let mut next_bullet = 0u32;
    let mut hyperspace_jumps = 0u64;

    director.init(&mut recorder)?;
    recorder.drain(0, &mut ship, events.as_deref_mut())?;

    let mut ticks_run = 0;
    for tick in 1..=settings.ticks {
        director.tick(dt, &ship, &mut recorder)?;
        director.fixed_tick(dt, &mut recorder);

        for (a, b) in find_contacts(&director, &ship) {
            director.report_collision(a, b, &mut recorder);
        }

        if director.player_controllable() {
            if pilot.in_danger(&director, &ship)
                && director.consume_hyperspace_jump(&mut recorder)
            {
                hyperspace_jumps += 1;
            } else if tick % pilot.fire_every_ticks.max(1) == 0 {
                if let Some(target) = pilot.pick_target(&director, &ship) {
                    next_bullet = next_bullet.wrapping_add(1);
                    let bullet = EntityRef::PlayerBullet(BulletId(next_bullet));
                    director.report_collision(bullet, target, &mut recorder);
                }
            }
        }

        recorder.drain(tick, &mut ship, events.as_deref_mut())?;
        ticks_run = tick;
        if director.is_game_over() {
            break;
        }
    }

    if let Some(out) = events {
        out.flush().context("failed flushing event log")?;
    }

    let snapshot = director.snapshot();
    let report = build_report(settings, ticks_run, dt, &snapshot, recorder, hyperspace_jumps);
    tracing::info!(
        seed = %report.seed_hex,
        score = report.final_score,
        level = report.final_level,
        ticks = report.ticks_run,
        game_over = report.game_over,
        "session finished"
    );
    Ok(report)
}

fn build_report(
    settings: &SessionSettings,
    ticks_run: u32,
    dt: f32,
    snapshot: &DirectorSnapshot,
    recorder: Recorder,
    hyperspace_jumps: u64,
) -> RunReport {
    RunReport {
        seed: settings.seed,
        seed_hex: seed_to_hex(settings.seed),
        tick_hz: settings.tick_hz,
        ticks_requested: settings.ticks,
        ticks_run,
        simulated_secs: ticks_run as f32 * dt,
        final_level: snapshot.level + 1,
        final_score: snapshot.score.score,
        final_lives: snapshot.score.lives,
        jumps_available: snapshot.score.jumps_available,
        game_over: snapshot.game_over,
        asteroids_destroyed: recorder.asteroids_destroyed,
        aliens_destroyed: recorder.aliens_destroyed,
        alien_shots: recorder.alien_shots,
        player_deaths: recorder.player_deaths,
        hyperspace_jumps,
        command_counts: recorder.counts,
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub config: GameConfig,
    pub seeds: Vec<u32>,
    pub ticks: u32,
    pub tick_hz: u32,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub ticks: u32,
    pub tick_hz: u32,
    pub jobs: Option<usize>,
    pub seeds: Vec<u32>,
    pub run_count: usize,
    pub avg_score: f64,
    pub max_score: u32,
    pub avg_level: f64,
    pub game_over_rate: f64,
    pub runs: Vec<RunReport>,
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if let Some(jobs) = config.jobs {
        if jobs == 0 {
            return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
        }
    }

    let run_one = |seed: &u32| -> Result<RunReport> {
        let settings = SessionSettings {
            seed: *seed,
            ticks: config.ticks,
            tick_hz: config.tick_hz,
            config: config.config.clone(),
        };
        run_session(&settings)
    };

    let results: Vec<Result<RunReport>> = if let Some(jobs) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| config.seeds.par_iter().map(run_one).collect())
    } else {
        config.seeds.par_iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(results.len());
    for result in results {
        runs.push(result?);
    }

    let count = runs.len() as f64;
    let avg_score = runs.iter().map(|run| run.final_score as f64).sum::<f64>() / count;
    let avg_level = runs.iter().map(|run| run.final_level as f64).sum::<f64>() / count;
    let game_over_rate = runs.iter().filter(|run| run.game_over).count() as f64 / count;
    let max_score = runs.iter().map(|run| run.final_score).max().unwrap_or(0);
    let generated_unix_s = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);

    Ok(BenchmarkReport {
        generated_unix_s,
        ticks: config.ticks,
        tick_hz: config.tick_hz,
        jobs: config.jobs,
        seeds: config.seeds,
        run_count: runs.len(),
        avg_score,
        max_score,
        avg_level,
        game_over_rate,
        runs,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating {}", parent.display()))?;
        }
    }
    let encoded = serde_json::to_vec_pretty(value)?;
    fs::write(path, encoded).with_context(|| format!("failed writing {}", path.display()))
}
