use super::*;
use crate::score::asteroid_points;

const DT: f32 = 1.0 / 60.0;

fn idle_player() -> PlayerState {
    PlayerState::default()
}

fn director(seed: u32) -> (LevelDirector, Vec<Command>) {
    let mut director =
        LevelDirector::new(GameConfig::default(), seed).expect("default config is valid");
    let mut commands = Vec::new();
    director.init(&mut commands).expect("init succeeds");
    (director, commands)
}

/// Frame ticks only; asteroids stay where the wave put them.
fn run_for(director: &mut LevelDirector, secs: f32, player: &PlayerState) -> Vec<Command> {
    let mut commands = Vec::new();
    let steps = (secs / DT).ceil() as u32;
    for _ in 0..steps {
        director
            .tick(DT, player, &mut commands)
            .expect("tick succeeds");
    }
    commands
}

/// Past the opening "GET READY" sequence with the player controllable.
fn ready(seed: u32) -> LevelDirector {
    let (mut director, _) = director(seed);
    run_for(&mut director, 2.5, &idle_player());
    assert!(director.player_controllable());
    director
}

fn count(commands: &[Command], predicate: impl Fn(&Command) -> bool) -> usize {
    commands.iter().filter(|command| predicate(command)).count()
}

fn has_message(commands: &[Command], text: &str) -> bool {
    commands
        .iter()
        .any(|command| matches!(command, Command::DisplayMessage { text: t } if t == text))
}

fn has_effect(commands: &[Command], kind: EffectKind) -> bool {
    commands
        .iter()
        .any(|command| matches!(command, Command::PlayEffect { kind: k, .. } if *k == kind))
}

#[test]
fn init_launches_first_wave_with_player_hidden() {
    let (director, commands) = director(0xA11E_0001);

    assert_eq!(director.level(), 0);
    assert_eq!(
        count(&commands, |c| matches!(c, Command::SpawnAsteroidVisual { .. })),
        7
    );
    assert!(commands.contains(&Command::UpdateHud {
        score: 0,
        lives: 3,
        level: 1,
        hyperspace_available: false,
    }));
    assert!(commands.contains(&Command::SetPlayerPresence {
        visible: false,
        collidable: false,
    }));
    assert!(!has_message(&commands, MSG_LEVEL_COMPLETE));
    assert!(!director.player_controllable());
}

#[test]
fn second_init_is_ignored() {
    let (mut director, _) = director(1);
    let mut commands = Vec::new();
    director.init(&mut commands).expect("no-op");
    assert!(commands.is_empty());
    assert_eq!(director.field().remaining(), 7);
}

#[test]
fn tick_before_init_is_inert() {
    let mut director = LevelDirector::new(GameConfig::default(), 5).expect("valid");
    let commands = run_for(&mut director, 1.0, &idle_player());
    assert!(commands.is_empty());
    assert_eq!(director.now(), 0.0);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = GameConfig::default();
    config.mass.minimum_mass = 5.0;
    assert!(matches!(
        LevelDirector::new(config, 1),
        Err(CoreError::Config(_))
    ));
}

#[test]
fn opening_sequence_shows_get_ready_then_enables_player() {
    let (mut director, _) = director(7);

    let hidden = run_for(&mut director, 1.6, &idle_player());
    assert!(has_message(&hidden, MSG_GET_READY));
    assert!(!director.player_controllable());
    assert!(!director.player_collidable());

    let arrival = run_for(&mut director, 1.0, &idle_player());
    assert!(arrival.contains(&Command::SetPlayerPresence {
        visible: true,
        collidable: true,
    }));
    assert!(arrival.contains(&Command::PlayEffect {
        kind: EffectKind::Hyperspace,
        position: Vec3::ZERO,
        scale: 1.0,
    }));
    assert!(has_message(&arrival, ""));
    assert!(director.player_controllable());
}

#[test]
fn empty_field_starts_exactly_one_level() {
    let mut director = ready(11);
    director.field = AsteroidField::new(&director.config);

    let commands = run_for(&mut director, DT, &idle_player());
    assert_eq!(director.level(), 1);
    assert_eq!(
        count(&commands, |c| matches!(c, Command::SpawnAsteroidVisual { .. })),
        8
    );
    assert!(has_message(&commands, MSG_LEVEL_COMPLETE));
    assert!(commands
        .iter()
        .any(|c| matches!(c, Command::UpdateHud { level: 2, .. })));

    let later = run_for(&mut director, 0.5, &idle_player());
    assert_eq!(director.level(), 1);
    assert_eq!(
        count(&later, |c| matches!(c, Command::SpawnAsteroidVisual { .. })),
        0
    );

    let cleared = run_for(&mut director, 3.0, &idle_player());
    assert!(has_message(&cleared, ""));
}

#[test]
fn player_bullet_splits_asteroid_and_scores() {
    let mut director = ready(21);
    let rock = *director.field().iter().next().expect("wave spawned");
    let splits = rock.mass * 0.5 >= director.params().min_mass;

    let mut commands = Vec::new();
    director.report_collision(
        EntityRef::PlayerBullet(BulletId(9)),
        EntityRef::Asteroid(rock.id),
        &mut commands,
    );

    let expected = asteroid_points(rock.mass);
    assert_eq!(director.score().score, expected);
    assert!(commands.contains(&Command::DespawnBullet { id: BulletId(9) }));
    assert!(commands.contains(&Command::DespawnAsteroid { id: rock.id }));
    assert!(has_effect(&commands, EffectKind::Explosion));
    let children = count(&commands, |c| matches!(c, Command::SpawnAsteroidVisual { .. }));
    assert_eq!(children, if splits { 2 } else { 0 });
    assert_eq!(director.field().remaining(), 6 + children);
    assert!(commands
        .iter()
        .any(|c| matches!(c, Command::UpdateHud { score, .. } if *score == expected)));
}

#[test]
fn alien_bullet_kill_awards_nothing() {
    let mut director = ready(22);
    let rock = *director.field().iter().next().expect("wave spawned");

    let mut commands = Vec::new();
    director.on_alien_event(
        AlienEvent::Fired {
            origin: Vec3::planar(50.0, 0.0),
            direction: Vec3::planar(-1.0, 0.0),
        },
        &mut commands,
    );
    assert_eq!(director.alien_bullets().count(), 1);

    commands.clear();
    director.report_collision(
        EntityRef::Asteroid(rock.id),
        EntityRef::AlienBullet(BulletId(1)),
        &mut commands,
    );
    assert_eq!(director.score().score, 0);
    assert!(commands.contains(&Command::DespawnBullet { id: BulletId(1) }));
    assert!(commands.contains(&Command::DespawnAsteroid { id: rock.id }));
    assert_eq!(director.alien_bullets().count(), 0);
}

#[test]
fn asteroid_contact_only_plays_an_effect() {
    let mut director = ready(23);
    let mut rocks = director.field().iter().copied();
    let (a, b) = (rocks.next().expect("rock"), rocks.next().expect("rock"));

    let mut commands = Vec::new();
    director.report_collision(EntityRef::Asteroid(a.id), EntityRef::Asteroid(b.id), &mut commands);
    assert_eq!(
        commands,
        vec![Command::PlayEffect {
            kind: EffectKind::Collision,
            position: (a.position + b.position) * 0.5,
            scale: a.mass.min(b.mass),
        }]
    );
    assert_eq!(director.field().remaining(), 7);
}

#[test]
fn alien_bullets_expire_after_their_lifetime() {
    let mut director = ready(24);
    let mut commands = Vec::new();
    director.on_alien_event(
        AlienEvent::Fired {
            origin: Vec3::planar(0.0, 40.0),
            direction: Vec3::planar(0.0, -1.0),
        },
        &mut commands,
    );
    assert!(commands.contains(&Command::FireAlienBullet {
        id: BulletId(1),
        origin: Vec3::planar(0.0, 40.0),
        direction: Vec3::planar(0.0, -1.0),
        speed: 50.0,
    }));
    assert!(has_effect(&commands, EffectKind::AlienFire));

    let commands = run_for(&mut director, 5.1, &idle_player());
    assert!(commands.contains(&Command::DespawnBullet { id: BulletId(1) }));
    assert_eq!(director.alien_bullets().count(), 0);
}

#[test]
fn offscreen_shots_fly_in_and_outbound_ones_are_culled() {
    let mut director = ready(25);
    let mut commands = Vec::new();
    let inbound = AlienEvent::Fired {
        origin: Vec3::planar(0.0, 54.0),
        direction: Vec3::planar(0.0, -1.0),
    };
    director.on_alien_event(inbound, &mut commands);

    commands.clear();
    director.fixed_tick(DT, &mut commands);
    assert!(commands.is_empty());
    let (id, position) = director.alien_bullets().next().expect("bullet survives");
    assert_eq!(id, BulletId(1));
    assert!(position.z < 54.0 && position.z > 45.0);

    // Keeps flying until it is on screen.
    for _ in 0..30 {
        director.fixed_tick(DT, &mut commands);
    }
    assert!(commands.is_empty());
    let (_, position) = director.alien_bullets().next().expect("bullet survives");
    assert!(position.z < 45.0);

    let outbound = AlienEvent::Fired {
        origin: Vec3::planar(0.0, 50.0),
        direction: Vec3::planar(0.0, 1.0),
    };
    director.on_alien_event(outbound, &mut commands);
    commands.clear();
    director.fixed_tick(DT, &mut commands);
    assert_eq!(commands, vec![Command::DespawnBullet { id: BulletId(2) }]);
    assert_eq!(director.alien_bullets().count(), 1);
}

#[test]
fn session_clock_keeps_frame_precision_after_hours() {
    let mut director = ready(26);
    director.now = 10.0 * 3_600.0;
    let mut commands = Vec::new();
    director
        .tick(DT, &idle_player(), &mut commands)
        .expect("tick succeeds");
    let expected = 10.0 * 3_600.0 + f64::from(DT);
    assert!((director.now() - expected).abs() < 1e-9);
}

#[test]
fn losing_every_life_ends_the_game_once() {
    let mut director = ready(31);
    let unknown_rock = EntityRef::Asteroid(AsteroidId(9_999));

    for lives_left in [2, 1] {
        let mut commands = Vec::new();
        director.report_collision(EntityRef::Player, unknown_rock, &mut commands);
        assert_eq!(director.score().lives, lives_left);
        assert!(has_effect(&commands, EffectKind::PlayerExplosion));
        assert!(!director.player_collidable());

        // Invulnerable while respawning.
        director.report_collision(EntityRef::Player, unknown_rock, &mut commands);
        assert_eq!(director.score().lives, lives_left);

        // 1.5 s hidden plus the 4 s delay minus the 1.1 s lead-in.
        run_for(&mut director, 4.5, &idle_player());
        assert!(director.player_controllable());
    }

    let mut commands = Vec::new();
    director.report_collision(unknown_rock, EntityRef::Player, &mut commands);
    assert!(director.is_game_over());
    assert_eq!(director.score().lives, 0);
    assert!(has_message(&commands, MSG_GAME_OVER));
    assert_eq!(count(&commands, |c| *c == Command::GameOver), 1);
    assert_eq!(commands.last(), Some(&Command::GameOver));

    let after = run_for(&mut director, 2.0, &idle_player());
    assert!(after.is_empty());
    let mut after = Vec::new();
    director.report_collision(EntityRef::Player, unknown_rock, &mut after);
    director.kill(EntityRef::Alien, true, &mut after);
    director.fixed_tick(DT, &mut after);
    assert!(!director.consume_hyperspace_jump(&mut after));
    assert!(after.is_empty());
}

#[test]
fn hyperspace_needs_a_banked_jump_and_runs_its_sequence() {
    let mut director = ready(41);
    let mut commands = Vec::new();
    assert!(!director.consume_hyperspace_jump(&mut commands));

    director.score.award_asteroid_kill(0.02);
    assert!(director.score.hyperspace_available());
    assert!(director.consume_hyperspace_jump(&mut commands));
    assert!(commands
        .iter()
        .any(|c| matches!(c, Command::UpdateHud { hyperspace_available: false, .. })));
    assert!(!director.consume_hyperspace_jump(&mut commands));

    let departure = run_for(&mut director, 1.2, &idle_player());
    assert!(departure.contains(&Command::SetPlayerPresence {
        visible: false,
        collidable: false,
    }));
    assert!(has_effect(&departure, EffectKind::Hyperspace));
    assert!(!director.player_controllable());

    let arrival = run_for(&mut director, 4.2, &idle_player());
    let teleport = arrival
        .iter()
        .find_map(|c| match c {
            Command::TeleportPlayer { position } => Some(*position),
            _ => None,
        })
        .expect("player teleported on arrival");
    let ex = teleport.x / (80.0 * 0.75);
    let ez = teleport.z / (45.0 * 0.75);
    assert!((ex * ex + ez * ez - 1.0).abs() < 1e-3);
    assert!(arrival.contains(&Command::SetPlayerPresence {
        visible: true,
        collidable: true,
    }));
    assert!(director.player_controllable());
}

#[test]
fn hyperspace_wake_destroys_without_splitting() {
    let mut director = ready(51);
    director.field = AsteroidField::new(&director.config);
    let near = director.field.launch(
        2.0,
        Vec3::planar(20.0, 0.0),
        Vec3::planar(1.0, 0.0),
        &director.params,
        &mut director.rng,
    );
    let far = director.field.launch(
        2.0,
        Vec3::planar(150.0, 0.0),
        Vec3::planar(1.0, 0.0),
        &director.params,
        &mut director.rng,
    );
    let mut commands = Vec::new();
    director.on_alien_event(
        AlienEvent::Fired {
            origin: Vec3::planar(0.0, 10.0),
            direction: Vec3::planar(1.0, 0.0),
        },
        &mut commands,
    );

    commands.clear();
    director.wake(Vec3::ZERO, &mut commands);

    assert!(director.field().get(near.id).is_none());
    assert!(director.field().get(far.id).is_some());
    assert_eq!(director.score().score, asteroid_points(2.0));
    assert!(commands.contains(&Command::DespawnAsteroid { id: near.id }));
    assert_eq!(
        count(&commands, |c| matches!(c, Command::SpawnAsteroidVisual { .. })),
        0
    );
    assert_eq!(director.alien_bullets().count(), 0);
}

#[test]
fn alien_holds_fire_while_player_is_suppressed() {
    let (mut director, _) = director(61);
    let suppressed = PlayerState {
        input_suppressed: true,
        ..PlayerState::default()
    };
    let commands = run_for(&mut director, 45.0, &suppressed);
    assert!(commands
        .iter()
        .any(|c| matches!(c, Command::SpawnAlienVisual { .. })));
    assert_eq!(
        count(&commands, |c| matches!(c, Command::FireAlienBullet { .. })),
        0
    );
}

#[test]
fn alien_fire_is_gated_by_line_of_sight() {
    let mut director = ready(71);
    director.alien.reset_spawn_timer(director.now, 0.0);
    let spawned = run_for(&mut director, DT, &idle_player());
    assert!(spawned
        .iter()
        .any(|c| matches!(c, Command::SpawnAlienVisual { .. })));

    let alien_at = director.alien().state().position;
    let player = PlayerState {
        position: alien_at * 0.5,
        ..PlayerState::default()
    };

    director.field = AsteroidField::new(&director.config);
    director.field.launch(
        2.6,
        alien_at * 0.75,
        Vec3::planar(1.0, 0.0),
        &director.params,
        &mut director.rng,
    );
    let blocked = run_for(&mut director, 3.0, &player);
    assert_eq!(
        count(&blocked, |c| matches!(c, Command::FireAlienBullet { .. })),
        0
    );

    director.field = AsteroidField::new(&director.config);
    director.field.launch(
        1.0,
        Vec3::planar(0.0, 200.0),
        Vec3::planar(1.0, 0.0),
        &director.params,
        &mut director.rng,
    );
    let clear = run_for(&mut director, 3.0, &player);
    assert!(count(&clear, |c| matches!(c, Command::FireAlienBullet { .. })) >= 1);
}

#[test]
fn alien_killed_by_player_scores_by_level() {
    let mut director = ready(81);
    director.alien.reset_spawn_timer(director.now, 0.0);
    run_for(&mut director, DT, &idle_player());
    assert!(director.alien().is_active());

    let mut commands = Vec::new();
    director.report_collision(
        EntityRef::Alien,
        EntityRef::PlayerBullet(BulletId(3)),
        &mut commands,
    );
    assert!(!director.alien().is_active());
    assert_eq!(director.score().score, 500);
    assert!(commands.contains(&Command::HideAlien));
    assert!(has_effect(&commands, EffectKind::AlienExplosion));
    let next_spawn = director.alien().state().next_spawn_time;
    let interval = f64::from(director.params().alien_spawn_interval);
    assert!((next_spawn - (director.now() + interval)).abs() < 1e-3);
}

fn scripted_session(seed: u32) -> (Vec<Command>, DirectorSnapshot) {
    let (mut director, mut commands) = director(seed);
    let player = idle_player();
    for frame in 0..1_800u32 {
        director
            .tick(DT, &player, &mut commands)
            .expect("tick succeeds");
        director.fixed_tick(DT, &mut commands);
        if frame % 90 == 0 {
            if let Some(rock) = director.field().iter().next().map(|rock| rock.id) {
                director.report_collision(
                    EntityRef::Asteroid(rock),
                    EntityRef::PlayerBullet(BulletId(frame)),
                    &mut commands,
                );
            }
        }
    }
    (commands, director.snapshot())
}

#[test]
fn same_seed_replays_identically() {
    let (first_commands, first_snapshot) = scripted_session(0xD37E_0001);
    let (second_commands, second_snapshot) = scripted_session(0xD37E_0001);
    assert_eq!(first_commands, second_commands);
    assert_eq!(first_snapshot, second_snapshot);
    assert!(first_snapshot.score.score > 0);

    let (other_commands, _) = scripted_session(0xD37E_0002);
    assert_ne!(first_commands, other_commands);
}
