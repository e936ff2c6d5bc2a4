use arcade_core::{Command, ConfigError, EffectKind, GameConfig, Vec3};

#[test]
fn partial_config_json_keeps_defaults() {
    let json = r#"{ "alien": { "spawn_time": 12.5 }, "score": { "starting_lives": 5 } }"#;
    let config: GameConfig = serde_json::from_str(json).expect("partial config parses");

    assert_eq!(config.alien.spawn_time, 12.5);
    assert_eq!(config.score.starting_lives, 5);
    assert_eq!(config.alien.range, GameConfig::default().alien.range);
    assert_eq!(config.speed, GameConfig::default().speed);
    config.validate().expect("still valid");
}

#[test]
fn validation_reports_the_offending_field() {
    let mut config = GameConfig::default();
    config.score.initial_spawn_count = 0;
    let err = config.validate().expect_err("zero spawn count rejected");
    assert_eq!(
        err,
        ConfigError::ZeroCount {
            field: "score.initial_spawn_count"
        }
    );
    assert!(err.to_string().contains("score.initial_spawn_count"));
}

#[test]
fn commands_serialize_with_a_tag() {
    let effect = Command::PlayEffect {
        kind: EffectKind::AlienExplosion,
        position: Vec3::planar(1.0, -2.0),
        scale: 1.5,
    };
    let value = serde_json::to_value(&effect).expect("serializes");
    assert_eq!(value["command"], "play_effect");
    assert_eq!(value["kind"], "alien_explosion");
    assert_eq!(value["position"]["z"], -2.0);
    assert_eq!(effect.name(), "play_effect");

    let value = serde_json::to_value(Command::GameOver).expect("serializes");
    assert_eq!(value["command"], "game_over");
}
