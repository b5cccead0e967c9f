//! Full sessions driven only through the public API.

use std::sync::{Arc, Mutex};

use rampart_sim::core::commands::PlayerCommand;
use rampart_sim::core::enums::{EnemyKind, EventCategory, GamePhase, TargetingMode, TowerKind};
use rampart_sim::core::events::GameEvent;
use rampart_sim::{SimConfig, SimulationEngine};

#[test]
fn scripted_defense_session() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 2024,
        starting_money: 600,
        ..Default::default()
    });
    let kills = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&kills);
    engine.subscribe(EventCategory::EnemyKilled, move |_| {
        *counter.lock().unwrap() += 1;
        Ok(())
    });

    engine.queue_commands([
        PlayerCommand::PlaceTower {
            kind: TowerKind::Archer,
            x: 150.0,
            y: 350.0,
        },
        PlayerCommand::PlaceTower {
            kind: TowerKind::Lightning,
            x: 300.0,
            y: 250.0,
        },
        PlayerCommand::PlaceTower {
            kind: TowerKind::Cannon,
            x: 500.0,
            y: 350.0,
        },
    ]);
    let snap = engine.tick();
    assert_eq!(snap.towers.len(), 3);
    assert_eq!(snap.economy.money, 600 - 50 - 85 - 120);

    let archer = snap.towers[0].id;
    engine.queue_commands([
        PlayerCommand::UpgradeTower { tower: archer },
        PlayerCommand::SetTargeting {
            tower: archer,
            mode: TargetingMode::Weakest,
        },
    ]);

    let mut last = engine.tick();
    while !last.phase.is_over() {
        last = engine.tick();
    }

    assert_eq!(last.phase, GamePhase::Won);
    assert!(last.economy.enemies_killed > 0);
    assert_eq!(*kills.lock().unwrap(), last.economy.enemies_killed);
    assert_eq!(
        last.economy.score,
        engine.score(),
        "snapshot and engine disagree on score"
    );
    let archer_view = engine.tower(archer).unwrap();
    assert_eq!(archer_view.level, 2);
    assert_eq!(archer_view.targeting, TargetingMode::Weakest);
}

#[test]
fn config_file_drives_engine() {
    let path = std::env::temp_dir().join(format!("rampart-config-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{ "seed": 99, "level": 3, "starting_money": 75, "game_duration_secs": 2.0 }"#,
    )
    .unwrap();

    let config = SimConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut engine = SimulationEngine::new(config);
    assert_eq!(engine.level(), 3);
    assert_eq!(engine.paths().len(), 3);
    assert_eq!(engine.money(), 75);

    let mut ticks = 0;
    while !engine.phase().is_over() {
        engine.tick();
        ticks += 1;
        assert!(ticks < 1000);
    }
    assert!(engine.is_won());
}

#[test]
fn snapshots_serialize_with_tagged_events_and_commands() {
    let mut engine = SimulationEngine::new(SimConfig {
        wave_delay_secs: 1000.0,
        ..Default::default()
    });
    let spawned = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&spawned);
    engine.subscribe(EventCategory::EnemySpawned, move |event| {
        sink.lock().unwrap().push(serde_json::to_value(event)?);
        Ok(())
    });

    let command: PlayerCommand =
        serde_json::from_str(r#"{ "type": "SpawnEnemy", "kind": "Flying", "wave": 4 }"#).unwrap();
    engine.queue_command(command);
    let snap = engine.tick();

    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].kind, EnemyKind::Flying);
    assert_eq!(snap.enemies[0].max_hp, 72);

    let events = spawned.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "EnemySpawned");
    assert!(matches!(
        serde_json::from_value::<GameEvent>(events[0].clone()).unwrap(),
        GameEvent::EnemySpawned {
            kind: EnemyKind::Flying,
            ..
        }
    ));

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["phase"], "Active");
    assert_eq!(json["economy"]["money"], 200);
}
