#[cfg(test)]
mod tests {
    use crate::commands::PlayerCommand;
    use crate::constants::*;
    use crate::enums::*;
    use crate::events::GameEvent;
    use crate::profiles::*;
    use crate::state::GameStateSnapshot;
    use crate::types::{EntityId, SimTime, Vector2D};

    const EPS: f64 = 1e-9;

    // ---- Geometry ----

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector2D::new(3.0, 4.0);
        let b = Vector2D::new(1.0, -2.0);

        assert_eq!(a + b, Vector2D::new(4.0, 2.0));
        assert_eq!(a - b, Vector2D::new(2.0, 6.0));
        assert_eq!(a.scale(2.0), Vector2D::new(6.0, 8.0));
        assert_eq!(a * 0.5, Vector2D::new(1.5, 2.0));
        assert!((a.magnitude() - 5.0).abs() < EPS);
    }

    #[test]
    fn test_distance_to_is_magnitude_of_difference() {
        let a = Vector2D::new(0.0, 300.0);
        let b = Vector2D::new(30.0, 260.0);
        assert!((a.distance_to(&b) - 50.0).abs() < EPS);
        assert!((b.distance_to(&a) - a.distance_to(&b)).abs() < EPS);
    }

    #[test]
    fn test_normalize_unit_and_zero() {
        let n = Vector2D::new(10.0, 0.0).normalize();
        assert_eq!(n, Vector2D::new(1.0, 0.0));

        let z = Vector2D::ZERO.normalize();
        assert_eq!(z, Vector2D::ZERO);
        assert!(z.x.is_finite() && z.y.is_finite());
    }

    #[test]
    fn test_operations_do_not_mutate_operands() {
        let a = Vector2D::new(2.0, 2.0);
        let _ = a.scale(10.0);
        let _ = a.normalize();
        assert_eq!(a, Vector2D::new(2.0, 2.0));
    }

    #[test]
    fn test_vector_set() {
        let mut cursor = Vector2D::ZERO;
        cursor.set(12.0, -7.5);
        assert_eq!(cursor, Vector2D::new(12.0, -7.5));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        time.advance(DT);
        time.advance(DT);
        assert_eq!(time.tick, 2);
        assert!((time.elapsed_secs - 2.0 * DT).abs() < EPS);
    }

    #[test]
    fn test_entity_id_ordering() {
        let mut ids = vec![EntityId(7), EntityId(2), EntityId(5)];
        ids.sort();
        assert_eq!(ids, vec![EntityId(2), EntityId(5), EntityId(7)]);
        assert_eq!(EntityId(3).to_string(), "#3");
    }

    // ---- Profiles ----

    #[test]
    fn test_enemy_profile_scales_with_wave() {
        let basic = enemy_profile(EnemyKind::Basic, 3);
        assert_eq!(basic.max_hp, 80);
        assert_eq!(basic.reward, 13);
        assert_eq!(basic.house_damage, ENEMY_DEFAULT_HOUSE_DAMAGE);
        assert_eq!(basic.tower_damage, ENEMY_DEFAULT_TOWER_DAMAGE);

        let boss = enemy_profile(EnemyKind::Boss, 10);
        assert_eq!(boss.max_hp, 700);
        assert_eq!(boss.reward, 200);
        assert_eq!(boss.house_damage, 5);
        assert!((boss.resistances.ice - 0.3).abs() < EPS);
    }

    #[test]
    fn test_elemental_resistances_mirror() {
        let fire = enemy_profile(EnemyKind::FireElemental, 1).resistances;
        let ice = enemy_profile(EnemyKind::IceElemental, 1).resistances;
        assert_eq!(fire.fire, 1.0);
        assert_eq!(fire.ice, -0.5);
        assert_eq!(ice.ice, 1.0);
        assert_eq!(ice.fire, -0.5);
    }

    #[test]
    fn test_only_flying_kind_flies_and_only_regenerating_heals() {
        for kind in EnemyKind::ALL {
            let profile = enemy_profile(kind, 1);
            assert_eq!(profile.flying, kind == EnemyKind::Flying, "{kind:?}");
            assert_eq!(profile.regenerates, kind == EnemyKind::Regenerating, "{kind:?}");
        }
    }

    #[test]
    fn test_tower_profile_costs() {
        let costs: Vec<u32> = TowerKind::ALL
            .iter()
            .map(|k| tower_profile(*k).base_cost)
            .collect();
        assert_eq!(costs, vec![50, 120, 85, 70, 90]);

        for kind in TowerKind::ALL {
            let profile = tower_profile(kind);
            assert_eq!(profile.max_level, TOWER_MAX_LEVEL);
            assert_eq!(profile.max_health, TOWER_MAX_HEALTH);
            assert!(profile.can_target_flying);
        }
    }

    #[test]
    fn test_upgrade_steps_cover_levels_two_to_four() {
        for kind in TowerKind::ALL {
            assert!(upgrade_step(kind, 0).is_none());
            assert!(upgrade_step(kind, 1).is_none());
            assert!(upgrade_step(kind, 2).is_some());
            assert!(upgrade_step(kind, 4).is_some());
            assert!(upgrade_step(kind, 5).is_none());
        }

        let step = upgrade_step(TowerKind::Archer, 3).unwrap();
        assert_eq!(step.damage, 12);
        assert!((step.fire_rate - 0.5).abs() < EPS);
        assert!((step.range - 20.0).abs() < EPS);
    }

    #[test]
    fn test_projectile_mapping() {
        assert_eq!(tower_projectile(TowerKind::Cannon), None);
        assert_eq!(tower_projectile(TowerKind::Ice), Some(ProjectileKind::IceShard));
        assert_eq!(
            projectile_damage_type(ProjectileKind::LightningBolt),
            DamageType::Magical
        );
        assert_eq!(projectile_profile(ProjectileKind::LightningBolt).max_range, 120.0);
        assert_eq!(
            projectile_profile(ProjectileKind::Arrow).max_range,
            PROJECTILE_DEFAULT_MAX_RANGE
        );
    }

    // ---- Serde ----

    #[test]
    fn test_targeting_mode_serde() {
        let variants = vec![
            TargetingMode::First,
            TargetingMode::Last,
            TargetingMode::Strongest,
            TargetingMode::Weakest,
            TargetingMode::Closest,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: TargetingMode = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_player_command_serde() {
        let cmd = PlayerCommand::PlaceTower {
            kind: TowerKind::Archer,
            x: 100.0,
            y: 250.0,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"PlaceTower\""));

        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        match back {
            PlayerCommand::PlaceTower { kind, x, y } => {
                assert_eq!(kind, TowerKind::Archer);
                assert_eq!(x, 100.0);
                assert_eq!(y, 250.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_game_event_category() {
        let event = GameEvent::WaveCompleted { wave: 3, bonus: 30 };
        assert_eq!(event.category(), EventCategory::WaveCompleted);

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"WaveCompleted\""));
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_every_category_listed_once() {
        let mut seen = std::collections::HashSet::new();
        for category in EventCategory::ALL {
            assert!(seen.insert(category));
        }
        assert_eq!(seen.len(), 13);
    }

    #[test]
    fn test_default_snapshot_serializes() {
        let snapshot = GameStateSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"phase\":\"Active\""));
        assert!(!GamePhase::Active.is_over());
        assert!(GamePhase::Won.is_over());
        assert!(GamePhase::Lost.is_over());
    }
}
