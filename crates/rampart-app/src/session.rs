//! Scripted sessions: place a set of towers, then let the simulation run.

use std::str::FromStr;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use rampart_core::commands::PlayerCommand;
use rampart_core::constants::TICK_RATE;
use rampart_core::enums::TowerKind;
use rampart_core::state::GameStateSnapshot;
use rampart_sim::engine::{SimConfig, SimulationEngine};

use crate::state::AppState;

/// A tower to build at session start, written `KIND@X,Y` (e.g. `archer@200,350`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerOrder {
    pub kind: TowerKind,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TowerOrderError {
    #[error("expected KIND@X,Y, got {0:?}")]
    Format(String),
    #[error("unknown tower kind {0:?} (archer, cannon, lightning, ice, poison)")]
    UnknownKind(String),
    #[error("invalid coordinate {0:?}")]
    Coordinate(String),
}

impl TowerOrder {
    pub fn command(&self) -> PlayerCommand {
        PlayerCommand::PlaceTower {
            kind: self.kind,
            x: self.x,
            y: self.y,
        }
    }
}

impl FromStr for TowerOrder {
    type Err = TowerOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, position) = s
            .split_once('@')
            .ok_or_else(|| TowerOrderError::Format(s.to_string()))?;
        let (x, y) = position
            .split_once(',')
            .ok_or_else(|| TowerOrderError::Format(s.to_string()))?;

        let kind =
            parse_tower_kind(kind).ok_or_else(|| TowerOrderError::UnknownKind(kind.to_string()))?;
        let coordinate = |text: &str| {
            text.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| TowerOrderError::Coordinate(text.to_string()))
        };

        Ok(Self {
            kind,
            x: coordinate(x)?,
            y: coordinate(y)?,
        })
    }
}

/// Case-insensitive tower kind name.
pub fn parse_tower_kind(name: &str) -> Option<TowerKind> {
    match name.trim().to_ascii_lowercase().as_str() {
        "archer" => Some(TowerKind::Archer),
        "cannon" => Some(TowerKind::Cannon),
        "lightning" => Some(TowerKind::Lightning),
        "ice" => Some(TowerKind::Ice),
        "poison" => Some(TowerKind::Poison),
        _ => None,
    }
}

/// Run `seconds` of simulated time as fast as possible on the calling
/// thread. Stops early when the game is over.
pub fn run_headless(config: SimConfig, orders: &[TowerOrder], seconds: f64) -> GameStateSnapshot {
    let mut engine = SimulationEngine::new(config);
    let placed = place_orders(&mut engine, orders);

    let ticks = (seconds.max(0.0) * f64::from(TICK_RATE)).ceil() as u64;
    let mut snapshot = engine.snapshot();
    for _ in 0..ticks {
        snapshot = engine.tick();
        if snapshot.phase.is_over() {
            break;
        }
    }

    info!(
        "Session ended at {:.2}s: {:?}, wave {}, money {}, score {}, {} of {} towers built",
        snapshot.time.elapsed_secs,
        snapshot.phase,
        snapshot.wave.current_wave,
        snapshot.economy.money,
        snapshot.economy.score,
        placed,
        orders.len()
    );
    snapshot
}

/// Build every order before the first tick. Returns how many were placed;
/// each rejection is logged by the engine.
pub fn place_orders(engine: &mut SimulationEngine, orders: &[TowerOrder]) -> usize {
    let placed = orders
        .iter()
        .filter(|order| engine.place_tower(order.kind, order.x, order.y))
        .count();
    if placed < orders.len() {
        warn!("{} of {} towers could not be placed", orders.len() - placed, orders.len());
    }
    placed
}

/// Run the session on the game loop thread for `seconds` of wall-clock time
/// (scaled by the config's time scale) and return the last published
/// snapshot.
pub fn run_realtime(
    state: &AppState,
    config: SimConfig,
    orders: &[TowerOrder],
    seconds: f64,
) -> anyhow::Result<GameStateSnapshot> {
    let scale = if config.time_scale > 0.001 {
        config.time_scale
    } else {
        1.0
    };
    state.start(config)?;
    for order in orders {
        state.send_command(order.command())?;
    }

    let deadline = Instant::now() + Duration::from_secs_f64(seconds.max(0.0) / scale);
    while Instant::now() < deadline {
        let over = state
            .snapshot()?
            .is_some_and(|snap| snap.phase.is_over());
        if over {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    state.shutdown()?;
    Ok(state.snapshot()?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::enums::GamePhase;

    #[test]
    fn test_parse_tower_order() {
        let order: TowerOrder = "Archer@200,350".parse().unwrap();
        assert_eq!(
            order,
            TowerOrder {
                kind: TowerKind::Archer,
                x: 200.0,
                y: 350.0,
            }
        );

        let order: TowerOrder = "ice@ 400.5 , 340".parse().unwrap();
        assert_eq!(order.kind, TowerKind::Ice);
        assert_eq!(order.x, 400.5);
        assert_eq!(order.y, 340.0);
    }

    #[test]
    fn test_parse_tower_order_errors() {
        assert_eq!(
            "archer".parse::<TowerOrder>(),
            Err(TowerOrderError::Format("archer".into()))
        );
        assert_eq!(
            "archer@200".parse::<TowerOrder>(),
            Err(TowerOrderError::Format("archer@200".into()))
        );
        assert_eq!(
            "mortar@1,2".parse::<TowerOrder>(),
            Err(TowerOrderError::UnknownKind("mortar".into()))
        );
        assert_eq!(
            "cannon@x,2".parse::<TowerOrder>(),
            Err(TowerOrderError::Coordinate("x".into()))
        );
        assert!("cannon@inf,2".parse::<TowerOrder>().is_err());
    }

    #[test]
    fn test_headless_session_runs_to_completion() {
        let orders = [
            "archer@200,350".parse().unwrap(),
            "cannon@400,250".parse().unwrap(),
        ];
        let snapshot = run_headless(SimConfig::default(), &orders, 60.0);

        assert_eq!(snapshot.phase, GamePhase::Won);
        assert!(snapshot.time.elapsed_secs >= 30.0);
        assert!(snapshot.wave.current_wave >= 1);
    }

    #[test]
    fn test_place_orders_counts_placements_not_survivors() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        let orders = [
            "cannon@200,350".parse().unwrap(),
            "cannon@400,250".parse().unwrap(),
        ];
        // 200 money covers one cannon.
        assert_eq!(place_orders(&mut engine, &orders), 1);

        let tower = engine.towers()[0].id;
        assert!(engine.sell_tower(tower));
        engine.tick();
        assert!(engine.towers().is_empty());
        assert_eq!(place_orders(&mut engine, &orders[..1]), 1);
    }

    #[test]
    fn test_headless_session_is_deterministic() {
        let orders = ["lightning@300,250".parse().unwrap()];
        let config = SimConfig {
            seed: 7,
            ..Default::default()
        };
        let a = run_headless(config.clone(), &orders, 20.0);
        let b = run_headless(config, &orders, 20.0);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_realtime_session_publishes_snapshots() {
        let state = AppState::new();
        let config = SimConfig {
            time_scale: 4.0,
            ..Default::default()
        };
        let orders = ["poison@200,350".parse().unwrap()];

        let snapshot = run_realtime(&state, config, &orders, 2.0).unwrap();
        assert!(snapshot.time.tick > 0);
        assert_eq!(snapshot.towers.len(), 1);
        assert!(!*state.running.lock().unwrap());
    }
}
