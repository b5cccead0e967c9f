//! Game loop thread: runs the simulation engine at `TICK_RATE` and publishes
//! snapshots.
//!
//! The engine is created inside the thread and never leaves it. Commands
//! arrive over an `mpsc` channel; every tick replaces the shared latest
//! snapshot.

use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, info};

use rampart_core::constants::TICK_RATE;
use rampart_core::enums::EventCategory;
use rampart_core::events::GameEvent;
use rampart_core::state::GameStateSnapshot;
use rampart_sim::engine::{SimConfig, SimulationEngine};

use crate::state::GameLoopCommand;

/// Wall-clock length of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Shared slot holding the most recent snapshot.
pub type SnapshotSlot = Arc<Mutex<Option<GameStateSnapshot>>>;

/// Start the game loop on its own thread. Returns the command sender and
/// the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: SnapshotSlot,
) -> anyhow::Result<(Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (tx, rx) = mpsc::channel();

    let handle = std::thread::Builder::new()
        .name("rampart-game-loop".into())
        .spawn(move || run(SimulationEngine::new(config), &rx, &latest_snapshot))
        .context("Failed to spawn game loop thread")?;

    Ok((tx, handle))
}

/// Tick until told to stop or the sender side hangs up.
fn run(
    mut engine: SimulationEngine,
    rx: &Receiver<GameLoopCommand>,
    slot: &Mutex<Option<GameStateSnapshot>>,
) {
    engine.subscribe(EventCategory::GameOver, |event| {
        if let GameEvent::GameOver { won, score } = event {
            info!("Game over: {} with score {}", if *won { "won" } else { "lost" }, score);
        }
        Ok(())
    });

    let mut pacer = Pacer::new(Instant::now());
    while drain_commands(&mut engine, rx) {
        let snapshot = engine.tick();
        if let Ok(mut latest) = slot.lock() {
            *latest = Some(snapshot);
        }
        pacer.wait(engine.time_scale());
    }
    debug!("Game loop stopped at tick {}", engine.time().tick);
}

/// Forward every pending command to the engine. Returns false once the loop
/// should exit.
fn drain_commands(engine: &mut SimulationEngine, rx: &Receiver<GameLoopCommand>) -> bool {
    loop {
        match rx.try_recv() {
            Ok(GameLoopCommand::PlayerCommand(command)) => {
                debug!("Queued {:?}", command);
                engine.queue_command(command);
            }
            Ok(GameLoopCommand::Shutdown) | Err(TryRecvError::Disconnected) => return false,
            Err(TryRecvError::Empty) => return true,
        }
    }
}

/// Wall-clock time per tick at `time_scale`. A scale near zero runs at the
/// nominal rate.
pub fn tick_duration(time_scale: f64) -> Duration {
    if time_scale > 0.001 {
        TICK_DURATION.div_f64(time_scale)
    } else {
        TICK_DURATION
    }
}

/// Fixed-rate scheduler. Falls back to "now" instead of bursting when the
/// loop is more than two ticks behind.
struct Pacer {
    deadline: Instant,
}

impl Pacer {
    fn new(start: Instant) -> Self {
        Self { deadline: start }
    }

    fn wait(&mut self, time_scale: f64) {
        let step = tick_duration(time_scale);
        self.deadline += step;

        let now = Instant::now();
        match self.deadline.checked_duration_since(now) {
            Some(remaining) => std::thread::sleep(remaining),
            None if now.duration_since(self.deadline) > step * 2 => self.deadline = now,
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::commands::PlayerCommand;
    use rampart_core::enums::GamePhase;

    fn wait_for(
        slot: &SnapshotSlot,
        mut done: impl FnMut(&GameStateSnapshot) -> bool,
    ) -> GameStateSnapshot {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(snap) = slot.lock().unwrap().clone() {
                if done(&snap) {
                    return snap;
                }
            }
            assert!(Instant::now() < deadline, "condition not reached in time");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_drain_stops_on_shutdown() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        let (tx, rx) = mpsc::channel();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::SetLevel { level: 2 }))
            .unwrap();
        assert!(drain_commands(&mut engine, &rx));
        engine.tick();
        assert_eq!(engine.level(), 2);

        tx.send(GameLoopCommand::Shutdown).unwrap();
        assert!(!drain_commands(&mut engine, &rx));

        drop(tx);
        assert!(!drain_commands(&mut engine, &rx));
    }

    #[test]
    fn test_loop_applies_commands_and_publishes() {
        let slot: SnapshotSlot = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(SimConfig::default(), Arc::clone(&slot)).unwrap();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause)).unwrap();
        let paused = wait_for(&slot, |snap| snap.phase == GamePhase::Paused);
        std::thread::sleep(Duration::from_millis(50));
        let still = slot.lock().unwrap().clone().unwrap();
        assert_eq!(still.time.tick, paused.time.tick);

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Resume)).unwrap();
        wait_for(&slot, |snap| snap.time.tick > paused.time.tick);

        tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn test_loop_exits_on_disconnect() {
        let slot: SnapshotSlot = Arc::new(Mutex::new(None));
        let (tx, handle) = spawn_game_loop(SimConfig::default(), slot).unwrap();
        drop(tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_busy_snapshot_stays_compact() {
        let mut engine = SimulationEngine::new(SimConfig {
            starting_money: 1000,
            ..Default::default()
        });
        for (x, y) in [(150.0, 350.0), (300.0, 250.0), (450.0, 350.0)] {
            assert!(engine.place_tower(rampart_core::enums::TowerKind::Archer, x, y));
        }
        // Into the first wave so enemies and projectiles are live.
        for _ in 0..600 {
            engine.tick();
        }

        let snapshot = engine.snapshot();
        assert!(!snapshot.enemies.is_empty());
        let json = serde_json::to_vec(&snapshot).unwrap();
        assert!(json.len() < 100 * 1024);
    }

    #[test]
    fn test_tick_duration_scaling() {
        assert_eq!(TICK_DURATION.as_nanos(), 16_666_666);
        let doubled = tick_duration(2.0).as_nanos() as i128;
        assert!((doubled - (TICK_DURATION / 2).as_nanos() as i128).abs() <= 1);
        assert_eq!(tick_duration(0.0), TICK_DURATION);
    }
}
