//! Application state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{anyhow, bail, Context};
use tracing::info;

use rampart_core::commands::PlayerCommand;
use rampart_core::state::GameStateSnapshot;
use rampart_sim::engine::SimConfig;

use crate::game_loop::{self, SnapshotSlot};

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle on a running (or not yet started) simulation.
///
/// `mpsc::Sender` is not `Sync`, so it sits behind a `Mutex`; the latest
/// snapshot is an `Arc` shared with the game loop thread, which replaces it
/// after every tick.
pub struct AppState {
    /// `None` until `start` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    pub latest_snapshot: SnapshotSlot,
    pub running: Mutex<bool>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
            loop_handle: Mutex::new(None),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the game loop thread with `config`. Fails if already running.
    pub fn start(&self, config: SimConfig) -> anyhow::Result<()> {
        let mut running = self.running.lock().map_err(|e| anyhow!("{e}"))?;
        if *running {
            bail!("Simulation already running");
        }

        let (tx, handle) = game_loop::spawn_game_loop(config, Arc::clone(&self.latest_snapshot))?;
        *self.command_tx.lock().map_err(|e| anyhow!("{e}"))? = Some(tx);
        *self.loop_handle.lock().map_err(|e| anyhow!("{e}"))? = Some(handle);
        *running = true;
        info!("Simulation started");
        Ok(())
    }

    /// Forward a player command to the game loop.
    pub fn send_command(&self, command: PlayerCommand) -> anyhow::Result<()> {
        let tx = self.command_tx.lock().map_err(|e| anyhow!("{e}"))?;
        match tx.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::PlayerCommand(command))
                .context("Game loop is gone"),
            None => bail!("Simulation not started"),
        }
    }

    /// Copy of the most recent snapshot, if any tick has run yet.
    pub fn snapshot(&self) -> anyhow::Result<Option<GameStateSnapshot>> {
        let lock = self.latest_snapshot.lock().map_err(|e| anyhow!("{e}"))?;
        Ok(lock.clone())
    }

    /// Stop the game loop and wait for its thread. No-op if not running.
    pub fn shutdown(&self) -> anyhow::Result<()> {
        let mut running = self.running.lock().map_err(|e| anyhow!("{e}"))?;
        if !*running {
            return Ok(());
        }

        if let Some(tx) = self.command_tx.lock().map_err(|e| anyhow!("{e}"))?.take() {
            // A disconnected channel means the loop already exited.
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        if let Some(handle) = self.loop_handle.lock().map_err(|e| anyhow!("{e}"))?.take() {
            handle
                .join()
                .map_err(|_| anyhow!("Game loop thread panicked"))?;
        }
        *running = false;
        info!("Simulation stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use rampart_core::enums::{GamePhase, TowerKind};

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
        assert!(!*state.running.lock().unwrap());
    }

    #[test]
    fn test_send_before_start_fails() {
        let state = AppState::new();
        assert!(state.send_command(PlayerCommand::Pause).is_err());
        assert!(state.shutdown().is_ok());
    }

    #[test]
    fn test_start_send_and_shutdown() {
        let state = AppState::new();
        state.start(SimConfig::default()).unwrap();
        assert!(state.start(SimConfig::default()).is_err());

        state
            .send_command(PlayerCommand::PlaceTower {
                kind: TowerKind::Archer,
                x: 200.0,
                y: 350.0,
            })
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let snapshot = loop {
            if let Some(snap) = state.snapshot().unwrap() {
                if !snap.towers.is_empty() {
                    break snap;
                }
            }
            assert!(Instant::now() < deadline, "tower never appeared");
            std::thread::sleep(Duration::from_millis(10));
        };
        assert_eq!(snapshot.phase, GamePhase::Active);
        assert_eq!(snapshot.economy.money, 150);

        state.shutdown().unwrap();
        assert!(!*state.running.lock().unwrap());
        assert!(state.send_command(PlayerCommand::Pause).is_err());
    }
}
