//! Run lifecycle facade
//!
//! The only mutating entry points are `enter_run`, `tick` and
//! `apply_upgrade_choice`; everything else is read-only.

use super::snapshot::Snapshot;
use super::state::GameState;
use super::tick::{TickInput, choose_upgrade, tick};
use crate::content::Content;
use crate::error::{Result, SimError};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct Simulation {
    content: Content,
    tuning: Tuning,
    run: Option<GameState>,
}

impl Simulation {
    /// Validate the tables and balance, ready to start runs
    pub fn new(content: Content, tuning: Tuning) -> Result<Self> {
        if let Err(err) = content.validate() {
            log::warn!("Content rejected: {err}");
            return Err(err);
        }
        if let Err(err) = tuning.validate() {
            log::warn!("Tuning rejected: {err}");
            return Err(err);
        }
        Ok(Self {
            content,
            tuning,
            run: None,
        })
    }

    /// Shipped content with default balance
    pub fn builtin() -> Self {
        Self {
            content: Content::builtin(),
            tuning: Tuning::default(),
            run: None,
        }
    }

    /// Start a fresh run, discarding any previous one
    pub fn enter_run(&mut self, character_id: &str, seed: u64) -> Result<()> {
        let state = GameState::new(&self.content, character_id, self.tuning.clone(), seed)?;
        log::info!("Run started: {character_id} (seed {seed})");
        self.run = Some(state);
        Ok(())
    }

    /// Drop the current run (return to menu)
    pub fn end_run(&mut self) {
        self.run = None;
    }

    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Result<()> {
        let state = self.run.as_mut().ok_or(SimError::NoActiveRun)?;
        tick(state, &self.content, input, dt)
    }

    /// Pick one of the currently offered upgrades by id
    pub fn apply_upgrade_choice(&mut self, upgrade_id: &str) -> Result<()> {
        let state = self.run.as_mut().ok_or(SimError::NoActiveRun)?;
        choose_upgrade(state, &self.content, upgrade_id)
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        let state = self.run.as_ref().ok_or(SimError::NoActiveRun)?;
        Snapshot::capture(state, &self.content)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.run.as_ref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|s| !s.is_over())
    }
}
