//! Session manager: one game, one save file, one turn history.
//!
//! Each session gets its own directory:
//!   <base_dir>/<session_id>/save.json
//!
//! Apply-before-record order:
//!   1. resolve the action id and let the engine process the turn
//!   2. record the turn only if the engine accepted it
//!   3. autosave when the week rolls over or the game ends

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use lifesim_engine::action::ActionResponse;
use lifesim_engine::config::GameConfig;
use lifesim_engine::hashing::canonical_hash;
use lifesim_engine::Game;

use crate::drift::{compare_games, DriftReport};
use crate::error::RuntimeError;
use crate::replay::{self, TurnRecord};
use crate::save_file;

const SAVE_FILE_NAME: &str = "save.json";

pub struct Session {
    session_id: String,
    save_path: PathBuf,
    config: GameConfig,
    game: Game,
    history: Vec<TurnRecord>,
    /// The game as it stood when the current week began.
    week_start: Game,
    autosave: bool,
}

impl Session {
    /// Start a new game and write its first save. Refuses to overwrite an
    /// existing session.
    pub fn create(base_dir: &Path, session_id: &str, config: GameConfig) -> Result<Self, RuntimeError> {
        let save_path = base_dir.join(session_id).join(SAVE_FILE_NAME);
        if save_path.exists() {
            return Err(RuntimeError::SessionExists(session_id.to_string()));
        }

        let mut game = Game::new();
        game.initialize(config.clone())?;

        let session = Self {
            session_id: session_id.to_string(),
            save_path,
            config,
            week_start: game.clone(),
            game,
            history: Vec::new(),
            autosave: true,
        };
        session.save()?;
        info!(session = session_id, game = %session.game.id(), "session created");
        Ok(session)
    }

    /// Load a saved session. When the recorded history does not reproduce
    /// the saved game, the replayed game wins.
    pub fn open(base_dir: &Path, session_id: &str) -> Result<Self, RuntimeError> {
        let save_path = base_dir.join(session_id).join(SAVE_FILE_NAME);
        if !save_path.exists() {
            return Err(RuntimeError::SessionNotFound(session_id.to_string()));
        }

        let loaded = save_file::read_save(&save_path)?;
        let config = loaded
            .config
            .ok_or_else(|| RuntimeError::CorruptSave("session save has no config".to_string()))?;

        let (replayed, replayed_hash) = replay::rebuild_game(&config, &loaded.turns)?;
        let game = if replayed_hash == loaded.hash {
            loaded.game
        } else {
            warn!(
                session = session_id,
                saved = %loaded.hash,
                replayed = %replayed_hash,
                "saved game does not match its history; using replay"
            );
            replayed
        };

        info!(session = session_id, week = game.current_week(), turns = loaded.turns.len(), "session opened");
        Ok(Self {
            session_id: session_id.to_string(),
            save_path,
            config,
            week_start: game.clone(),
            game,
            history: loaded.turns,
            autosave: true,
        })
    }

    /// Resolve `action_id` among the player's current options and play it.
    pub fn take_turn(&mut self, player_id: &str, action_id: &str) -> Result<ActionResponse, RuntimeError> {
        self.run(TurnRecord::act(player_id, action_id))
    }

    pub fn end_turn(&mut self, player_id: &str) -> Result<ActionResponse, RuntimeError> {
        self.run(TurnRecord::end_turn(player_id))
    }

    fn run(&mut self, record: TurnRecord) -> Result<ActionResponse, RuntimeError> {
        let week = self.game.current_week();
        let response = replay::apply_record(&mut self.game, &record)?;
        if !response.success {
            return Ok(response);
        }
        self.history.push(record);

        let rolled_over = self.game.current_week() != week;
        if rolled_over {
            self.week_start = self.game.clone();
        }
        if self.autosave && (rolled_over || self.game.is_game_over()) {
            self.save()?;
        }
        Ok(response)
    }

    pub fn save(&self) -> Result<(), RuntimeError> {
        save_file::write_save(&self.save_path, &self.game, Some(&self.config), &self.history)
    }

    /// Rebuild from config and history; the result must match the live game.
    pub fn verify_replay(&self) -> Result<String, RuntimeError> {
        let hash = replay::verify_determinism(&self.config, &self.history)?;
        let live = self.current_hash();
        if hash != live {
            return Err(RuntimeError::NonDeterministic {
                first: live,
                second: hash,
            });
        }
        Ok(hash)
    }

    /// Changes since the current week began.
    pub fn weekly_drift(&self) -> DriftReport {
        compare_games(&self.week_start, &self.game)
    }

    pub fn set_autosave(&mut self, enabled: bool) {
        self.autosave = enabled;
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn current_hash(&self) -> String {
        canonical_hash(&self.game)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }
}
