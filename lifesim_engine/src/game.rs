/// Lifesim Engine: Game
///
/// Top-level orchestrator. Owns the clock, the roster and the town;
/// validates turns, applies the changes actions describe through
/// `transitions`, runs end-of-week rent and checks victory.
///
/// Turn checks run in a fixed order: player exists, it is their turn,
/// the game is still running, the action can execute, the clock can pay.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::action::{Action, ActionKind, ActionResponse};
use crate::config::{EngineConstants, GameConfig, VictoryConditions};
use crate::economy::EconomyModel;
use crate::error::EngineError;
use crate::hashing::sha256_hex;
use crate::invariants::try_validate_invariants;
use crate::jobs::JobCatalog;
use crate::map::GameMap;
use crate::player::{Player, PlayerColor, PlayerState};
use crate::snapshot::GameSnapshot;
use crate::state_change::StateChange;
use crate::transitions::{self, RentOutcome};

/// Per-player progress towards the five victory thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VictoryStatus {
    pub player_id: String,
    pub wealth: bool,
    pub health: bool,
    pub happiness: bool,
    pub career: bool,
    pub education: bool,
    pub is_victory: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub(crate) id: String,
    pub(crate) current_week: u32,
    pub(crate) time_units_remaining: u32,
    pub(crate) current_player_index: usize,
    pub(crate) players: Vec<Player>,
    pub(crate) map: GameMap,
    pub(crate) economy: EconomyModel,
    pub(crate) jobs: JobCatalog,
    pub(crate) victory_conditions: VictoryConditions,
    pub(crate) constants: EngineConstants,
    pub(crate) is_game_over: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// An empty, not-yet-started game on the standard town.
    pub fn new() -> Self {
        let constants = EngineConstants::default();
        Self {
            id: String::new(),
            current_week: 1,
            time_units_remaining: constants.time_units_per_week,
            current_player_index: 0,
            players: Vec::new(),
            map: GameMap::standard(),
            economy: EconomyModel::new(),
            jobs: JobCatalog::standard(),
            victory_conditions: VictoryConditions::default(),
            constants,
            is_game_over: false,
        }
    }

    /// Start a match from `config`, discarding any previous state.
    /// Nothing changes if the config is rejected.
    pub fn initialize(&mut self, config: GameConfig) -> Result<(), EngineError> {
        if config.players.is_empty() {
            return Err(EngineError::EmptyRoster);
        }
        if config.constants.time_units_per_week == 0 {
            return Err(EngineError::InvariantViolation(
                "a week needs at least one time unit".to_string(),
            ));
        }

        let mut players: Vec<Player> = Vec::with_capacity(config.players.len());
        for pc in &config.players {
            if players.iter().any(|p| p.id == pc.id) {
                return Err(EngineError::InvariantViolation(format!(
                    "duplicate player id {:?}",
                    pc.id
                )));
            }
            let stats = config.starting_stats;
            players.push(Player {
                id: pc.id.clone(),
                name: pc.name.clone(),
                color: PlayerColor::parse(&pc.color)?,
                is_ai: pc.is_ai,
                ai_type: pc.ai_type.clone(),
                state: PlayerState::new(
                    &pc.id,
                    config.starting_cash,
                    stats.health,
                    stats.happiness,
                    stats.education,
                ),
            });
        }

        *self = Self {
            id: game_id(&config)?,
            current_week: 1,
            time_units_remaining: config.constants.time_units_per_week,
            current_player_index: 0,
            players,
            map: GameMap::standard(),
            economy: EconomyModel::new(),
            jobs: JobCatalog::standard(),
            victory_conditions: config.victory_conditions,
            constants: config.constants,
            is_game_over: false,
        };
        info!(game = %self.id, players = self.players.len(), "game initialized");
        Ok(())
    }

    // ── accessors ───────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current_week(&self) -> u32 {
        self.current_week
    }

    pub fn time_units_remaining(&self) -> u32 {
        self.time_units_remaining
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn economy(&self) -> &EconomyModel {
        &self.economy
    }

    pub fn jobs(&self) -> &JobCatalog {
        &self.jobs
    }

    pub fn victory_conditions(&self) -> &VictoryConditions {
        &self.victory_conditions
    }

    pub fn constants(&self) -> &EngineConstants {
        &self.constants
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    // ── turns ───────────────────────────────────────────────────────

    /// Checks (a) to (c): the player exists, holds the turn, and the game
    /// is still running.
    fn turn_holder(&self, player_id: &str) -> Result<usize, ActionResponse> {
        let idx = self
            .player_index(player_id)
            .ok_or_else(|| ActionResponse::rejected(format!("Unknown player {:?}", player_id)))?;
        if idx != self.current_player_index {
            return Err(ActionResponse::rejected("It is not your turn"));
        }
        if self.is_game_over {
            return Err(ActionResponse::rejected("The game is over"));
        }
        Ok(idx)
    }

    /// Validate and run one action. A rejected turn changes nothing.
    pub fn process_turn(&mut self, player_id: &str, action: &Action) -> ActionResponse {
        let idx = match self.turn_holder(player_id) {
            Ok(idx) => idx,
            Err(rejection) => return rejection,
        };
        let state = &self.players[idx].state;
        if let Err(reason) = action.validate(state, self) {
            return ActionResponse::rejected(reason);
        }
        if action.time_cost > self.time_units_remaining {
            return ActionResponse::rejected(format!(
                "{} needs {} time units but only {} remain this week",
                action.display_name, action.time_cost, self.time_units_remaining
            ));
        }

        let response = action.execute(state, self);
        if !response.success {
            return response;
        }

        transitions::apply_state_changes(&mut self.players[idx].state, &response.state_changes);
        self.advance_time(response.time_spent);
        debug!(
            player = player_id,
            action = %action.id,
            time_spent = response.time_spent,
            remaining = self.time_units_remaining,
            "turn processed"
        );

        let winners = self.winners();
        if !winners.is_empty() {
            self.is_game_over = true;
            info!(game = %self.id, ?winners, week = self.current_week, "game over");
        }
        response
    }

    /// Hand the turn to the next player in roster order. When the turn
    /// wraps back to the first player the rest of the week is spent.
    pub fn end_turn(&mut self, player_id: &str) -> ActionResponse {
        let idx = match self.turn_holder(player_id) {
            Ok(idx) => idx,
            Err(rejection) => return rejection,
        };
        self.current_player_index = (idx + 1) % self.players.len();
        if self.current_player_index == 0 {
            self.advance_time(self.time_units_remaining);
        }
        let next = &self.players[self.current_player_index];
        debug!(from = player_id, to = %next.id, "turn passed");
        ActionResponse::accepted(format!("{}'s turn", next.name), 0, Vec::new())
    }

    // ── clock ───────────────────────────────────────────────────────

    /// Spend `units`; every time the week's budget runs out, settle the
    /// week and start the next with a full budget.
    pub fn advance_time(&mut self, units: u32) {
        let budget = i64::from(self.constants.time_units_per_week.max(1));
        let mut remaining = i64::from(self.time_units_remaining) - i64::from(units);
        while remaining <= 0 {
            self.process_end_of_week();
            self.current_week += 1;
            remaining += budget;
            info!(game = %self.id, week = self.current_week, "new week");
        }
        self.time_units_remaining = u32::try_from(remaining).unwrap_or(u32::MAX);
    }

    /// Charge rent to every player who has a home.
    pub fn process_end_of_week(&mut self) {
        for player in &mut self.players {
            let Some(home_id) = player.state.rented_home() else {
                continue;
            };
            let Some(home) = self.map.building(home_id) else {
                warn!(player = %player.id, home = home_id, "rented home is not on the map");
                continue;
            };
            let rent = self.economy.rent(home.kind);
            match transitions::charge_rent(&mut player.state, rent, &self.constants) {
                RentOutcome::Paid { amount } => {
                    info!(player = %player.id, amount, week = self.current_week, "rent paid")
                }
                RentOutcome::Missed { paid, shortfall } => info!(
                    player = %player.id,
                    paid,
                    shortfall,
                    debt = player.state.rent_debt(),
                    week = self.current_week,
                    "rent missed"
                ),
            }
        }
    }

    /// Apply changes to one player outside of a turn.
    pub fn apply_state_changes(
        &mut self,
        player_id: &str,
        changes: &[StateChange],
    ) -> Result<usize, EngineError> {
        let idx = self
            .player_index(player_id)
            .ok_or_else(|| EngineError::UnknownPlayer(player_id.to_string()))?;
        Ok(transitions::apply_state_changes(
            &mut self.players[idx].state,
            changes,
        ))
    }

    // ── victory ─────────────────────────────────────────────────────

    pub fn check_victory(&self) -> Vec<VictoryStatus> {
        let vc = &self.victory_conditions;
        self.players
            .iter()
            .map(|p| {
                let s = p.state();
                let wealth = s.cash() >= vc.target_wealth;
                let health = s.health().value() >= vc.target_health;
                let happiness = s.happiness().value() >= vc.target_happiness;
                let career = s.career().value() >= vc.target_career;
                let education = s.education().value() >= vc.target_education;
                VictoryStatus {
                    player_id: p.id.clone(),
                    wealth,
                    health,
                    happiness,
                    career,
                    education,
                    is_victory: wealth && health && happiness && career && education,
                }
            })
            .collect()
    }

    pub fn winners(&self) -> Vec<String> {
        self.check_victory()
            .into_iter()
            .filter(|v| v.is_victory)
            .map(|v| v.player_id)
            .collect()
    }

    // ── action discovery ────────────────────────────────────────────

    /// Trips from where the player stands to every other building.
    pub fn travel_actions(&self, player_id: &str) -> Vec<Action> {
        let Some(player) = self.player(player_id) else {
            return Vec::new();
        };
        let state = player.state();
        let from = state.position();
        self.map
            .all_buildings()
            .iter()
            .filter(|b| !state.is_inside(&b.id))
            .filter_map(|b| {
                let route = self.map.route(from, b.position).ok()?;
                let steps = u32::try_from(route.distance()).ok()?;
                Some(Action::new(
                    format!("travel:{}", b.id),
                    ActionKind::EnterBuilding {
                        from,
                        destination: b.position,
                        distance: route.distance(),
                    },
                    format!("Go to {}", b.name),
                    format!("{} blocks away", steps),
                    steps * self.constants.travel_cost_per_step,
                    Some(b.id.clone()),
                ))
            })
            .collect()
    }

    /// Inside a building: its menu, flattened. Outside: travel.
    pub fn available_actions(&self, player_id: &str) -> Vec<Action> {
        let Some(player) = self.player(player_id) else {
            return Vec::new();
        };
        match player
            .state()
            .current_building()
            .and_then(|id| self.map.building(id))
        {
            Some(building) => building.available_actions(player.state(), self),
            None => self.travel_actions(player_id),
        }
    }

    pub fn find_action(&self, player_id: &str, action_id: &str) -> Option<Action> {
        self.available_actions(player_id)
            .into_iter()
            .find(|a| a.id == action_id)
    }

    // ── persistence ─────────────────────────────────────────────────

    pub fn serialize(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(&GameSnapshot::capture(self))
            .map_err(|e| EngineError::Serialize(e.to_string()))
    }

    /// Restore from `serialize` output. Map, economy and job catalog are
    /// rebuilt fresh; the result must pass every invariant.
    pub fn deserialize(json: &str) -> Result<Game, EngineError> {
        let de = &mut serde_json::Deserializer::from_str(json);
        let snapshot: GameSnapshot =
            serde_path_to_error::deserialize(de).map_err(EngineError::from_path_error)?;
        let game = snapshot.restore()?;
        try_validate_invariants(&game)?;
        Ok(game)
    }
}

/// Same config, same id.
fn game_id(config: &GameConfig) -> Result<String, EngineError> {
    let bytes = serde_json::to_vec(config).map_err(|e| EngineError::Serialize(e.to_string()))?;
    let digest = sha256_hex(&bytes);
    Ok(format!("game-{}", &digest[..12]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::measure::MeasureKind;
    use crate::position::Position;

    fn two_player_game() -> Game {
        let mut game = Game::new();
        game.initialize(GameConfig::new(vec![
            PlayerConfig::human("p1", "Ada", "#FF0000"),
            PlayerConfig::human("p2", "Brin", "#00FF00"),
        ]))
        .unwrap();
        game
    }

    fn travel(game: &Game, player: &str, building: &str) -> Action {
        game.find_action(player, &format!("travel:{}", building))
            .unwrap()
    }

    #[test]
    fn initialize_resets_everything() {
        let game = two_player_game();
        assert!(game.id().starts_with("game-"));
        assert_eq!(game.current_week(), 1);
        assert_eq!(game.time_units_remaining(), 600);
        assert_eq!(game.current_player_index(), 0);
        assert!(!game.is_game_over());
        for p in game.players() {
            assert_eq!(p.state().position(), Position::origin());
            assert_eq!(p.state().cash(), 200);
            assert_eq!(p.state().health().value(), 100.0);
        }
    }

    #[test]
    fn initialize_rejects_bad_configs() {
        let mut game = two_player_game();
        let before = game.clone();
        assert_eq!(game.initialize(GameConfig::new(vec![])), Err(EngineError::EmptyRoster));
        assert!(matches!(
            game.initialize(GameConfig::new(vec![PlayerConfig::human("p1", "Ada", "red")])),
            Err(EngineError::InvalidColor(_))
        ));
        assert!(game
            .initialize(GameConfig::new(vec![
                PlayerConfig::human("p1", "Ada", "#FF0000"),
                PlayerConfig::human("p1", "Twin", "#00FF00"),
            ]))
            .is_err());
        assert_eq!(game, before);
    }

    #[test]
    fn same_config_same_id() {
        assert_eq!(two_player_game().id(), two_player_game().id());
    }

    #[test]
    fn rejected_turns_change_nothing() {
        let mut game = two_player_game();
        let to_bank = travel(&game, "p1", "bank");

        let cases: Vec<(&str, Game)> = vec![
            ("ghost", game.clone()),
            ("p2", game.clone()),
            ("p1", {
                let mut over = game.clone();
                over.is_game_over = true;
                over
            }),
            ("p1", {
                let mut late = game.clone();
                late.time_units_remaining = 5;
                late
            }),
        ];
        for (player, mut g) in cases {
            let before = g.clone();
            let response = g.process_turn(player, &to_bank);
            assert!(!response.success, "{} should be rejected", player);
            assert_eq!(response.time_spent, 0);
            assert!(response.state_changes.is_empty());
            assert_eq!(g, before);
        }

        // can_execute fails: not inside the bank
        let buy = Action::new(
            "bank:buy-stock:gold",
            ActionKind::BuyStock { stock_id: "gold".into(), price: 450 },
            "Buy Gold",
            "",
            10,
            Some("bank".into()),
        );
        let before = game.clone();
        assert!(!game.process_turn("p1", &buy).success);
        assert_eq!(game, before);
    }

    #[test]
    fn travel_costs_time_and_enters() {
        let mut game = two_player_game();
        let to_bank = travel(&game, "p1", "bank");
        // (0,0) -> (2,4)
        assert_eq!(to_bank.time_cost, 60);
        let response = game.process_turn("p1", &to_bank);
        assert!(response.success, "{}", response.message);
        let state = game.player("p1").unwrap().state();
        assert!(state.is_inside("bank"));
        assert_eq!(state.position(), Position::new(2, 4).unwrap());
        assert_eq!(game.time_units_remaining(), 540);
    }

    #[test]
    fn exit_clears_current_building() {
        let mut game = two_player_game();
        game.process_turn("p1", &travel(&game, "p1", "bank"));
        let exit = game.find_action("p1", "bank:exit").unwrap();
        assert!(game.process_turn("p1", &exit).success);
        let state = game.player("p1").unwrap().state();
        assert_eq!(state.current_building(), None);
        assert_eq!(state.position(), Position::new(2, 4).unwrap());
    }

    #[test]
    fn end_turn_wraps() {
        let mut game = two_player_game();
        assert!(game.end_turn("p1").success);
        assert_eq!(game.current_player().unwrap().id, "p2");
        assert!(!game.end_turn("p1").success);
        assert_eq!(game.current_week(), 1);
        assert!(game.end_turn("p2").success);
        assert_eq!(game.current_player_index(), 0);
        assert_eq!(game.current_week(), 2);
        assert_eq!(game.time_units_remaining(), 600);
    }

    #[test]
    fn advance_time_spans_weeks() {
        let mut game = two_player_game();
        game.advance_time(1300);
        assert_eq!(game.current_week(), 3);
        assert_eq!(game.time_units_remaining(), 500);
    }

    #[test]
    fn spending_the_last_unit_rolls_the_week() {
        let mut game = two_player_game();
        game.advance_time(600);
        assert_eq!(game.current_week(), 2);
        assert_eq!(game.time_units_remaining(), 600);
    }

    #[test]
    fn week_end_charges_rent() {
        let mut game = two_player_game();
        game.players[0].state.set_rented_home(Some("low-cost-apartment".to_string()));
        game.players[0].state.set_cash(1000);
        game.players[1].state.set_rented_home(Some("security-apartment".to_string()));

        game.process_end_of_week();

        let rich = game.player("p1").unwrap().state();
        assert_eq!(rich.cash(), 695);
        assert_eq!(rich.rent_debt(), 0);

        let poor = game.player("p2").unwrap().state();
        assert_eq!(poor.cash(), 0);
        assert_eq!(poor.rent_debt(), 275);
        assert_eq!(poor.health().value(), 95.0);
        assert_eq!(poor.happiness().value(), 40.0);
    }

    #[test]
    fn victory_needs_all_five() {
        let mut game = two_player_game();
        {
            let s = &mut game.players[0].state;
            s.set_cash(10_000);
            s.measure_mut(MeasureKind::Happiness).reset(100.0);
            s.add_experience(5, 850);
            s.measure_mut(MeasureKind::Education).reset(99.0);
        }
        let status = &game.check_victory()[0];
        assert!(status.wealth && status.health && status.happiness && status.career);
        assert!(!status.education);
        assert!(!status.is_victory);

        game.players[0].state.measure_mut(MeasureKind::Education).reset(100.0);
        assert!(game.check_victory()[0].is_victory);
        assert_eq!(game.winners(), vec!["p1".to_string()]);
        assert!(!game.check_victory()[1].is_victory);
    }

    #[test]
    fn winning_turn_ends_the_game() {
        let mut game = two_player_game();
        {
            let s = &mut game.players[0].state;
            s.set_cash(20_000);
            s.measure_mut(MeasureKind::Happiness).reset(100.0);
            s.add_experience(5, 900);
            s.measure_mut(MeasureKind::Education).reset(100.0);
        }
        assert!(game.process_turn("p1", &travel(&game, "p1", "bank")).success);
        assert!(game.is_game_over());
        assert!(!game.end_turn("p1").success);
    }

    #[test]
    fn apply_state_changes_needs_a_known_player() {
        let mut game = two_player_game();
        let change = StateChange::Cash { value: 5, description: String::new() };
        assert_eq!(game.apply_state_changes("p2", &[change.clone()]), Ok(1));
        assert_eq!(game.player("p2").unwrap().state().cash(), 5);
        assert_eq!(
            game.apply_state_changes("nobody", &[change]),
            Err(EngineError::UnknownPlayer("nobody".to_string()))
        );
    }

    #[test]
    fn derived_measure_changes_keep_the_game_restorable() {
        let mut game = two_player_game();
        let changes = [
            StateChange::Measure { measure: MeasureKind::Career, value: 50.0, description: String::new() },
            StateChange::Measure { measure: MeasureKind::Wealth, value: 10.6, description: String::new() },
        ];
        assert_eq!(game.apply_state_changes("p1", &changes), Ok(0));
        assert_eq!(game.player("p1").unwrap().state().cash(), 200);
        let restored = Game::deserialize(&game.serialize().unwrap()).unwrap();
        assert_eq!(restored, game);
    }

    fn casual_clothes() -> crate::possession::Possession {
        crate::possession::Possession {
            id: "casual-clothes#1-600".to_string(),
            possession_type: crate::possession::PossessionType::Clothes,
            name: "Casual Clothes".to_string(),
            value: 60,
            purchase_price: 60,
            clothes_level: Some(1),
            symbol: None,
            effects: Default::default(),
        }
    }

    fn inside(game: &mut Game, building: &str) {
        let position = game.map().building(building).unwrap().position;
        game.players[0].state.set_position(position, Some(building.to_string()));
    }

    #[test]
    fn course_prerequisites_are_checked_up_front() {
        let mut game = two_player_game();
        game.players[0].state.set_cash(1000);
        inside(&mut game, "college");

        let masters = game.find_action("p1", "college:study:masters-degree").unwrap();
        let state = game.player("p1").unwrap().state();
        assert!(!masters.can_execute(state, &game));
        assert_eq!(
            masters.validate(state, &game),
            Err("Master's Degree requires education 50".to_string())
        );
        assert!(!game.process_turn("p1", &masters).success);

        let community = game.find_action("p1", "college:study:community-course").unwrap();
        let state = game.player("p1").unwrap().state();
        assert!(community.can_execute(state, &game));
        assert!(game.process_turn("p1", &community).success);
    }

    #[test]
    fn altered_actions_are_rejected() {
        let mut game = two_player_game();
        game.players[0].state.set_cash(1000);
        game.players[0].state.measure_mut(MeasureKind::Education).reset(10.0);
        game.players[0].state.add_possession(casual_clothes());
        inside(&mut game, "supermarket");
        let clerk = game.find_action("p1", "supermarket:apply:supermarket-clerk").unwrap();
        assert!(clerk.can_execute(game.player("p1").unwrap().state(), &game));

        let mut bread = game.find_action("p1", "supermarket:buy:bread").unwrap();
        bread.kind = ActionKind::Purchase { item_id: "bread".into(), price: -5000 };
        let mut quick = game.find_action("p1", "supermarket:buy:bread").unwrap();
        quick.time_cost = 0;
        let mut promoted = game.find_action("p1", "supermarket:apply:supermarket-clerk").unwrap();
        if let ActionKind::ApplyForJob { job } = &mut promoted.kind {
            job.wage_per_hour = 500;
        }
        let mut foreign = game.find_action("p1", "supermarket:buy:bread").unwrap();
        foreign.id = "supermarket:buy:computer".into();
        foreign.kind = ActionKind::Purchase { item_id: "computer".into(), price: 1 };

        let before = game.clone();
        for action in [&bread, &quick, &promoted, &foreign] {
            let state = game.player("p1").unwrap().state();
            assert!(!action.can_execute(state, &game), "{} passed validation", action.id);
            assert!(!game.process_turn("p1", action).success);
        }
        assert_eq!(game, before);
    }

    #[test]
    fn altered_travel_is_rejected() {
        let mut game = two_player_game();
        let mut detour = travel(&game, "p1", "bank");
        if let ActionKind::EnterBuilding { destination, .. } = &mut detour.kind {
            *destination = Position::new(3, 3).unwrap();
        }
        let mut free_ride = travel(&game, "p1", "bank");
        free_ride.time_cost = 0;

        let before = game.clone();
        assert!(!game.process_turn("p1", &detour).success);
        assert!(!game.process_turn("p1", &free_ride).success);
        assert_eq!(game, before);
        assert!(game.process_turn("p1", &travel(&game, "p1", "bank")).success);
    }

    #[test]
    fn outside_offers_travel_to_every_other_building() {
        let game = two_player_game();
        let actions = game.available_actions("p1");
        assert_eq!(actions.len(), game.map().all_buildings().len());
        assert!(actions.iter().all(|a| a.type_name() == "ENTER_BUILDING"));
        assert!(game.available_actions("nobody").is_empty());
    }

    #[test]
    fn serialize_round_trip() {
        let mut game = two_player_game();
        game.players[0].state.measure_mut(MeasureKind::Education).reset(10.0);
        game.players[0].state.add_possession(casual_clothes());
        assert!(game.process_turn("p1", &travel(&game, "p1", "restaurant")).success);
        let apply = game.find_action("p1", "restaurant:apply:restaurant-cook").unwrap();
        assert!(game.process_turn("p1", &apply).success);
        let work = game.find_action("p1", "restaurant:work").unwrap();
        assert!(game.process_turn("p1", &work).success);
        game.players[0].state.set_rented_home(Some("low-cost-apartment".to_string()));
        game.players[0].state.set_rent_debt(12);

        let json = game.serialize().unwrap();
        let restored = Game::deserialize(&json).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn deserialize_reports_path() {
        let mut value: serde_json::Value =
            serde_json::from_str(&two_player_game().serialize().unwrap()).unwrap();
        value["players"][1]["state"]["cash"] = serde_json::json!("plenty");
        match Game::deserialize(&value.to_string()) {
            Err(EngineError::Deserialize { path, .. }) => assert_eq!(path, "players[1].state.cash"),
            other => panic!("expected a deserialize error, got {:?}", other),
        }
        assert!(matches!(
            Game::deserialize("{not json"),
            Err(EngineError::Deserialize { .. })
        ));
    }

    #[test]
    fn deserialize_rejects_invariant_violations() {
        let mut value: serde_json::Value =
            serde_json::from_str(&two_player_game().serialize().unwrap()).unwrap();
        value["currentPlayerIndex"] = serde_json::json!(7);
        assert!(matches!(
            Game::deserialize(&value.to_string()),
            Err(EngineError::InvariantViolation(_))
        ));
    }
}
