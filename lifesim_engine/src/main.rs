/// Lifesim Engine: Headless Demo
///
/// Plays a scripted opening for every player, runs a few weeks of work,
/// then prints standings and the canonical hash twice to show the run is
/// deterministic. Pass a config JSON path to override the default roster.

use std::process::ExitCode;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lifesim_engine::config::{GameConfig, PlayerConfig};
use lifesim_engine::hashing::canonical_hash;
use lifesim_engine::measure::MeasureKind;
use lifesim_engine::{EngineError, Game};

/// Action ids taken in order; missing ids are skipped.
const OPENING: &[&str] = &[
    "travel:clothes-store",
    "clothes-store:buy:casual-clothes",
    "clothes-store:exit",
    "travel:college",
    "college:study:community-course",
    "college:exit",
    "travel:restaurant",
    "restaurant:apply:restaurant-cook",
];

const WEEKS: u32 = 4;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_config() -> Result<GameConfig, EngineError> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path).map_err(|e| EngineError::Deserialize {
                path: path.clone(),
                message: e.to_string(),
            })?;
            GameConfig::from_json(&raw)
        }
        None => Ok(GameConfig::new(vec![
            PlayerConfig::human("ada", "Ada", "#E6194B"),
            PlayerConfig::human("brin", "Brin", "#3CB44B"),
        ])),
    }
}

/// Take `action_id` for the current player if it is on offer.
fn take(game: &mut Game, action_id: &str) -> bool {
    let Some(player_id) = game.current_player().map(|p| p.id.clone()) else {
        return false;
    };
    let Some(action) = game.find_action(&player_id, action_id) else {
        warn!(player = %player_id, action = action_id, "not on offer");
        return false;
    };
    let response = game.process_turn(&player_id, &action);
    info!(player = %player_id, action = action_id, success = response.success, "{}", response.message);
    response.success
}

fn play(game: &mut Game) -> Result<(), EngineError> {
    let roster: Vec<String> = game.players().iter().map(|p| p.id.clone()).collect();
    for player_id in &roster {
        for action_id in OPENING {
            take(game, action_id);
        }
        game.end_turn(player_id);
    }

    let last_week = game.current_week() + WEEKS;
    while game.current_week() < last_week && !game.is_game_over() {
        let Some(player_id) = game.current_player().map(|p| p.id.clone()) else {
            return Err(EngineError::EmptyRoster);
        };
        let week = game.current_week();
        while game.current_week() == week && take(game, "restaurant:work") {}
        game.end_turn(&player_id);
    }
    Ok(())
}

fn run() -> Result<(), EngineError> {
    let mut game = Game::new();
    game.initialize(load_config()?)?;
    let replay = game.clone();

    play(&mut game)?;

    println!("week {} / {} time units left", game.current_week(), game.time_units_remaining());
    for player in game.players() {
        let s = player.state();
        println!(
            "  {:<8} cash {:>6} ({})  health {:>5.1}  happiness {:>5.1}  education {:>5.1}  career {:>5.1}  job {}",
            player.name,
            s.cash(),
            MeasureKind::Wealth.status(s.cash() as f64),
            s.health().value(),
            s.happiness().value(),
            s.education().value(),
            s.career().value(),
            s.job().map_or("none", |j| j.title.as_str()),
        );
    }

    let mut again = replay;
    play(&mut again)?;
    let (h1, h2) = (canonical_hash(&game), canonical_hash(&again));
    println!("hash {}", h1);
    if h1 != h2 {
        return Err(EngineError::InvariantViolation(format!(
            "replay diverged: {} vs {}",
            h1, h2
        )));
    }
    println!("replay matches");
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
