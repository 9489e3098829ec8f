/// Lifesim Engine: Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 fingerprint of a game.
///
/// Rules:
///   - engine_version first, then clock, turn, game-over flag, rules, players
///   - players in roster order (turn order is part of the game)
///   - possessions sorted by id, experience sorted by rank
///   - measures stored as integer thousandths, never as floats
///   - compact UTF-8 JSON, no whitespace

use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use crate::game::Game;
use crate::player::Player;
use crate::ENGINE_VERSION;

/// Canonical serialization of a game to UTF-8 JSON bytes.
pub fn canonical_serialize(game: &Game) -> Vec<u8> {
    build_canonical_value(game).to_string().into_bytes()
}

/// SHA-256 of the canonical serialization. Lowercase hex.
pub fn canonical_hash(game: &Game) -> String {
    sha256_hex(&canonical_serialize(game))
}

/// Lowercase hex SHA-256 of arbitrary bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn milli(value: f64) -> i64 {
    (value * 1000.0).round() as i64
}

fn build_canonical_value(game: &Game) -> Value {
    let vc = game.victory_conditions();
    let mut victory = Map::new();
    victory.insert("target_wealth".into(), json!(vc.target_wealth));
    victory.insert("target_health".into(), json!(milli(vc.target_health)));
    victory.insert("target_happiness".into(), json!(milli(vc.target_happiness)));
    victory.insert("target_career".into(), json!(milli(vc.target_career)));
    victory.insert("target_education".into(), json!(milli(vc.target_education)));

    let c = game.constants();
    let mut constants = Map::new();
    constants.insert("time_units_per_week".into(), json!(c.time_units_per_week));
    constants.insert("travel_cost_per_step".into(), json!(c.travel_cost_per_step));
    constants.insert(
        "missed_rent_health_penalty".into(),
        json!(milli(c.missed_rent_health_penalty)),
    );
    constants.insert(
        "missed_rent_happiness_penalty".into(),
        json!(milli(c.missed_rent_happiness_penalty)),
    );

    // engine_version MUST stay first.
    let mut root = Map::new();
    root.insert("engine_version".into(), json!(ENGINE_VERSION));
    root.insert("id".into(), json!(game.id()));
    root.insert("current_week".into(), json!(game.current_week()));
    root.insert("time_units_remaining".into(), json!(game.time_units_remaining()));
    root.insert("current_player_index".into(), json!(game.current_player_index()));
    root.insert("is_game_over".into(), json!(game.is_game_over()));
    root.insert("victory_conditions".into(), Value::Object(victory));
    root.insert("constants".into(), Value::Object(constants));
    root.insert(
        "players".into(),
        Value::Array(game.players().iter().map(canonical_player).collect()),
    );
    Value::Object(root)
}

fn canonical_player(player: &Player) -> Value {
    let s = player.state();

    let mut possessions: Vec<_> = s.possessions().iter().collect();
    possessions.sort_by(|a, b| a.id.cmp(&b.id));
    let possessions: Vec<Value> = possessions
        .into_iter()
        .map(|p| {
            json!({
                "id": p.id,
                "type": p.possession_type,
                "name": p.name,
                "value": p.value,
                "purchase_price": p.purchase_price,
                "clothes_level": p.clothes_level,
                "symbol": p.symbol,
            })
        })
        .collect();

    let experience: Vec<Value> = s
        .experience()
        .iter()
        .map(|e| json!([e.rank, e.points]))
        .collect();

    let mut m = Map::new();
    m.insert("id".into(), json!(player.id));
    m.insert("name".into(), json!(player.name));
    m.insert("color".into(), json!(player.color.as_str()));
    m.insert("is_ai".into(), json!(player.is_ai));
    m.insert("ai_type".into(), json!(player.ai_type));
    m.insert("cash".into(), json!(s.cash()));
    m.insert("health".into(), json!(milli(s.health().value())));
    m.insert("happiness".into(), json!(milli(s.happiness().value())));
    m.insert("education".into(), json!(milli(s.education().value())));
    m.insert("career".into(), json!(milli(s.career().value())));
    m.insert("position".into(), json!([s.position().x(), s.position().y()]));
    m.insert("current_building".into(), json!(s.current_building()));
    m.insert("job".into(), json!(s.job().map(|j| j.id.as_str())));
    m.insert("experience".into(), Value::Array(experience));
    m.insert("possessions".into(), Value::Array(possessions));
    m.insert("rented_home".into(), json!(s.rented_home()));
    m.insert("rent_debt".into(), json!(s.rent_debt()));
    Value::Object(m)
}
