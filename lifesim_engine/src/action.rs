/// Lifesim Engine: Actions
///
/// An action is data: what the player picked, where, and how long it takes.
/// `execute` re-checks its preconditions against the snapshot it is given
/// and returns the intended `StateChange`s. It never mutates anything.

use serde::{Deserialize, Serialize};

use crate::buildings::catalog::{self, ShopItem};
use crate::game::Game;
use crate::jobs::Job;
use crate::measure::MeasureKind;
use crate::player::PlayerState;
use crate::position::Position;
use crate::possession::{Possession, PossessionType};
use crate::state_change::StateChange;

/// Time units in one in-game hour.
pub const TIME_UNITS_PER_HOUR: u32 = 10;

pub const PURCHASE_TIME: u32 = 10;
pub const MEAL_TIME: u32 = 20;
pub const SELL_TIME: u32 = 10;
pub const STUDY_TIME: u32 = 60;
pub const WORK_SHIFT_HOURS: u32 = 8;
pub const APPLY_TIME: u32 = 20;
pub const QUIT_TIME: u32 = 10;
pub const STOCK_TRADE_TIME: u32 = 10;
pub const RENT_TIME: u32 = 20;
pub const PAY_DEBT_TIME: u32 = 10;
pub const RELAX_TIME: u32 = 60;

pub const WORK_HAPPINESS_COST: f64 = 2.0;
pub const RELAX_HEALTH_GAIN: f64 = 5.0;
pub const RELAX_HAPPINESS_GAIN: f64 = 10.0;

/// What an action does, with everything needed to execute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    /// Menu grouping only; no time, no effect.
    Submenu,
    EnterBuilding { from: Position, destination: Position, distance: i32 },
    ExitBuilding { position: Position },
    Purchase { item_id: String, price: i64 },
    Sell { possession_id: String, price: i64 },
    Study { course_id: String, price: i64 },
    Work { hours: u32 },
    ApplyForJob { job: Job },
    QuitJob,
    BuyStock { stock_id: String, price: i64 },
    SellStock { possession_id: String, price: i64 },
    RentHome { home_id: String, weekly_rent: i64 },
    PayRentDebt,
    Relax,
}

impl ActionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ActionKind::Submenu => "SUBMENU",
            ActionKind::EnterBuilding { .. } => "ENTER_BUILDING",
            ActionKind::ExitBuilding { .. } => "EXIT_BUILDING",
            ActionKind::Purchase { .. } => "PURCHASE",
            ActionKind::Sell { .. } => "SELL",
            ActionKind::Study { .. } => "STUDY",
            ActionKind::Work { .. } => "WORK",
            ActionKind::ApplyForJob { .. } => "APPLY_JOB",
            ActionKind::QuitJob => "QUIT_JOB",
            ActionKind::BuyStock { .. } => "BUY_STOCK",
            ActionKind::SellStock { .. } => "SELL_STOCK",
            ActionKind::RentHome { .. } => "RENT_HOME",
            ActionKind::PayRentDebt => "PAY_RENT_DEBT",
            ActionKind::Relax => "RELAX",
        }
    }
}

/// A precondition, as shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "requirement", rename_all = "snake_case")]
pub enum Requirement {
    InsideBuilding { building_id: String },
    Cash { amount: i64 },
    Possession { possession_id: String },
    EmployedAt { building_id: String },
    Employed,
    RentedHome { home_id: String },
    Education { level: u32 },
    Experience { points: u32 },
    ClothesLevel { level: u32 },
    Time { units: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub kind: ActionKind,
    pub display_name: String,
    pub description: String,
    pub time_cost: u32,
    /// Building the action is offered in; the target for travel.
    pub building_id: Option<String>,
}

/// The only channel from actions to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    pub time_spent: u32,
    pub state_changes: Vec<StateChange>,
}

impl ActionResponse {
    pub fn accepted(message: impl Into<String>, time_spent: u32, state_changes: Vec<StateChange>) -> Self {
        Self {
            success: true,
            message: message.into(),
            time_spent,
            state_changes,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            time_spent: 0,
            state_changes: Vec::new(),
        }
    }
}

/// One node of a building menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTreeNode {
    pub action: Action,
    pub children: Vec<ActionTreeNode>,
    pub index: usize,
}

impl ActionTreeNode {
    pub fn leaf(action: Action, index: usize) -> Self {
        Self {
            action,
            children: Vec::new(),
            index,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Terminal actions in menu order.
    pub fn leaves(&self) -> Vec<&Action> {
        if self.is_leaf() {
            return vec![&self.action];
        }
        self.children.iter().flat_map(ActionTreeNode::leaves).collect()
    }

    /// Follow child indices from this node.
    pub fn navigate(&self, path: &[usize]) -> Option<&ActionTreeNode> {
        path.iter()
            .try_fold(self, |node, idx| node.children.get(*idx))
    }
}

impl Action {
    pub fn new(
        id: impl Into<String>,
        kind: ActionKind,
        display_name: impl Into<String>,
        description: impl Into<String>,
        time_cost: u32,
        building_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            display_name: display_name.into(),
            description: description.into(),
            time_cost,
            building_id,
        }
    }

    pub fn submenu(id: impl Into<String>, display_name: impl Into<String>, building_id: &str) -> Self {
        let display_name = display_name.into();
        Self::new(
            id,
            ActionKind::Submenu,
            display_name.clone(),
            display_name,
            0,
            Some(building_id.to_string()),
        )
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_terminal(&self) -> bool {
        self.kind != ActionKind::Submenu
    }

    pub fn can_execute(&self, player: &PlayerState, game: &Game) -> bool {
        self.validate(player, game).is_ok()
    }

    /// Re-validate, then describe the outcome. Pure.
    pub fn execute(&self, player: &PlayerState, game: &Game) -> ActionResponse {
        if let Err(reason) = self.validate(player, game) {
            return ActionResponse::rejected(reason);
        }
        self.outcome(player, game)
    }

    pub fn requirements(&self) -> Vec<Requirement> {
        let mut reqs = Vec::new();
        if let (Some(building_id), false) = (
            &self.building_id,
            matches!(self.kind, ActionKind::EnterBuilding { .. }),
        ) {
            reqs.push(Requirement::InsideBuilding {
                building_id: building_id.clone(),
            });
        }
        match &self.kind {
            ActionKind::Purchase { price, .. }
            | ActionKind::Study { price, .. }
            | ActionKind::BuyStock { price, .. } => reqs.push(Requirement::Cash { amount: *price }),
            ActionKind::Sell { possession_id, .. } | ActionKind::SellStock { possession_id, .. } => {
                reqs.push(Requirement::Possession {
                    possession_id: possession_id.clone(),
                })
            }
            ActionKind::Work { .. } => {
                if let Some(building_id) = &self.building_id {
                    reqs.push(Requirement::EmployedAt {
                        building_id: building_id.clone(),
                    });
                }
            }
            ActionKind::QuitJob => reqs.push(Requirement::Employed),
            ActionKind::RentHome { weekly_rent, .. } => reqs.push(Requirement::Cash { amount: *weekly_rent }),
            ActionKind::Relax => {
                if let Some(building_id) = &self.building_id {
                    reqs.push(Requirement::RentedHome {
                        home_id: building_id.clone(),
                    });
                }
            }
            ActionKind::ApplyForJob { job } => {
                reqs.push(Requirement::Education { level: job.required_education });
                reqs.push(Requirement::Experience { points: job.required_experience });
                reqs.push(Requirement::ClothesLevel { level: job.required_clothes_level });
            }
            ActionKind::Submenu
            | ActionKind::EnterBuilding { .. }
            | ActionKind::ExitBuilding { .. }
            | ActionKind::PayRentDebt => {}
        }
        if self.time_cost > 0 {
            reqs.push(Requirement::Time { units: self.time_cost });
        }
        reqs
    }

    // ── validation ──────────────────────────────────────────────────

    /// Why the action cannot run right now, if anything.
    pub fn validate(&self, player: &PlayerState, game: &Game) -> Result<(), String> {
        if let ActionKind::EnterBuilding { from, .. } = &self.kind {
            let target = self.building_id.as_deref().unwrap_or_default();
            if game.map().building(target).is_none() {
                return Err(format!("No building {:?} on the map", target));
            }
            if player.is_inside(target) {
                return Err("You are already there".to_string());
            }
            if player.position() != *from {
                return Err("You have moved since this route was planned".to_string());
            }
            return self.still_offered(game.travel_actions(player.player_id()));
        }

        let building_id = self
            .building_id
            .as_deref()
            .ok_or_else(|| "Action is not attached to a building".to_string())?;
        if !player.is_inside(building_id) {
            return Err("You need to be inside to do that".to_string());
        }
        let building = game
            .map()
            .building(building_id)
            .ok_or_else(|| format!("No building {:?} on the map", building_id))?;

        let ready = match &self.kind {
            ActionKind::Submenu => Err("Menus cannot be executed".to_string()),
            ActionKind::EnterBuilding { .. } | ActionKind::ExitBuilding { .. } => Ok(()),
            ActionKind::Study { course_id, price } => match catalog::course(course_id) {
                None => Err(format!("Unknown course {:?}", course_id)),
                Some(course) if player.education().value() < course.min_education => Err(format!(
                    "{} requires education {}",
                    course.name, course.min_education
                )),
                Some(_) => afford(player, *price),
            },
            ActionKind::Purchase { price, .. } | ActionKind::BuyStock { price, .. } => {
                afford(player, *price)
            }
            ActionKind::Sell { possession_id, .. } => {
                player
                    .possession(possession_id)
                    .map(|_| ())
                    .ok_or_else(|| "You no longer own that".to_string())
            }
            ActionKind::SellStock { possession_id, .. } => match player.possession(possession_id) {
                Some(p) if p.possession_type == PossessionType::Stock => Ok(()),
                _ => Err("You no longer hold that stock".to_string()),
            },
            ActionKind::Work { .. } => match player.job() {
                Some(job) if job.building == building.kind => Ok(()),
                Some(_) => Err("You do not work here".to_string()),
                None => Err("You need a job first".to_string()),
            },
            ActionKind::ApplyForJob { job } => {
                let response = game.jobs().apply_for_job(player, job);
                if response.success {
                    Ok(())
                } else {
                    Err(response.message)
                }
            }
            ActionKind::QuitJob => match player.job() {
                Some(_) => Ok(()),
                None => Err("You are not employed".to_string()),
            },
            ActionKind::RentHome { home_id, weekly_rent } => {
                if player.rented_home() == Some(home_id.as_str()) {
                    return Err("You already rent this home".to_string());
                }
                afford(player, *weekly_rent)
            }
            ActionKind::PayRentDebt => {
                if player.rent_debt() <= 0 {
                    Err("You do not owe any rent".to_string())
                } else if player.cash() <= 0 {
                    Err("You have no cash to pay with".to_string())
                } else {
                    Ok(())
                }
            }
            ActionKind::Relax => {
                if player.rented_home() == Some(building_id) {
                    Ok(())
                } else {
                    Err("You can only relax in your own home".to_string())
                }
            }
        };
        ready?;
        self.still_offered(building.available_actions(player, game))
    }

    /// Prices, wages, destinations and time costs are taken from the game,
    /// never from the action: it must match a current offer exactly.
    fn still_offered(&self, offers: Vec<Action>) -> Result<(), String> {
        match offers.into_iter().find(|offer| offer.id == self.id) {
            Some(offer)
                if offer.kind == self.kind
                    && offer.time_cost == self.time_cost
                    && offer.building_id == self.building_id =>
            {
                Ok(())
            }
            Some(_) => Err(format!("{} has changed since it was offered", self.display_name)),
            None => Err(format!("{} is not on offer here", self.display_name)),
        }
    }

    // ── outcomes ────────────────────────────────────────────────────

    fn outcome(&self, player: &PlayerState, game: &Game) -> ActionResponse {
        let cash = player.cash();
        match &self.kind {
            ActionKind::Submenu => ActionResponse::rejected("Menus cannot be executed"),

            ActionKind::EnterBuilding { destination, .. } => {
                let name = self.building_name(game);
                ActionResponse::accepted(
                    format!("Arrived at {}", name),
                    self.time_cost,
                    vec![StateChange::Position {
                        position: *destination,
                        current_building: self.building_id.clone(),
                        description: format!("Entered {}", name),
                    }],
                )
            }

            ActionKind::ExitBuilding { position } => ActionResponse::accepted(
                format!("Left {}", self.building_name(game)),
                self.time_cost,
                vec![StateChange::Position {
                    position: *position,
                    current_building: None,
                    description: "Stepped outside".to_string(),
                }],
            ),

            ActionKind::Purchase { item_id, price } => match catalog::shop_item(item_id) {
                Some(item) => self.purchase(player, game, item, *price),
                None => ActionResponse::rejected(format!("{:?} is not for sale", item_id)),
            },

            ActionKind::Sell { possession_id, price } => {
                let name = player
                    .possession(possession_id)
                    .map_or_else(|| possession_id.clone(), |p| p.name.clone());
                ActionResponse::accepted(
                    format!("Sold {} for ${}", name, price),
                    self.time_cost,
                    vec![
                        StateChange::PossessionRemove {
                            possession_id: possession_id.clone(),
                            description: format!("Pawned {}", name),
                        },
                        StateChange::Cash {
                            value: cash + price,
                            description: format!("+${} from the pawn shop", price),
                        },
                    ],
                )
            }

            ActionKind::Study { course_id, price } => {
                let Some(course) = catalog::course(course_id) else {
                    return ActionResponse::rejected(format!("Unknown course {:?}", course_id));
                };
                let target = player.education().value() + course.education_gain;
                ActionResponse::accepted(
                    format!("Completed {}", course.name),
                    self.time_cost,
                    vec![
                        StateChange::Cash {
                            value: cash - price,
                            description: format!("Tuition for {}", course.name),
                        },
                        StateChange::Measure {
                            measure: MeasureKind::Education,
                            value: target,
                            description: format!("+{} education", course.education_gain),
                        },
                    ],
                )
            }

            ActionKind::Work { hours } => {
                let Some(job) = player.job() else {
                    return ActionResponse::rejected("You need a job first");
                };
                let wage = game.economy().wage(job, i64::from(*hours));
                let points = game.jobs().calculate_experience_gain(job, *hours);
                ActionResponse::accepted(
                    format!("Worked {} hours as {} for ${}", hours, job.title, wage),
                    self.time_cost,
                    vec![
                        StateChange::Cash {
                            value: cash + wage,
                            description: format!("Wages from {}", job.title),
                        },
                        StateChange::Experience {
                            rank: job.rank,
                            points,
                            description: format!("+{} experience at rank {}", points, job.rank),
                        },
                        StateChange::Measure {
                            measure: MeasureKind::Happiness,
                            value: player.happiness().value() - WORK_HAPPINESS_COST,
                            description: "A long shift".to_string(),
                        },
                    ],
                )
            }

            ActionKind::ApplyForJob { job } => {
                let mut response = game.jobs().apply_for_job(player, job);
                response.time_spent = self.time_cost;
                response
            }

            ActionKind::QuitJob => {
                let mut response = game.jobs().quit_job(player);
                response.time_spent = self.time_cost;
                response
            }

            ActionKind::BuyStock { stock_id, price } => {
                let Some(listing) = game.economy().stock(stock_id) else {
                    return ActionResponse::rejected(format!("Unknown stock {:?}", stock_id));
                };
                let holding = Possession {
                    id: fresh_possession_id(listing.id, game),
                    possession_type: PossessionType::Stock,
                    name: listing.name.to_string(),
                    value: *price,
                    purchase_price: *price,
                    clothes_level: None,
                    symbol: Some(listing.symbol.to_string()),
                    effects: Default::default(),
                };
                ActionResponse::accepted(
                    format!("Bought one share of {} for ${}", listing.name, price),
                    self.time_cost,
                    vec![
                        StateChange::Cash {
                            value: cash - price,
                            description: format!("Bought {}", listing.symbol),
                        },
                        StateChange::PossessionAdd {
                            possession: holding,
                            description: format!("Share of {}", listing.name),
                        },
                    ],
                )
            }

            ActionKind::SellStock { possession_id, price } => ActionResponse::accepted(
                format!("Sold share for ${}", price),
                self.time_cost,
                vec![
                    StateChange::PossessionRemove {
                        possession_id: possession_id.clone(),
                        description: "Share sold".to_string(),
                    },
                    StateChange::Cash {
                        value: cash + price,
                        description: format!("+${} from stock sale", price),
                    },
                ],
            ),

            ActionKind::RentHome { home_id, weekly_rent } => {
                let name = game
                    .map()
                    .building(home_id)
                    .map_or_else(|| home_id.clone(), |b| b.name.clone());
                ActionResponse::accepted(
                    format!("Signed a lease at {} for ${}/week", name, weekly_rent),
                    self.time_cost,
                    vec![
                        StateChange::Cash {
                            value: cash - weekly_rent,
                            description: "First week's rent".to_string(),
                        },
                        StateChange::RentedHome {
                            home: Some(home_id.clone()),
                            description: format!("Now renting {}", name),
                        },
                    ],
                )
            }

            ActionKind::PayRentDebt => {
                let paid = player.rent_debt().min(cash);
                ActionResponse::accepted(
                    format!("Paid ${} of rent debt", paid),
                    self.time_cost,
                    vec![
                        StateChange::Cash {
                            value: cash - paid,
                            description: "Rent debt payment".to_string(),
                        },
                        StateChange::RentDebt {
                            value: player.rent_debt() - paid,
                            description: format!("-${} rent debt", paid),
                        },
                    ],
                )
            }

            ActionKind::Relax => ActionResponse::accepted(
                "You put your feet up",
                self.time_cost,
                vec![
                    StateChange::Measure {
                        measure: MeasureKind::Health,
                        value: player.health().value() + RELAX_HEALTH_GAIN,
                        description: "Rested".to_string(),
                    },
                    StateChange::Measure {
                        measure: MeasureKind::Happiness,
                        value: player.happiness().value() + RELAX_HAPPINESS_GAIN,
                        description: "Relaxed at home".to_string(),
                    },
                ],
            ),
        }
    }

    fn purchase(&self, player: &PlayerState, game: &Game, item: &ShopItem, price: i64) -> ActionResponse {
        let mut changes = vec![StateChange::Cash {
            value: player.cash() - price,
            description: format!("Bought {}", item.name),
        }];

        if item.consumed_on_purchase {
            if item.effects.health != 0.0 {
                changes.push(StateChange::Measure {
                    measure: MeasureKind::Health,
                    value: player.health().value() + item.effects.health,
                    description: format!("Ate {}", item.name),
                });
            }
            if item.effects.happiness != 0.0 {
                changes.push(StateChange::Measure {
                    measure: MeasureKind::Happiness,
                    value: player.happiness().value() + item.effects.happiness,
                    description: format!("Enjoyed {}", item.name),
                });
            }
        } else {
            changes.push(StateChange::PossessionAdd {
                possession: Possession {
                    id: fresh_possession_id(item.id, game),
                    possession_type: item.possession_type,
                    name: item.name.to_string(),
                    value: price,
                    purchase_price: price,
                    clothes_level: item.clothes_level,
                    symbol: None,
                    effects: item.effects,
                },
                description: format!("Bought {}", item.name),
            });
        }

        ActionResponse::accepted(
            format!("Bought {} for ${}", item.name, price),
            self.time_cost,
            changes,
        )
    }

    fn building_name(&self, game: &Game) -> String {
        self.building_id
            .as_deref()
            .and_then(|id| game.map().building(id))
            .map_or_else(|| "the street".to_string(), |b| b.name.clone())
    }
}

fn afford(player: &PlayerState, price: i64) -> Result<(), String> {
    if player.can_afford(price) {
        Ok(())
    } else {
        Err(format!("You need ${} but only have ${}", price, player.cash()))
    }
}

/// Unique within a player: the clock strictly decreases between
/// time-consuming actions in a week.
fn fresh_possession_id(item_id: &str, game: &Game) -> String {
    format!(
        "{}#{}-{}",
        item_id,
        game.current_week(),
        game.time_units_remaining()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submenu_tree() -> ActionTreeNode {
        let root = Action::submenu("bank", "Bank", "bank");
        let stocks = Action::submenu("bank:stocks", "Stocks", "bank");
        let buy = Action::new(
            "bank:buy-stock:gold",
            ActionKind::BuyStock { stock_id: "gold".into(), price: 450 },
            "Buy Gold",
            "One share",
            STOCK_TRADE_TIME,
            Some("bank".into()),
        );
        let exit = Action::new(
            "bank:exit",
            ActionKind::ExitBuilding { position: Position::origin() },
            "Exit",
            "Leave",
            0,
            Some("bank".into()),
        );
        ActionTreeNode {
            action: root,
            children: vec![
                ActionTreeNode {
                    action: stocks,
                    children: vec![ActionTreeNode::leaf(buy, 0)],
                    index: 0,
                },
                ActionTreeNode::leaf(exit, 1),
            ],
            index: 0,
        }
    }

    #[test]
    fn tree_navigation_and_leaves() {
        let tree = submenu_tree();
        let leaves: Vec<&str> = tree.leaves().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(leaves, vec!["bank:buy-stock:gold", "bank:exit"]);
        assert_eq!(tree.navigate(&[0, 0]).unwrap().action.type_name(), "BUY_STOCK");
        assert!(tree.navigate(&[3]).is_none());
        assert!(!tree.action.is_terminal());
    }

    #[test]
    fn requirements_list_cash_and_location() {
        let tree = submenu_tree();
        let buy = &tree.navigate(&[0, 0]).unwrap().action;
        let reqs = buy.requirements();
        assert!(reqs.contains(&Requirement::InsideBuilding { building_id: "bank".into() }));
        assert!(reqs.contains(&Requirement::Cash { amount: 450 }));
        assert!(reqs.contains(&Requirement::Time { units: STOCK_TRADE_TIME }));
    }

    #[test]
    fn rejected_response_carries_no_changes() {
        let response = ActionResponse::rejected("nope");
        assert!(!response.success);
        assert_eq!(response.time_spent, 0);
        assert!(response.state_changes.is_empty());
    }
}
