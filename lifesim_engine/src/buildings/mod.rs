/// Lifesim Engine: Buildings
///
/// A closed set of kinds behind one capability surface.
///
/// A building offers jobs, a flat list of available actions and a menu
/// tree. Nothing is offered unless the player is inside that building.

use serde::{Deserialize, Serialize};

use crate::action::{
    Action, ActionKind, ActionTreeNode, APPLY_TIME, MEAL_TIME, PAY_DEBT_TIME, PURCHASE_TIME,
    QUIT_TIME, RELAX_TIME, RENT_TIME, SELL_TIME, STOCK_TRADE_TIME, STUDY_TIME,
    TIME_UNITS_PER_HOUR, WORK_SHIFT_HOURS,
};
use crate::game::Game;
use crate::jobs::{Job, JobCatalog};
use crate::player::PlayerState;
use crate::position::Position;
use crate::possession::PossessionType;

pub mod catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Factory,
    Bank,
    College,
    Supermarket,
    Restaurant,
    ClothesStore,
    ApplianceStore,
    PawnShop,
    RentAgency,
    EmploymentAgency,
    LowCostApartment,
    SecurityApartment,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 12] = [
        BuildingKind::Factory,
        BuildingKind::Bank,
        BuildingKind::College,
        BuildingKind::Supermarket,
        BuildingKind::Restaurant,
        BuildingKind::ClothesStore,
        BuildingKind::ApplianceStore,
        BuildingKind::PawnShop,
        BuildingKind::RentAgency,
        BuildingKind::EmploymentAgency,
        BuildingKind::LowCostApartment,
        BuildingKind::SecurityApartment,
    ];

    pub fn is_housing(self) -> bool {
        matches!(self, BuildingKind::LowCostApartment | BuildingKind::SecurityApartment)
    }

    pub fn label(self) -> &'static str {
        match self {
            BuildingKind::Factory => "Factory",
            BuildingKind::Bank => "Bank",
            BuildingKind::College => "College",
            BuildingKind::Supermarket => "Supermarket",
            BuildingKind::Restaurant => "Restaurant",
            BuildingKind::ClothesStore => "Clothes Store",
            BuildingKind::ApplianceStore => "Appliance Store",
            BuildingKind::PawnShop => "Pawn Shop",
            BuildingKind::RentAgency => "Rent Agency",
            BuildingKind::EmploymentAgency => "Employment Agency",
            BuildingKind::LowCostApartment => "Low-Cost Apartment",
            BuildingKind::SecurityApartment => "Security Apartment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub kind: BuildingKind,
    pub name: String,
    pub description: String,
    pub position: Position,
}

/// A titled group of actions; becomes a submenu when a building has several.
struct MenuGroup {
    title: String,
    actions: Vec<Action>,
}

impl Building {
    pub fn new(id: &str, kind: BuildingKind, name: &str, description: &str, position: Position) -> Self {
        Self {
            id: id.to_string(),
            kind,
            name: name.to_string(),
            description: description.to_string(),
            position,
        }
    }

    /// Jobs hired directly at this building.
    pub fn job_offerings<'a>(&self, jobs: &'a JobCatalog) -> Vec<&'a Job> {
        jobs.jobs_for_building(self.kind)
    }

    /// Every terminal action, in menu order. Empty unless the player is inside.
    pub fn available_actions(&self, player: &PlayerState, game: &Game) -> Vec<Action> {
        if !player.is_inside(&self.id) {
            return Vec::new();
        }
        let mut actions: Vec<Action> = self
            .menu_groups(player, game)
            .into_iter()
            .flat_map(|group| group.actions)
            .collect();
        actions.push(self.exit_action());
        actions
    }

    /// Menu rooted at the building. Buildings with a single group list
    /// their actions directly; the rest nest each group in a submenu.
    pub fn action_tree(&self, player: &PlayerState, game: &Game) -> Option<ActionTreeNode> {
        if !player.is_inside(&self.id) {
            return None;
        }
        let groups = self.menu_groups(player, game);

        let mut children: Vec<ActionTreeNode> = if groups.len() <= 1 {
            groups
                .into_iter()
                .flat_map(|group| group.actions)
                .enumerate()
                .map(|(idx, action)| ActionTreeNode::leaf(action, idx))
                .collect()
        } else {
            groups
                .into_iter()
                .enumerate()
                .map(|(idx, group)| ActionTreeNode {
                    action: Action::submenu(
                        format!("{}:menu:{}", self.id, slug(&group.title)),
                        group.title,
                        &self.id,
                    ),
                    children: group
                        .actions
                        .into_iter()
                        .enumerate()
                        .map(|(i, action)| ActionTreeNode::leaf(action, i))
                        .collect(),
                    index: idx,
                })
                .collect()
        };
        let exit_index = children.len();
        children.push(ActionTreeNode::leaf(self.exit_action(), exit_index));

        Some(ActionTreeNode {
            action: Action::submenu(format!("{}:menu", self.id), self.name.clone(), &self.id),
            children,
            index: 0,
        })
    }

    pub fn exit_action(&self) -> Action {
        Action::new(
            format!("{}:exit", self.id),
            ActionKind::ExitBuilding { position: self.position },
            "Exit",
            format!("Leave {}", self.name),
            0,
            Some(self.id.clone()),
        )
    }

    fn action(&self, suffix: String, kind: ActionKind, name: String, description: String, time_cost: u32) -> Action {
        Action::new(
            format!("{}:{}", self.id, suffix),
            kind,
            name,
            description,
            time_cost,
            Some(self.id.clone()),
        )
    }

    fn menu_groups(&self, player: &PlayerState, game: &Game) -> Vec<MenuGroup> {
        let mut groups = match self.kind {
            BuildingKind::Supermarket
            | BuildingKind::Restaurant
            | BuildingKind::ClothesStore
            | BuildingKind::ApplianceStore => self.shop_groups(game),
            BuildingKind::PawnShop => vec![self.pawn_group(player, game)],
            BuildingKind::Bank => vec![self.stock_group(player, game)],
            BuildingKind::College => vec![self.course_group(game)],
            BuildingKind::RentAgency => vec![self.housing_group(player, game)],
            BuildingKind::EmploymentAgency => self.agency_groups(player, game),
            BuildingKind::LowCostApartment | BuildingKind::SecurityApartment => {
                vec![self.home_group(player)]
            }
            BuildingKind::Factory => Vec::new(),
        };

        if self.kind != BuildingKind::EmploymentAgency {
            groups.push(self.jobs_group(player, game));
        }
        groups.retain(|group| !group.actions.is_empty());
        groups
    }

    fn shop_groups(&self, game: &Game) -> Vec<MenuGroup> {
        let mut groups: Vec<MenuGroup> = Vec::new();
        for item in catalog::items_sold_at(self.kind) {
            let price = game.economy().price(item.id, self.kind);
            let time = if item.consumed_on_purchase { MEAL_TIME } else { PURCHASE_TIME };
            let action = self.action(
                format!("buy:{}", item.id),
                ActionKind::Purchase {
                    item_id: item.id.to_string(),
                    price,
                },
                format!("Buy {}", item.name),
                format!("{} for ${}", item.name, price),
                time,
            );
            match groups.iter_mut().find(|g| g.title == item.category) {
                Some(group) => group.actions.push(action),
                None => groups.push(MenuGroup {
                    title: item.category.to_string(),
                    actions: vec![action],
                }),
            }
        }
        groups
    }

    fn pawn_group(&self, player: &PlayerState, game: &Game) -> MenuGroup {
        let actions = player
            .possessions()
            .iter()
            .filter(|p| p.possession_type != PossessionType::Stock)
            .map(|p| {
                let price = game.economy().sell_price(p);
                self.action(
                    format!("sell:{}", p.id),
                    ActionKind::Sell {
                        possession_id: p.id.clone(),
                        price,
                    },
                    format!("Sell {}", p.name),
                    format!("The broker offers ${}", price),
                    SELL_TIME,
                )
            })
            .collect();
        MenuGroup {
            title: "Sell".to_string(),
            actions,
        }
    }

    fn stock_group(&self, player: &PlayerState, game: &Game) -> MenuGroup {
        let economy = game.economy();
        let mut actions: Vec<Action> = economy
            .stock_catalog()
            .iter()
            .map(|listing| {
                self.action(
                    format!("buy-stock:{}", listing.id),
                    ActionKind::BuyStock {
                        stock_id: listing.id.to_string(),
                        price: listing.price,
                    },
                    format!("Buy {}", listing.name),
                    format!("One share of {} at ${}", listing.symbol, listing.price),
                    STOCK_TRADE_TIME,
                )
            })
            .collect();

        for holding in player.possessions_of(PossessionType::Stock) {
            let price = holding
                .symbol
                .as_deref()
                .and_then(|symbol| economy.stock_price(symbol))
                .unwrap_or(holding.value);
            actions.push(self.action(
                format!("sell-stock:{}", holding.id),
                ActionKind::SellStock {
                    possession_id: holding.id.clone(),
                    price,
                },
                format!("Sell {}", holding.name),
                format!("Sell one share at ${}", price),
                STOCK_TRADE_TIME,
            ));
        }
        MenuGroup {
            title: "Stocks".to_string(),
            actions,
        }
    }

    fn course_group(&self, game: &Game) -> MenuGroup {
        let actions = catalog::COURSES
            .iter()
            .map(|course| {
                let price = game.economy().course_price(course.id);
                self.action(
                    format!("study:{}", course.id),
                    ActionKind::Study {
                        course_id: course.id.to_string(),
                        price,
                    },
                    format!("Study {}", course.name),
                    format!("+{} education for ${}", course.education_gain, price),
                    STUDY_TIME,
                )
            })
            .collect();
        MenuGroup {
            title: "Courses".to_string(),
            actions,
        }
    }

    fn housing_group(&self, player: &PlayerState, game: &Game) -> MenuGroup {
        let mut actions: Vec<Action> = game
            .map()
            .all_buildings()
            .iter()
            .filter(|b| b.kind.is_housing())
            .map(|home| {
                let weekly_rent = game.economy().rent(home.kind);
                self.action(
                    format!("rent:{}", home.id),
                    ActionKind::RentHome {
                        home_id: home.id.clone(),
                        weekly_rent,
                    },
                    format!("Rent {}", home.name),
                    format!("${} per week, first week due now", weekly_rent),
                    RENT_TIME,
                )
            })
            .collect();

        if player.rent_debt() > 0 {
            actions.push(self.action(
                "pay-debt".to_string(),
                ActionKind::PayRentDebt,
                "Pay Rent Debt".to_string(),
                format!("You owe ${}", player.rent_debt()),
                PAY_DEBT_TIME,
            ));
        }
        MenuGroup {
            title: "Housing".to_string(),
            actions,
        }
    }

    fn home_group(&self, player: &PlayerState) -> MenuGroup {
        let mut actions = Vec::new();
        if player.rented_home() == Some(self.id.as_str()) {
            actions.push(self.action(
                "relax".to_string(),
                ActionKind::Relax,
                "Relax".to_string(),
                "Rest at home".to_string(),
                RELAX_TIME,
            ));
        }
        MenuGroup {
            title: "Home".to_string(),
            actions,
        }
    }

    fn jobs_group(&self, player: &PlayerState, game: &Game) -> MenuGroup {
        let mut actions: Vec<Action> = self
            .job_offerings(game.jobs())
            .into_iter()
            .map(|job| self.apply_action(job))
            .collect();

        if let Some(job) = player.job().filter(|job| job.building == self.kind) {
            actions.push(self.action(
                "work".to_string(),
                ActionKind::Work {
                    hours: WORK_SHIFT_HOURS,
                },
                format!("Work as {}", job.title),
                format!("{} hour shift at ${}/hour", WORK_SHIFT_HOURS, job.wage_per_hour),
                WORK_SHIFT_HOURS * TIME_UNITS_PER_HOUR,
            ));
            actions.push(self.quit_action());
        }
        MenuGroup {
            title: "Jobs".to_string(),
            actions,
        }
    }

    fn agency_groups(&self, player: &PlayerState, game: &Game) -> Vec<MenuGroup> {
        let mut groups: Vec<MenuGroup> = BuildingKind::ALL
            .iter()
            .map(|kind| MenuGroup {
                title: format!("{} Jobs", kind.label()),
                actions: game
                    .jobs()
                    .jobs_for_building(*kind)
                    .into_iter()
                    .map(|job| self.apply_action(job))
                    .collect(),
            })
            .collect();

        if player.job().is_some() {
            groups.push(MenuGroup {
                title: "Employment".to_string(),
                actions: vec![self.quit_action()],
            });
        }
        groups
    }

    fn apply_action(&self, job: &Job) -> Action {
        self.action(
            format!("apply:{}", job.id),
            ActionKind::ApplyForJob { job: job.clone() },
            format!("Apply: {}", job.title),
            format!("Rank {} at ${}/hour", job.rank, job.wage_per_hour),
            APPLY_TIME,
        )
    }

    fn quit_action(&self) -> Action {
        self.action(
            "quit".to_string(),
            ActionKind::QuitJob,
            "Quit Job".to_string(),
            "Leave your current job".to_string(),
            QUIT_TIME,
        )
    }
}

/// The standard town: one of every kind around the edge of the 5x5 grid.
pub fn standard_buildings() -> Vec<Building> {
    use BuildingKind::*;
    let at = Position::at;
    vec![
        Building::new("low-cost-apartment", LowCostApartment, "Low-Cost Housing", "Cheap rooms, thin walls.", at(0, 0)),
        Building::new("pawn-shop", PawnShop, "Pawn Shop", "Cash for your stuff, no questions asked.", at(1, 0)),
        Building::new("restaurant", Restaurant, "Monolith Burgers", "Hot food, fast.", at(2, 0)),
        Building::new("supermarket", Supermarket, "Black's Market", "Groceries for the week.", at(3, 0)),
        Building::new("clothes-store", ClothesStore, "QT Clothing", "Dress for the job you want.", at(4, 0)),
        Building::new("appliance-store", ApplianceStore, "Socket City", "Appliances and electronics.", at(4, 1)),
        Building::new("factory", Factory, "Factory", "Honest work, long shifts.", at(4, 3)),
        Building::new("college", College, "Hi-Tech U", "Courses and degrees.", at(4, 4)),
        Building::new("bank", Bank, "Bank", "Stocks and savings.", at(2, 4)),
        Building::new("employment-agency", EmploymentAgency, "Employment Office", "Every job in town.", at(0, 4)),
        Building::new("rent-agency", RentAgency, "Rent Office", "Leases and overdue rent.", at(0, 2)),
        Building::new("security-apartment", SecurityApartment, "Le Securité Apartments", "Doormen and quiet halls.", at(0, 1)),
    ]
}

fn slug(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}
