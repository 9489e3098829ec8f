/// Lifesim Engine: Job Catalog
///
/// Immutable job definitions and eligibility rules. Hiring and quitting
/// produce `ActionResponse`s; the catalog itself never touches a player.

use serde::{Deserialize, Serialize};

use crate::action::ActionResponse;
use crate::buildings::BuildingKind;
use crate::player::PlayerState;
use crate::state_change::StateChange;

/// Id of the rank-0 sentinel.
pub const UNEMPLOYED_JOB_ID: &str = "unemployed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub rank: u32,
    pub required_education: u32,
    pub required_experience: u32,
    pub required_clothes_level: u32,
    pub wage_per_hour: i64,
    pub experience_per_hour: u32,
    pub building: BuildingKind,
}

impl Job {
    /// A job with the conventional requirements for its rank:
    /// education `5 * rank`, experience `10 * rank`, clothes
    /// `(rank + 1) / 2` capped at 3.
    pub fn new(
        id: &str,
        title: &str,
        rank: u32,
        building: BuildingKind,
        wage_per_hour: i64,
        experience_per_hour: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            rank,
            required_education: 5 * rank,
            required_experience: 10 * rank,
            required_clothes_level: ((rank + 1) / 2).min(3),
            wage_per_hour,
            experience_per_hour,
            building,
        }
    }

    /// Entry-level variant: no prior experience needed.
    pub fn trainee(mut self) -> Self {
        self.required_experience = 0;
        self
    }

    pub fn is_unemployed(&self) -> bool {
        self.rank == 0
    }
}

/// One unmet hiring condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "requirement", rename_all = "snake_case")]
pub enum RequirementFailure {
    Education { required: u32, actual: f64 },
    Experience { required: u32, actual: u32 },
    Clothes { required: u32, actual: u32 },
}

impl std::fmt::Display for RequirementFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequirementFailure::Education { required, actual } => {
                write!(f, "education {} of {} required", actual, required)
            }
            RequirementFailure::Experience { required, actual } => {
                write!(f, "experience {} of {} required", actual, required)
            }
            RequirementFailure::Clothes { required, actual } => {
                write!(f, "clothes level {} of {} required", actual, required)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobEligibility {
    pub eligible: bool,
    pub failures: Vec<RequirementFailure>,
}

/// The set of jobs offered in town. Passed into `Game` explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct JobCatalog {
    jobs: Vec<Job>,
}

impl JobCatalog {
    pub fn new(mut jobs: Vec<Job>) -> Self {
        if !jobs.iter().any(Job::is_unemployed) {
            jobs.insert(0, unemployed_sentinel());
        }
        Self { jobs }
    }

    pub fn standard() -> Self {
        use BuildingKind::*;
        Self::new(vec![
            unemployed_sentinel(),
            Job::new("factory-janitor", "Janitor", 1, Factory, 6, 1).trainee(),
            Job::new("factory-worker", "Assembly Worker", 2, Factory, 8, 2),
            Job::new("factory-machinist", "Machinist", 3, Factory, 11, 3),
            Job::new("factory-manager", "Factory Manager", 5, Factory, 18, 5),
            Job::new("bank-teller", "Teller", 2, Bank, 9, 2),
            Job::new("bank-loan-officer", "Loan Officer", 4, Bank, 15, 4),
            Job::new("bank-manager", "Bank Manager", 6, Bank, 23, 6),
            Job::new("college-groundskeeper", "Groundskeeper", 1, College, 6, 1).trainee(),
            Job::new("college-lecturer", "Lecturer", 5, College, 19, 5),
            Job::new("college-professor", "Professor", 7, College, 27, 7),
            Job::new("supermarket-clerk", "Clerk", 1, Supermarket, 6, 1).trainee(),
            Job::new("supermarket-manager", "Store Manager", 3, Supermarket, 12, 3),
            Job::new("restaurant-cook", "Cook", 1, Restaurant, 7, 1).trainee(),
            Job::new("restaurant-manager", "Restaurant Manager", 3, Restaurant, 12, 3),
            Job::new("clothes-salesperson", "Salesperson", 2, ClothesStore, 8, 2),
            Job::new("appliance-salesperson", "Appliance Salesperson", 2, ApplianceStore, 9, 2),
            Job::new("appliance-technician", "Repair Technician", 4, ApplianceStore, 14, 4),
            Job::new("pawn-broker", "Pawn Broker", 3, PawnShop, 10, 3),
            Job::new("rent-agent", "Leasing Agent", 2, RentAgency, 9, 2),
            Job::new("agency-clerk", "Agency Clerk", 1, EmploymentAgency, 6, 1).trainee(),
            Job::new("agency-recruiter", "Recruiter", 4, EmploymentAgency, 15, 4),
        ])
    }

    pub fn all(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn unemployed(&self) -> &Job {
        // `new` guarantees a sentinel at some index
        self.jobs
            .iter()
            .find(|j| j.is_unemployed())
            .unwrap_or(&self.jobs[0])
    }

    /// Hireable jobs at one building kind, in catalog order.
    pub fn jobs_for_building(&self, building: BuildingKind) -> Vec<&Job> {
        self.jobs
            .iter()
            .filter(|j| !j.is_unemployed() && j.building == building)
            .collect()
    }

    /// Check every hiring condition and collect all that fail.
    pub fn validate_requirements(&self, player: &PlayerState, job: &Job) -> JobEligibility {
        let mut failures = Vec::new();

        let education = player.education().value();
        if education < f64::from(job.required_education) {
            failures.push(RequirementFailure::Education {
                required: job.required_education,
                actual: education,
            });
        }

        let clothes = player.max_clothes_level();
        if clothes < job.required_clothes_level {
            failures.push(RequirementFailure::Clothes {
                required: job.required_clothes_level,
                actual: clothes,
            });
        }

        // Experience at the job's rank, or one rank below it.
        let at_rank = player.experience_at(job.rank);
        let below = player.experience_at(job.rank.saturating_sub(1).max(1));
        if at_rank < job.required_experience && below < job.required_experience {
            failures.push(RequirementFailure::Experience {
                required: job.required_experience,
                actual: at_rank.max(below),
            });
        }

        JobEligibility {
            eligible: failures.is_empty(),
            failures,
        }
    }

    pub fn apply_for_job(&self, player: &PlayerState, job: &Job) -> ActionResponse {
        if job.is_unemployed() {
            return ActionResponse::rejected("That is not a job you can apply for");
        }
        if player.job().is_some_and(|current| current.id == job.id) {
            return ActionResponse::rejected(format!("You already work as {}", job.title));
        }

        let eligibility = self.validate_requirements(player, job);
        if !eligibility.eligible {
            let reasons: Vec<String> = eligibility.failures.iter().map(ToString::to_string).collect();
            return ActionResponse::rejected(format!(
                "Not qualified for {}: {}",
                job.title,
                reasons.join(", ")
            ));
        }

        ActionResponse::accepted(
            format!("Hired as {}", job.title),
            0,
            vec![StateChange::Job {
                job: Some(job.clone()),
                description: format!("Hired as {}", job.title),
            }],
        )
    }

    pub fn quit_job(&self, player: &PlayerState) -> ActionResponse {
        match player.job() {
            None => ActionResponse::rejected("You are not employed"),
            Some(job) => ActionResponse::accepted(
                format!("Quit job as {}", job.title),
                0,
                vec![StateChange::Job {
                    job: None,
                    description: format!("Quit job as {}", job.title),
                }],
            ),
        }
    }

    pub fn calculate_wage(&self, job: &Job, hours: i64) -> i64 {
        job.wage_per_hour * hours
    }

    pub fn calculate_experience_gain(&self, job: &Job, hours: u32) -> u32 {
        job.experience_per_hour * hours
    }

    pub fn qualified_jobs(&self, player: &PlayerState) -> Vec<&Job> {
        self.jobs
            .iter()
            .filter(|j| !j.is_unemployed())
            .filter(|j| self.validate_requirements(player, j).eligible)
            .collect()
    }

    /// Highest wage among the jobs the player qualifies for; earliest wins ties.
    pub fn best_qualified_job(&self, player: &PlayerState) -> Option<&Job> {
        self.qualified_jobs(player)
            .into_iter()
            .fold(None, |best: Option<&Job>, job| match best {
                Some(b) if b.wage_per_hour >= job.wage_per_hour => Some(b),
                _ => Some(job),
            })
    }
}

impl Default for JobCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn unemployed_sentinel() -> Job {
    Job {
        id: UNEMPLOYED_JOB_ID.to_string(),
        title: "Unemployed".to_string(),
        rank: 0,
        required_education: 0,
        required_experience: 0,
        required_clothes_level: 0,
        wage_per_hour: 0,
        experience_per_hour: 0,
        building: BuildingKind::EmploymentAgency,
    }
}
