pub mod reports;
pub mod scenarios;
pub mod seeds;
pub mod simulation;
pub mod storage;
pub mod tester;

pub use scenarios::{all_scenario_names, get_scenario, list_scenarios};
pub use seeds::resolve_seed_inputs;
pub use tester::*;
