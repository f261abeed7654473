pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use policy::Strategy;
pub use reports::{RunAggregate, aggregate_runs};
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use simulation::{RunRecord, SimulationConfig, simulate};
