//! Property valuation and deal scoring: after-repair value from comparable sales,
//! renovation cost heuristics, wholesale deal economics, and investment criteria matching.
//!
//! Every engine is a pure function of its inputs. Configuration is injected through
//! [`config::EngineConfig`]; nothing reads ambient state once constructed.

pub mod config;
pub mod criteria;
pub mod error;
pub mod money;
pub mod property;
pub mod telemetry;
pub mod valuation;
pub mod wholesale;

pub use config::EngineConfig;
pub use criteria::{evaluate, CriteriaMatch, CriteriaMatcher, InvestmentCriteria};
pub use error::EngineError;
pub use property::{ComparableSale, Property, ValidationError};
pub use valuation::{ArvEstimator, ArvResult, HeuristicRepairModel, RepairEstimate};
pub use wholesale::{WholesaleDealAnalyzer, WholesaleDealResult};
