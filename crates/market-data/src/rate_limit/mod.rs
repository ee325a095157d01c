//! Per-minute API budget for the upstream vendor.
//!
//! - [`ApiPlan`]: the vendor subscription tiers and their call ceilings
//! - [`RateGovernor`]: fixed-window counter that gates scheduled refreshes

mod governor;
mod plan;

pub use governor::{GovernorState, Permit, RateGovernor};
pub use plan::{ApiPlan, PlanLimits};
