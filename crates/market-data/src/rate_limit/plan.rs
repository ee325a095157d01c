use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Call ceilings attached to a vendor plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub per_minute: u32,
    pub monthly: u32,
}

/// Vendor subscription tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiPlan {
    #[default]
    Demo,
    Pro,
}

impl ApiPlan {
    pub fn limits(&self) -> PlanLimits {
        match self {
            Self::Demo => PlanLimits {
                per_minute: 20,
                monthly: 1_000,
            },
            Self::Pro => PlanLimits {
                per_minute: 60,
                monthly: 100_000,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "DEMO",
            Self::Pro => "PRO",
        }
    }
}

impl fmt::Display for ApiPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEMO" => Ok(Self::Demo),
            "PRO" => Ok(Self::Pro),
            other => Err(format!("unknown API plan '{}', expected DEMO or PRO", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_limits() {
        assert_eq!(ApiPlan::Demo.limits().per_minute, 20);
        assert_eq!(ApiPlan::Pro.limits().per_minute, 60);
        assert_eq!(ApiPlan::default(), ApiPlan::Demo);
    }

    #[test]
    fn test_parse_plan() {
        assert_eq!("pro".parse::<ApiPlan>().unwrap(), ApiPlan::Pro);
        assert_eq!(" DEMO ".parse::<ApiPlan>().unwrap(), ApiPlan::Demo);
        assert!("ENTERPRISE".parse::<ApiPlan>().is_err());
    }
}
