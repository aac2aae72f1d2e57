use serde::{Deserialize, Serialize};

/// One country's population for one statistical year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub country: String,
    pub year: i64,
    pub population: i64,
}
