pub mod flight;
pub mod graph;
pub mod population;

pub use flight::{AirportInfo, FlightRecord};
pub use graph::{KeyValue, Label, NodeKey, Props, RelType};
pub use population::PopulationRecord;
