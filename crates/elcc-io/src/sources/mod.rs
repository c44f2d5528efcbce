pub mod capacity_factors;
pub mod demand;
pub mod eia;

pub use capacity_factors::{read_grid, CapacityFactorFiles, GridFile};
pub use demand::{read_demand, DemandCsv};
pub use eia::{EiaFleetFiles, EiaFleetTables, EiaGeneratorRecord, EiaPlantRecord};
