//! # elcc-io: file-backed data sources for ELCC studies
//!
//! Implementations of the `elcc-core` provider traits over the files an ELCC
//! study is usually run from.
//!
//! | Provider | Type | Input |
//! |----------|------|-------|
//! | Fleet | [`EiaFleetFiles`] | EIA-860 plant and generator CSV exports |
//! | Load | [`DemandCsv`] | hourly demand CSV (`date_time`, `cleaned demand (MW)`) |
//! | Capacity factors | [`CapacityFactorFiles`] | solar and wind JSON grids |
//! | Matrix store | [`CsvMatrixStore`] | `system-{i}-saved.csv` |
//!
//! ## Error Handling
//!
//! Loaders return `anyhow::Result` with the file and row in the context
//! chain. Shape and input failures keep their [`elcc_core::ElccError`] class
//! when they cross a provider trait, so a 8784-hour demand file is still a
//! shape error to the engine.
//!
//! ```rust,no_run
//! use elcc_core::LoadProvider;
//! use elcc_io::DemandCsv;
//!
//! let load = DemandCsv::new("demand/PACE.csv").hourly_load(2019)?;
//! println!("peak demand {:.1} MW", load.peak());
//! # Ok::<(), elcc_core::ElccError>(())
//! ```

pub mod matrix_store;
pub mod sources;

pub use matrix_store::{next_system_path, read_matrix, write_matrix, CsvMatrixStore};
pub use sources::{
    read_demand, read_grid, CapacityFactorFiles, DemandCsv, EiaFleetFiles, EiaFleetTables,
    EiaGeneratorRecord, EiaPlantRecord, GridFile,
};
