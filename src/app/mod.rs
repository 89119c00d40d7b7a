// Application layer: use cases and the ports they depend on

pub mod batch_use_case;
pub mod harvest_use_case;
pub mod ports;
pub mod predict_use_case;

pub use batch_use_case::{BatchSummary, BatchUseCase};
pub use harvest_use_case::{HarvestReport, HarvestUseCase};
pub use predict_use_case::PredictUseCase;
