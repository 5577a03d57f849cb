pub mod mock_datasets;

pub use mock_datasets::*;
