pub mod migrate;
pub mod payload;
pub mod reconcile;
