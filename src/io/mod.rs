pub mod autosave;
pub mod config_io;
pub mod exchange;
pub mod kv;
pub mod recovery;
pub mod snapshot;
