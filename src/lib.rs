//! Core of a client-side task manager: lists, folders, hashtags and a
//! dated "My Day" plan, kept in a local key-value snapshot and exchanged as
//! JSON backup files.

pub mod import;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
pub mod session;
pub mod store;
pub mod theme;
pub mod util;
pub mod view;
