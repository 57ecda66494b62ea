pub mod config;
pub mod list;
pub mod tag_category;
pub mod task;
pub mod workspace;

pub use config::*;
pub use list::*;
pub use tag_category::*;
pub use task::*;
pub use workspace::*;
