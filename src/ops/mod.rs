pub mod list_ops;
pub mod reorder;
pub mod tag_ops;
pub mod task_ops;
