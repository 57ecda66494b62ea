pub mod hashtag;

pub use hashtag::{TagMode, parse_text_and_tags};
