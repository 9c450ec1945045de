//! 输入守卫：按空白分词、截断到字数上限，并计算字数/字符计量。
//!
//! # Input Guard
//!
//! Keeps the text buffer within the configured word limit and derives the
//! meter readings shown next to it.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`words`] | Whitespace tokenization and word-limit trimming |
//! | [`meter`] | Word/char counters, progress percentage and limit notices |
//! | [`input`] | Text buffer with caret that enforces the limit on every edit |

pub mod input;
pub mod meter;
pub mod words;

pub use input::{InputBuffer, InputUpdate};
pub use meter::{LimitNotice, MeterDisplay, MeterReading};
pub use words::{tokenize, trim_to_limit, word_count};

/// Default maximum number of words accepted in the text buffer.
pub const DEFAULT_WORD_LIMIT: usize = 1000;
