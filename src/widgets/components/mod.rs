pub mod choice_set;
pub mod file;
pub mod foreign_key;
pub mod picker;
