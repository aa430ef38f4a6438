pub mod checkbox;
pub mod input;
pub mod radio;
pub mod readonly;
pub mod select;
pub mod textarea;
pub mod url;
