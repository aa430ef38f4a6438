pub mod base;
pub mod components;
pub mod factory;
pub mod inputs;
pub mod io;
pub mod traits;
pub mod validators;
