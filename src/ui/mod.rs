pub mod dom;
pub mod fragment;
pub mod stylesheet;
