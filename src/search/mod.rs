pub mod fuzzy;
pub mod results;
pub mod cache;
pub mod index;
