pub mod types;
pub mod filter;
pub mod sort;
pub mod group;
pub mod paginate;
pub mod pipeline;
