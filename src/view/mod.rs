pub mod state;
pub mod controller;
pub mod shared;
