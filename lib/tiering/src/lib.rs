pub mod filter;
pub mod fragment;
pub mod model;
pub mod reconcile;
pub mod render;
pub mod state;
