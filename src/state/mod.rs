pub mod allocator;
pub mod report;
pub mod state_model;
pub mod tracker;
