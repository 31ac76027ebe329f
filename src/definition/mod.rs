pub mod form_model;
pub mod registry;
