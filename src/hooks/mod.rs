pub mod archive;
pub mod form_hooks;
pub mod storage;
