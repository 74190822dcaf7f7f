pub mod bar;
pub mod format;
pub mod request;
