pub mod classify;
pub mod config;
pub mod content;
pub mod preview;
pub mod simulate;
pub mod submit;
