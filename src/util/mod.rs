//! Utility modules

pub mod debounce;
pub mod text;

// Re-export at the util level for convenience
pub use debounce::Debounce;
pub use text::{char_len, char_to_byte, fold_case, last_token};
