//! URL handling: canonical dedup keys and extraction from free text.

pub mod extract;
pub mod normalize;

pub use extract::extract_first_url;
pub use normalize::{normalize, normalize_key};
