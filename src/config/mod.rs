mod loader;
mod types;

pub use loader::{DEFAULT_CONFIG_FILE, expand_env, load};
pub use types::{Config, ProductConfig};
