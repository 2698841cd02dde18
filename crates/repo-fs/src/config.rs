//! TOML configuration loading

use serde::de::DeserializeOwned;

use crate::{Error, NormalizedPath, Result, io};

/// Load and deserialize a TOML file. A missing file yields `T::default()`;
/// a file that exists but fails to parse is an error.
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: &NormalizedPath) -> Result<T> {
    match io::read_text_optional(path)? {
        Some(content) => toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_native(),
            message: e.to_string(),
        }),
        None => {
            tracing::debug!("No config at {}, using defaults", path);
            Ok(T::default())
        }
    }
}
