use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::constants::DEFAULT_BACKEND_URL;
use crate::core::selection::{ImageType, OrganType};
use crate::utils::url::normalize_base_url;

/// Keys accepted by `medai set` and `medai unset`.
pub const CONFIG_KEYS: [&str; 3] = ["backend-url", "default-organ", "default-image-type"];

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    pub backend_url: Option<String>,
    pub default_organ: Option<OrganType>,
    pub default_image_type: Option<ImageType>,
}

/// Settings after CLI flags, environment and the config file are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub backend_url: String,
    pub organ: OrganType,
    pub image_type: ImageType,
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Config::default().resolve(None, None, None, None)
    }
}

impl Config {
    /// Precedence for the backend: flag, then environment, then file, then default.
    /// Blank values at any level fall through to the next one.
    pub fn resolve(
        &self,
        backend_flag: Option<&str>,
        backend_env: Option<&str>,
        organ_flag: Option<OrganType>,
        image_type_flag: Option<ImageType>,
    ) -> ResolvedSettings {
        let backend_url = [backend_flag, backend_env, self.backend_url.as_deref()]
            .into_iter()
            .flatten()
            .map(normalize_base_url)
            .find(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

        ResolvedSettings {
            backend_url,
            organ: organ_flag.or(self.default_organ).unwrap_or_default(),
            image_type: image_type_flag
                .or(self.default_image_type)
                .unwrap_or_default(),
        }
    }

    /// Apply `medai set <key> <value>`. Returns the normalized value stored.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<String, String> {
        match key {
            "backend-url" => {
                let url = normalize_base_url(value);
                if url.is_empty() {
                    return Err("backend-url cannot be empty".to_string());
                }
                self.backend_url = Some(url.clone());
                Ok(url)
            }
            "default-organ" => {
                let organ: OrganType = value.parse()?;
                self.default_organ = Some(organ);
                Ok(organ.to_string())
            }
            "default-image-type" => {
                let image_type: ImageType = value.parse()?;
                self.default_image_type = Some(image_type);
                Ok(image_type.to_string())
            }
            _ => Err(unknown_key(key)),
        }
    }

    /// Apply `medai unset <key>`.
    pub fn unset_key(&mut self, key: &str) -> Result<(), String> {
        match key {
            "backend-url" => self.backend_url = None,
            "default-organ" => self.default_organ = None,
            "default-image-type" => self.default_image_type = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key: {key}. Available keys: {}",
        CONFIG_KEYS.join(", ")
    )
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
