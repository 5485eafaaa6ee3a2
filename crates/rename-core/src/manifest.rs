use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::{RenameError, Result};

pub const PACKAGE_MANIFEST: &str = "package.json";
pub const SECONDARY_MANIFEST: &str = "manifest.json";

/// A JSON project descriptor, kept as an untyped document so that fields this
/// tool does not know about survive a rewrite in their original order.
pub struct ProjectManifest {
    path: PathBuf,
    document: Value,
}

impl ProjectManifest {
    /// Loads `package.json` from the project root.
    pub fn load(root: &Path) -> Result<Self> {
        Self::from_path(root.join(PACKAGE_MANIFEST))
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let raw = fs::read_to_string(&path).map_err(|source| RenameError::io(&path, source))?;
        let document: Value = serde_json::from_str(&raw).map_err(|e| RenameError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;
        if !document.is_object() {
            return Err(RenameError::Manifest {
                path,
                message: "expected a JSON object at the top level".to_string(),
            });
        }
        Ok(Self { path, document })
    }

    /// The identifier being renamed: `pythonPackageName` when set, otherwise
    /// `name`.
    pub fn package_name(&self) -> Result<&str> {
        ["pythonPackageName", "name"]
            .iter()
            .find_map(|field| {
                self.document
                    .get(field)
                    .and_then(Value::as_str)
                    .filter(|name| !name.is_empty())
            })
            .ok_or_else(|| RenameError::MissingName {
                path: self.path.clone(),
            })
    }

    pub fn set_description(&mut self, description: &str) {
        if let Some(object) = self.document.as_object_mut() {
            object.insert("description".to_string(), Value::String(description.to_string()));
        }
    }

    /// Writes the document back with 2-space indentation.
    pub fn save(&self) -> Result<()> {
        let rendered = serde_json::to_string_pretty(&self.document).map_err(|e| {
            RenameError::Manifest {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        fs::write(&self.path, rendered).map_err(|source| RenameError::io(&self.path, source))?;
        debug!("Wrote manifest: {:?}", self.path);
        Ok(())
    }
}

/// Sets `description` in `package.json` and, when present, `manifest.json`.
pub fn update_description(root: &Path, description: &str) -> Result<()> {
    let mut package = ProjectManifest::load(root)?;
    package.set_description(description);
    package.save()?;

    let secondary = root.join(SECONDARY_MANIFEST);
    if secondary.is_file() {
        let mut manifest = ProjectManifest::from_path(secondary)?;
        manifest.set_description(description);
        manifest.save()?;
    } else {
        debug!("No {} in {:?}", SECONDARY_MANIFEST, root);
    }

    info!("Updated project description");
    Ok(())
}
