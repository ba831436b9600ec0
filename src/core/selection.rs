//! Organ/modality selectors and the chosen image file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::constants::NO_FILE_SELECTED;

/// Anatomical region the backend should classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganType {
    #[default]
    Brain,
    Lungs,
}

impl OrganType {
    pub const ALL: [OrganType; 2] = [OrganType::Brain, OrganType::Lungs];

    /// Wire value sent as the `organType` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            OrganType::Brain => "brain",
            OrganType::Lungs => "lungs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrganType::Brain => "Brain",
            OrganType::Lungs => "Lungs",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            OrganType::Brain => OrganType::Lungs,
            OrganType::Lungs => OrganType::Brain,
        }
    }
}

impl fmt::Display for OrganType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "brain" => Ok(OrganType::Brain),
            "lungs" => Ok(OrganType::Lungs),
            other => Err(format!("invalid organ type: {other} (expected brain or lungs)")),
        }
    }
}

/// Imaging modality of the uploaded scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Mri,
    Ct,
}

impl ImageType {
    pub const ALL: [ImageType; 2] = [ImageType::Mri, ImageType::Ct];

    /// Wire value sent as the `imageType` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageType::Mri => "mri",
            ImageType::Ct => "ct",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ImageType::Mri => "MRI",
            ImageType::Ct => "CT",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ImageType::Mri => ImageType::Ct,
            ImageType::Ct => ImageType::Mri,
        }
    }

    /// Modality the backend synthesizes from a scan of this type.
    pub fn translated(self) -> Self {
        self.toggled()
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mri" => Ok(ImageType::Mri),
            "ct" => Ok(ImageType::Ct),
            other => Err(format!("invalid image type: {other} (expected mri or ct)")),
        }
    }
}

/// A file the user picked for upload. Content and size are not inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub path: PathBuf,
    pub file_name: String,
}

impl FileSelection {
    /// Returns `None` for an empty path.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return None;
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Some(Self {
            path: path.to_path_buf(),
            file_name,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSelection {
    pub organ: OrganType,
    pub image_type: ImageType,
    pub file: Option<FileSelection>,
}

impl UploadSelection {
    pub fn new(organ: OrganType, image_type: ImageType) -> Self {
        Self {
            organ,
            image_type,
            file: None,
        }
    }

    pub fn file_label(&self) -> &str {
        self.file
            .as_ref()
            .map(|file| file.file_name.as_str())
            .unwrap_or(NO_FILE_SELECTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organ_type_parses_case_insensitively() {
        assert_eq!("Brain".parse::<OrganType>(), Ok(OrganType::Brain));
        assert_eq!(" lungs ".parse::<OrganType>(), Ok(OrganType::Lungs));
        assert!("liver".parse::<OrganType>().is_err());
    }

    #[test]
    fn image_type_parses_and_translates() {
        assert_eq!("CT".parse::<ImageType>(), Ok(ImageType::Ct));
        assert_eq!(ImageType::Mri.translated(), ImageType::Ct);
        assert_eq!(ImageType::Ct.translated(), ImageType::Mri);
        assert!("xray".parse::<ImageType>().is_err());
    }

    #[test]
    fn selectors_serialize_to_wire_values() {
        assert_eq!(
            serde_json::to_string(&OrganType::Lungs).expect("serialize"),
            "\"lungs\""
        );
        assert_eq!(
            serde_json::to_string(&ImageType::Mri).expect("serialize"),
            "\"mri\""
        );
    }

    #[test]
    fn file_selection_uses_final_component_as_name() {
        let selection = FileSelection::from_path("/tmp/scans/scan.png").expect("selection");
        assert_eq!(selection.file_name, "scan.png");
        assert_eq!(selection.path, PathBuf::from("/tmp/scans/scan.png"));
        assert!(FileSelection::from_path("").is_none());
    }

    #[test]
    fn file_label_defaults_to_placeholder() {
        let mut selection = UploadSelection::default();
        assert_eq!(selection.file_label(), NO_FILE_SELECTED);
        selection.file = FileSelection::from_path("scan.png");
        assert_eq!(selection.file_label(), "scan.png");
    }
}
