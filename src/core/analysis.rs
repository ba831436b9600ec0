//! The live analysis shown after a successful upload.

use crate::api::UploadResponse;
use crate::core::selection::ImageType;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub prediction: String,
    pub original_image: String,
    pub sr_image: String,
    pub cg_image: String,
    /// Organ type echoed by the backend; sent back as chat context.
    pub organ_type: String,
    pub confidence: Option<f64>,
    pub image_type: Option<String>,
}

impl From<UploadResponse> for AnalysisResult {
    fn from(response: UploadResponse) -> Self {
        Self {
            prediction: response.prediction,
            original_image: response.original_image,
            sr_image: response.sr_image,
            cg_image: response.cg_image,
            organ_type: response.organ_type,
            confidence: response.confidence,
            image_type: response.image_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Original,
    Enhanced,
    Translated,
}

impl ArtifactKind {
    /// Panel label. The translated image is named after the modality it was
    /// synthesized into, i.e. the opposite of the selected image type.
    pub fn label(self, selected: ImageType) -> String {
        match self {
            ArtifactKind::Original => "Original Image".to_string(),
            ArtifactKind::Enhanced => "Enhanced Image (SRGAN)".to_string(),
            ArtifactKind::Translated => {
                format!("Translated Image ({})", selected.translated().label())
            }
        }
    }

    /// Short name used for downloaded files.
    pub fn file_stem(self) -> &'static str {
        match self {
            ArtifactKind::Original => "original",
            ArtifactKind::Enhanced => "enhanced",
            ArtifactKind::Translated => "translated",
        }
    }
}

impl AnalysisResult {
    pub fn artifacts(&self) -> [(ArtifactKind, &str); 3] {
        [
            (ArtifactKind::Original, self.original_image.as_str()),
            (ArtifactKind::Enhanced, self.sr_image.as_str()),
            (ArtifactKind::Translated, self.cg_image.as_str()),
        ]
    }

    /// Classifier confidence as a percentage, when the backend reported one.
    pub fn confidence_label(&self) -> Option<String> {
        self.confidence
            .filter(|value| value.is_finite())
            .map(|value| format!("{:.1}%", value * 100.0))
    }

    pub fn prediction_line(&self) -> String {
        match self.confidence_label() {
            Some(confidence) => format!("Prediction: {} ({})", self.prediction, confidence),
            None => format!("Prediction: {}", self.prediction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::sample_upload_response;

    #[test]
    fn result_drops_the_seed_message() {
        let result = AnalysisResult::from(sample_upload_response());
        assert_eq!(result.prediction, "Glioma");
        assert_eq!(result.organ_type, "brain");
        assert_eq!(result.cg_image, "c.png");
    }

    #[test]
    fn translated_label_uses_opposite_modality() {
        assert_eq!(
            ArtifactKind::Translated.label(ImageType::Mri),
            "Translated Image (CT)"
        );
        assert_eq!(
            ArtifactKind::Translated.label(ImageType::Ct),
            "Translated Image (MRI)"
        );
        assert_eq!(
            ArtifactKind::Enhanced.label(ImageType::Ct),
            "Enhanced Image (SRGAN)"
        );
    }

    #[test]
    fn prediction_line_includes_confidence_when_present() {
        let mut result = AnalysisResult::from(sample_upload_response());
        assert_eq!(result.prediction_line(), "Prediction: Glioma");

        result.confidence = Some(0.9734);
        assert_eq!(result.prediction_line(), "Prediction: Glioma (97.3%)");

        result.confidence = Some(f64::NAN);
        assert_eq!(result.confidence_label(), None);
    }

    #[test]
    fn artifacts_are_listed_in_panel_order() {
        let result = AnalysisResult::from(sample_upload_response());
        let kinds: Vec<_> = result.artifacts().iter().map(|(kind, _)| *kind).collect();
        assert_eq!(
            kinds,
            vec![
                ArtifactKind::Original,
                ArtifactKind::Enhanced,
                ArtifactKind::Translated
            ]
        );
        assert_eq!(result.artifacts()[1].1, "b.png");
    }
}
