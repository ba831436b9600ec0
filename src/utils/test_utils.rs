use crate::api::UploadResponse;
use crate::core::app::App;
use crate::core::config::ResolvedSettings;

pub fn create_test_app() -> App {
    App::new(&ResolvedSettings {
        backend_url: "http://backend.test".to_string(),
        ..ResolvedSettings::default()
    })
}

/// Brain MRI classified as a glioma, with a seed message and no confidence.
pub fn sample_upload_response() -> UploadResponse {
    UploadResponse {
        prediction: "Glioma".to_string(),
        original_image: "a.png".to_string(),
        sr_image: "b.png".to_string(),
        cg_image: "c.png".to_string(),
        organ_type: "brain".to_string(),
        llama_response: Some("I see an abnormality.".to_string()),
        confidence: None,
        image_type: None,
    }
}
