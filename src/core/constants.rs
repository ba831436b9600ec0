//! Shared constants used across the application

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Overrides the configured backend URL when set.
pub const BACKEND_URL_ENV: &str = "MEDAI_BACKEND_URL";

pub const NO_FILE_SELECTED: &str = "No file selected";

pub const NO_FILE_ERROR: &str = "Please select an image file first";

/// Shown for every upload failure, whatever the cause.
pub const UPLOAD_FAILED_ERROR: &str = "Error processing image. Please try again.";

/// Appended as the assistant's reply when a chat request fails.
pub const CHAT_FALLBACK_REPLY: &str = "Sorry, I encountered an error processing your message.";

/// Lines moved per PageUp/PageDown in the consultation transcript.
pub const CHAT_SCROLL_STEP: i32 = 5;
