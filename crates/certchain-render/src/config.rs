use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where rendered certificates go and what they embed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
    /// Optional logo drawn top-left; a missing file is skipped.
    pub logo_path: Option<PathBuf>,
    /// Optional signature image; a missing file becomes placeholder text.
    pub signature_path: Option<PathBuf>,
    /// Endpoint the QR code points at, without the query string.
    pub verification_base_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated_certificates"),
            logo_path: Some(PathBuf::from("ifet.png")),
            signature_path: Some(PathBuf::from("signature.png")),
            verification_base_url: "http://127.0.0.1:5000/verify".into(),
        }
    }
}
