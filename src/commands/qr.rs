//! QR Codes
//!
//! Encodes invite links with the page's `QRCode` global.

use async_trait::async_trait;
use cotodo_core::env::CodeRenderer;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = QRCode, js_name = toDataURL, catch)]
    async fn to_data_url(text: &str, options: JsValue) -> Result<JsValue, JsValue>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QrOptions<'a> {
    error_correction_level: &'a str,
}

pub struct QrRenderer {
    error_correction: String,
}

impl QrRenderer {
    pub fn new(error_correction: impl Into<String>) -> Self {
        Self {
            error_correction: error_correction.into(),
        }
    }
}

#[async_trait(?Send)]
impl CodeRenderer for QrRenderer {
    async fn render(&self, text: &str) -> Result<String, String> {
        let options = QrOptions {
            error_correction_level: &self.error_correction,
        };
        let options = serde_wasm_bindgen::to_value(&options)
            .map_err(|e| format!("Failed to serialize options: {}", e))?;

        let url = to_data_url(text, options)
            .await
            .map_err(|e| e.as_string().unwrap_or_else(|| format!("{e:?}")))?;
        url.as_string()
            .ok_or_else(|| "QRCode.toDataURL returned a non-string".to_string())
    }
}
