use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::Dish;

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Raw output of an image call: base64 payload plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub base64: String,
    pub mime_type: String,
}

/// One photographed dish, kept in the session gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,
    pub dish_name: String,
    pub dish_description: String,
    pub style_prompt: String,
    pub base64: String, // Base64 encoded
    pub mime_type: String,
}

impl GeneratedImage {
    /// Builds a gallery entry with a fresh unique id.
    pub fn new(dish: &Dish, style_prompt: &str, data: ImageData) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            dish_name: dish.name.clone(),
            dish_description: dish.description.clone(),
            style_prompt: style_prompt.to_string(),
            base64: data.base64,
            mime_type: data.mime_type,
        }
    }

    /// Same entry, same id, new pixels.
    pub fn with_data(&self, data: ImageData) -> Self {
        Self {
            base64: data.base64,
            mime_type: data.mime_type,
            ..self.clone()
        }
    }

    pub fn data(&self) -> ImageData {
        ImageData {
            base64: self.base64.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Request body for the Imagen `:predict` method.
#[derive(Debug, Serialize)]
pub struct ImagenPredictRequest {
    pub instances: Vec<ImagenInstance>,
    pub parameters: ImagenParameters,
}

#[derive(Debug, Serialize)]
pub struct ImagenInstance {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
    pub output_options: ImagenOutputOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenOutputOptions {
    pub mime_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImagenPredictResponse {
    #[serde(default)]
    pub predictions: Vec<ImagenPrediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagenPrediction {
    #[serde(alias = "imageBytes")]
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}
