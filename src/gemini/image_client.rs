use crate::{
    error::{Result, StudioError},
    logger,
    models::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageData,
        ImagenInstance, ImagenOutputOptions, ImagenParameters, ImagenPredictRequest,
        ImagenPredictResponse, Part, DEFAULT_IMAGE_MIME,
    },
};

use super::transport::Transport;

pub const ASPECT_RATIO: &str = "4:3";

#[derive(Clone)]
pub struct ImageClient {
    transport: Transport,
    image_model: String,
    edit_model: String,
}

impl ImageClient {
    pub fn new(transport: Transport) -> Self {
        let image_model = transport.config().image_model.clone();
        let edit_model = transport.config().edit_model.clone();
        Self {
            transport,
            image_model,
            edit_model,
        }
    }

    pub async fn generate(
        &self,
        dish_name: &str,
        dish_description: &str,
        style_prompt: &str,
    ) -> Result<ImageData> {
        let _timer = logger::timer(&format!("generate_image({})", dish_name));
        let request = predict_request(food_photo_prompt(dish_name, dish_description, style_prompt));

        log::info!("Generating image with model: {}", self.image_model);
        let response: ImagenPredictResponse = self
            .transport
            .post(&self.image_model, "predict", &request)
            .await?;

        first_prediction(response)
    }

    pub async fn edit(&self, image: &ImageData, instruction: &str) -> Result<ImageData> {
        let _timer = logger::timer("edit_image");
        let request = edit_request(image, instruction);

        log::info!("Editing image with model: {}", self.edit_model);
        let response: GenerateContentResponse = self
            .transport
            .post(&self.edit_model, "generateContent", &request)
            .await?;

        first_inline_image(&response)
    }
}

pub fn food_photo_prompt(dish_name: &str, dish_description: &str, style_prompt: &str) -> String {
    format!(
        "A stunning, professional food photograph of \"{}\". Description: {}. The aesthetic is {}. Highly detailed, realistic, gourmet presentation, photorealistic.",
        dish_name, dish_description, style_prompt
    )
}

fn predict_request(prompt: String) -> ImagenPredictRequest {
    ImagenPredictRequest {
        instances: vec![ImagenInstance { prompt }],
        parameters: ImagenParameters {
            sample_count: 1,
            aspect_ratio: ASPECT_RATIO.to_string(),
            output_options: ImagenOutputOptions {
                mime_type: DEFAULT_IMAGE_MIME.to_string(),
            },
        },
    }
}

fn edit_request(image: &ImageData, instruction: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::inline(image.base64.clone(), image.mime_type.clone()),
                Part::text(instruction),
            ],
        }],
        generation_config: Some(GenerationConfig {
            response_modalities: Some(vec!["IMAGE".to_string()]),
            ..Default::default()
        }),
    }
}

/// Takes the first prediction carrying image bytes.
pub fn first_prediction(response: ImagenPredictResponse) -> Result<ImageData> {
    response
        .predictions
        .into_iter()
        .find_map(|p| {
            let base64 = p.bytes_base64_encoded.filter(|b| !b.is_empty())?;
            Some(ImageData {
                base64,
                mime_type: p
                    .mime_type
                    .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
            })
        })
        .ok_or_else(|| StudioError::GenerationFailed("the service returned no images".into()))
}

/// Takes the first inline image part of an edit response.
pub fn first_inline_image(response: &GenerateContentResponse) -> Result<ImageData> {
    response
        .first_inline_data()
        .map(|inline| ImageData {
            base64: inline.data.clone(),
            mime_type: inline.mime_type.clone(),
        })
        .ok_or_else(|| StudioError::EditFailed("the response contained no image part".into()))
}
