pub mod image_client;
pub mod text_client;
pub mod transport;

use crate::{
    config::GeminiConfig,
    error::Result,
    gateway::ModelGateway,
    models::{Dish, ImageData},
};
use async_trait::async_trait;

pub use image_client::ImageClient;
pub use text_client::TextClient;
pub use transport::Transport;

/// Gemini-backed [`ModelGateway`]: text calls go to the text model,
/// generation to Imagen and edits to the image-capable Gemini model.
#[derive(Clone)]
pub struct GeminiClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let transport = Transport::new(config)?;
        Ok(Self {
            text_client: TextClient::new(transport.clone()),
            image_client: ImageClient::new(transport),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    async fn parse_menu(&self, menu_text: &str) -> Result<Vec<Dish>> {
        self.text_client.parse_menu(menu_text).await
    }

    async fn generate_image(
        &self,
        dish_name: &str,
        dish_description: &str,
        style_prompt: &str,
    ) -> Result<ImageData> {
        self.image_client
            .generate(dish_name, dish_description, style_prompt)
            .await
    }

    async fn edit_image(&self, image: &ImageData, instruction: &str) -> Result<ImageData> {
        self.image_client.edit(image, instruction).await
    }

    async fn generate_captions(
        &self,
        dish_name: &str,
        dish_description: &str,
        style_prompt: &str,
    ) -> Result<Vec<String>> {
        self.text_client
            .generate_captions(dish_name, dish_description, style_prompt)
            .await
    }

    async fn generate_sample_menu(&self) -> Result<String> {
        self.text_client.generate_sample_menu().await
    }
}
