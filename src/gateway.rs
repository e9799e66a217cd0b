//! The seam between workflow code and the hosted models.
//!
//! [`crate::GeminiClient`] is the production implementation; the
//! orchestrator and session only ever see this trait.

use crate::error::Result;
use crate::models::{Dish, ImageData};
use async_trait::async_trait;

#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Extracts the main dishes from free-form menu text.
    async fn parse_menu(&self, menu_text: &str) -> Result<Vec<Dish>>;

    /// Produces one 4:3 PNG photograph of a dish in the given style.
    async fn generate_image(
        &self,
        dish_name: &str,
        dish_description: &str,
        style_prompt: &str,
    ) -> Result<ImageData>;

    /// Applies a free-text edit instruction to an existing image.
    async fn edit_image(&self, image: &ImageData, instruction: &str) -> Result<ImageData>;

    /// Three social captions for a photographed dish.
    async fn generate_captions(
        &self,
        dish_name: &str,
        dish_description: &str,
        style_prompt: &str,
    ) -> Result<Vec<String>>;

    /// A short "Name - Description" sample menu.
    async fn generate_sample_menu(&self) -> Result<String>;
}
