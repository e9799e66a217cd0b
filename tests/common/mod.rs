//! Scripted in-memory gateway shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use menu_photographer::{Dish, ImageData, ModelGateway, Result, StudioError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct MockGateway {
    pub dishes: Vec<Dish>,
    pub parse_fails: bool,
    /// 0-based index of the image call that fails.
    pub fail_image_at: Option<usize>,
    /// 0-based index of the image call that panics, killing the run task.
    pub panic_image_at: Option<usize>,
    pub edit_returns_nothing: bool,
    /// `None` makes caption calls fail as malformed.
    pub captions: Option<Vec<String>>,
    pub sample_menu: String,

    pub parse_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
    pub edit_calls: AtomicUsize,
    pub caption_calls: AtomicUsize,
    pub image_requests: Mutex<Vec<(String, String, String)>>,
}

impl MockGateway {
    pub fn with_dishes(dishes: &[(&str, &str)]) -> Self {
        Self {
            dishes: dishes.iter().map(|(n, d)| Dish::new(*n, *d)).collect(),
            captions: Some(vec![
                "So good! Order now #foodie".to_string(),
                "Slow-cooked and served hot. Visit us #eats".to_string(),
                "Hungry yet? #yum".to_string(),
            ]),
            sample_menu: "Avocado Toast - Sourdough, chili flakes\nMatcha Pancakes - Fluffy stack".to_string(),
            ..Default::default()
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn encoded(text: &str) -> String {
    STANDARD.encode(text)
}

#[async_trait]
impl ModelGateway for MockGateway {
    async fn parse_menu(&self, _menu_text: &str) -> Result<Vec<Dish>> {
        self.parse_calls.fetch_add(1, Ordering::SeqCst);
        if self.parse_fails {
            return Err(StudioError::RequestError("connection reset".into()));
        }
        Ok(self.dishes.clone())
    }

    async fn generate_image(
        &self,
        dish_name: &str,
        dish_description: &str,
        style_prompt: &str,
    ) -> Result<ImageData> {
        let call = self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.image_requests.lock().unwrap().push((
            dish_name.to_string(),
            dish_description.to_string(),
            style_prompt.to_string(),
        ));
        if self.panic_image_at == Some(call) {
            panic!("image backend crashed on call {}", call);
        }
        if self.fail_image_at == Some(call) {
            return Err(StudioError::RequestError("deadline exceeded".into()));
        }
        Ok(ImageData {
            base64: encoded(&format!("photo of {}", dish_name)),
            mime_type: "image/png".to_string(),
        })
    }

    async fn edit_image(&self, _image: &ImageData, instruction: &str) -> Result<ImageData> {
        self.edit_calls.fetch_add(1, Ordering::SeqCst);
        if self.edit_returns_nothing {
            return Err(StudioError::EditFailed("no image part".into()));
        }
        Ok(ImageData {
            base64: encoded(&format!("edited: {}", instruction)),
            mime_type: "image/jpeg".to_string(),
        })
    }

    async fn generate_captions(
        &self,
        _dish_name: &str,
        _dish_description: &str,
        _style_prompt: &str,
    ) -> Result<Vec<String>> {
        self.caption_calls.fetch_add(1, Ordering::SeqCst);
        self.captions
            .clone()
            .ok_or_else(|| StudioError::MalformedResponse("missing captions array".into()))
    }

    async fn generate_sample_menu(&self) -> Result<String> {
        Ok(self.sample_menu.clone())
    }
}
