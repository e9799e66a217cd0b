//! Headless UI state: everything a front end renders, and the handlers
//! that mutate it in response to user input.

use crate::{
    download,
    error::{Result, StudioError},
    gateway::ModelGateway,
    models::{GeneratedImage, ImageStyle},
    orchestrator::{Orchestrator, RunEvent},
};
use futures::StreamExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Generated images keyed by id, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ImageGallery {
    order: Vec<String>,
    entries: HashMap<String, GeneratedImage>,
}

impl ImageGallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    /// Appends a new entry. An entry whose id is already present is replaced
    /// in place instead.
    pub fn push(&mut self, image: GeneratedImage) {
        if !self.entries.contains_key(&image.id) {
            self.order.push(image.id.clone());
        }
        self.entries.insert(image.id.clone(), image);
    }

    /// Swaps the entry with the same id, leaving every other entry untouched.
    pub fn replace(&mut self, image: GeneratedImage) -> Result<()> {
        match self.entries.get_mut(&image.id) {
            Some(slot) => {
                *slot = image;
                Ok(())
            }
            None => Err(StudioError::ImageNotFound(image.id)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&GeneratedImage> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedImage> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// At most one modal workflow is open at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    None,
    Editing(String),
    Captioning(String),
}

pub struct Session {
    gateway: Arc<dyn ModelGateway>,
    orchestrator: Orchestrator,
    menu_text: String,
    style: ImageStyle,
    gallery: ImageGallery,
    dialog: Dialog,
    captions: Vec<String>,
    generating: bool,
    generating_menu: bool,
    editing: bool,
    captioning: bool,
    progress_message: String,
    last_error: Option<StudioError>,
    dialog_error: Option<StudioError>,
}

impl Session {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            orchestrator: Orchestrator::new(Arc::clone(&gateway)),
            gateway,
            menu_text: String::new(),
            style: ImageStyle::default(),
            gallery: ImageGallery::new(),
            dialog: Dialog::None,
            captions: Vec::new(),
            generating: false,
            generating_menu: false,
            editing: false,
            captioning: false,
            progress_message: String::new(),
            last_error: None,
            dialog_error: None,
        }
    }

    pub fn menu_text(&self) -> &str {
        &self.menu_text
    }

    pub fn set_menu_text(&mut self, text: impl Into<String>) {
        self.menu_text = text.into();
    }

    pub fn style(&self) -> ImageStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ImageStyle) {
        self.style = style;
    }

    pub fn select_style(&mut self, name: &str) -> Result<()> {
        let style =
            ImageStyle::by_name(name).ok_or_else(|| StudioError::UnknownStyle(name.to_string()))?;
        self.style = style;
        Ok(())
    }

    pub fn gallery(&self) -> &ImageGallery {
        &self.gallery
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn is_generating_menu(&self) -> bool {
        self.generating_menu
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_captioning(&self) -> bool {
        self.captioning
    }

    pub fn progress_message(&self) -> &str {
        &self.progress_message
    }

    pub fn last_error(&self) -> Option<&StudioError> {
        self.last_error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ToString::to_string)
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Error raised inside the edit or caption dialog. Kept apart from
    /// [`Session::last_error`] so a dialog never hides a generation failure.
    pub fn dialog_error(&self) -> Option<&StudioError> {
        self.dialog_error.as_ref()
    }

    pub fn dialog_error_message(&self) -> Option<String> {
        self.dialog_error.as_ref().map(ToString::to_string)
    }

    fn fail(&mut self, error: StudioError) {
        log::error!("❌ {}", error);
        self.last_error = Some(error);
    }

    fn fail_dialog(&mut self, error: StudioError) {
        log::error!("❌ {}", error);
        self.dialog_error = Some(error);
    }

    /// Whether the generate action is currently available.
    pub fn can_generate(&self) -> bool {
        !self.generating && !self.generating_menu && !self.menu_text.trim().is_empty()
    }

    /// Replaces the menu text with a model-written sample.
    pub async fn load_sample_menu(&mut self) -> bool {
        self.generating_menu = true;
        let result = self.gateway.generate_sample_menu().await;
        self.generating_menu = false;

        match result {
            Ok(menu) => {
                self.menu_text = menu;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Runs a full generation and returns the number of images produced.
    pub async fn generate_photos(&mut self) -> usize {
        self.generate_photos_with(|_, _| {}).await
    }

    /// Like [`Session::generate_photos`], calling `observer` after each
    /// event has been applied to the session.
    pub async fn generate_photos_with<F>(&mut self, mut observer: F) -> usize
    where
        F: FnMut(&RunEvent, &Session),
    {
        self.last_error = None;
        let style = self.style;
        let mut stream = match self.orchestrator.run(&self.menu_text, style) {
            Ok(stream) => stream,
            Err(e) => {
                self.fail(e);
                return 0;
            }
        };

        self.generating = true;
        self.gallery.clear();
        let mut generated = 0;
        let mut finished = false;

        while let Some(event) = stream.next().await {
            match &event {
                RunEvent::Progress(message) => self.progress_message = message.clone(),
                RunEvent::DishesParsed(_) => {}
                RunEvent::ImageGenerated { image, .. } => {
                    self.gallery.push(image.clone());
                    generated += 1;
                }
                RunEvent::Completed { .. } => {}
                RunEvent::Failed(_) => {}
            }
            observer(&event, &*self);

            finished = event.is_terminal();
            if let RunEvent::Failed(e) = event {
                self.fail(e);
                break;
            }
        }

        if !finished {
            self.fail(StudioError::RunInterrupted);
        }

        self.generating = false;
        self.progress_message.clear();
        generated
    }

    pub fn open_editor(&mut self, id: &str) -> Result<()> {
        if self.gallery.get(id).is_none() {
            return Err(StudioError::ImageNotFound(id.to_string()));
        }
        self.captions.clear();
        self.dialog_error = None;
        self.dialog = Dialog::Editing(id.to_string());
        Ok(())
    }

    /// Applies an edit to the image open in the editor.
    ///
    /// On success only that gallery entry changes; its id and position stay.
    pub async fn apply_edit(&mut self, instruction: &str) -> bool {
        let Dialog::Editing(id) = &self.dialog else {
            log::warn!("apply_edit called with no image open for editing");
            return false;
        };
        let id = id.clone();
        self.edit_image(&id, instruction).await
    }

    /// Edits any gallery entry by id, independent of the open dialog.
    pub async fn edit_image(&mut self, id: &str, instruction: &str) -> bool {
        if instruction.trim().is_empty() {
            self.fail_dialog(StudioError::EmptyInstruction);
            return false;
        }
        let Some(target) = self.gallery.get(id).cloned() else {
            self.fail_dialog(StudioError::ImageNotFound(id.to_string()));
            return false;
        };

        self.editing = true;
        self.dialog_error = None;
        let result = self.gateway.edit_image(&target.data(), instruction).await;
        self.editing = false;

        let outcome = result.and_then(|data| self.gallery.replace(target.with_data(data)));
        match outcome {
            Ok(()) => {
                log::info!("✅ Edited image for {}", target.dish_name);
                true
            }
            Err(e) => {
                self.fail_dialog(e);
                false
            }
        }
    }

    /// Opens the caption dialog and immediately requests captions.
    pub async fn open_captions(&mut self, id: &str) -> bool {
        if self.gallery.get(id).is_none() {
            self.fail_dialog(StudioError::ImageNotFound(id.to_string()));
            return false;
        }
        self.dialog = Dialog::Captioning(id.to_string());
        self.regenerate_captions().await
    }

    /// Requests a fresh caption set for the image in the caption dialog.
    /// The gallery entry itself is never modified.
    pub async fn regenerate_captions(&mut self) -> bool {
        let Dialog::Captioning(id) = &self.dialog else {
            log::warn!("regenerate_captions called with no image open for captioning");
            return false;
        };
        let Some(image) = self.gallery.get(id).cloned() else {
            let id = id.clone();
            self.fail_dialog(StudioError::ImageNotFound(id));
            return false;
        };

        self.captioning = true;
        self.dialog_error = None;
        self.captions.clear();
        let result = self
            .gateway
            .generate_captions(&image.dish_name, &image.dish_description, &image.style_prompt)
            .await;
        self.captioning = false;

        match result {
            Ok(captions) => {
                self.captions = captions;
                true
            }
            Err(e) => {
                self.fail_dialog(e);
                false
            }
        }
    }

    pub fn close_dialog(&mut self) {
        self.dialog = Dialog::None;
        self.captions.clear();
        self.dialog_error = None;
    }

    pub fn download(&self, id: &str, dir: &Path) -> Result<PathBuf> {
        let image = self
            .gallery
            .get(id)
            .ok_or_else(|| StudioError::ImageNotFound(id.to_string()))?;
        download::save_image(image, dir)
    }
}
