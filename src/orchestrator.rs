//! Parse-then-photograph workflow.
//!
//! A run parses the menu once and then generates one image per dish, strictly
//! in order. Progress is published as a stream of [`RunEvent`]s that the
//! caller drains; every generated image is emitted as soon as it exists.

use crate::{
    error::{Result, StudioError},
    gateway::ModelGateway,
    models::{Dish, GeneratedImage, ImageStyle},
};
use futures::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

pub const PARSING_MESSAGE: &str = "Parsing your menu...";

pub type RunStream = Pin<Box<dyn Stream<Item = RunEvent> + Send>>;

#[derive(Debug)]
pub enum RunEvent {
    /// Human-readable status line for the current step.
    Progress(String),
    /// The menu resolved to this many dishes.
    DishesParsed(usize),
    /// Image `index` (0-based) of `total` is ready.
    ImageGenerated {
        index: usize,
        total: usize,
        image: GeneratedImage,
    },
    /// Every dish was photographed.
    Completed { generated: usize },
    /// The run stopped; images emitted before this stay valid.
    Failed(StudioError),
}

impl RunEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunEvent::Completed { .. } | RunEvent::Failed(_))
    }
}

pub fn progress_message(index: usize, total: usize, dish_name: &str) -> String {
    format!("Generating photo {} of {}: {}", index + 1, total, dish_name)
}

#[derive(Clone)]
pub struct Orchestrator {
    gateway: Arc<dyn ModelGateway>,
    buffer: usize,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway, buffer: 16 }
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }

    /// Starts a run on the current tokio runtime.
    ///
    /// Blank menu text is rejected before anything is spawned. Dropping the
    /// returned stream stops the run before its next model call.
    pub fn run(&self, menu_text: &str, style: ImageStyle) -> Result<RunStream> {
        if menu_text.trim().is_empty() {
            return Err(StudioError::EmptyInput);
        }

        let (tx, rx) = mpsc::channel(self.buffer);
        let gateway = Arc::clone(&self.gateway);
        let menu_text = menu_text.to_string();

        tokio::spawn(async move {
            drive(gateway.as_ref(), &menu_text, style, &tx).await;
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

async fn drive(
    gateway: &dyn ModelGateway,
    menu_text: &str,
    style: ImageStyle,
    tx: &mpsc::Sender<RunEvent>,
) {
    let terminal = match photograph_menu(gateway, menu_text, style, tx).await {
        Ok(Some(generated)) => RunEvent::Completed { generated },
        Ok(None) => {
            log::warn!("Run abandoned: receiver dropped");
            return;
        }
        Err(e) => {
            log::error!("Run failed: {}", e);
            RunEvent::Failed(e)
        }
    };
    let _ = tx.send(terminal).await;
}

/// Returns the number of images produced, or `None` once nobody is listening.
async fn photograph_menu(
    gateway: &dyn ModelGateway,
    menu_text: &str,
    style: ImageStyle,
    tx: &mpsc::Sender<RunEvent>,
) -> Result<Option<usize>> {
    if tx.send(RunEvent::Progress(PARSING_MESSAGE.to_string())).await.is_err() {
        return Ok(None);
    }

    let dishes: Vec<Dish> = gateway.parse_menu(menu_text).await?;
    if dishes.is_empty() {
        return Err(StudioError::NoDishesParsed);
    }

    let total = dishes.len();
    log::info!("Photographing {} dishes in style '{}'", total, style.name);
    if tx.send(RunEvent::DishesParsed(total)).await.is_err() {
        return Ok(None);
    }

    for (index, dish) in dishes.iter().enumerate() {
        let message = progress_message(index, total, &dish.name);
        log::info!("{}", message);
        if tx.send(RunEvent::Progress(message)).await.is_err() {
            return Ok(None);
        }

        let data = gateway
            .generate_image(&dish.name, &dish.description, style.prompt)
            .await?;
        let image = GeneratedImage::new(dish, style.prompt, data);

        if tx
            .send(RunEvent::ImageGenerated {
                index,
                total,
                image,
            })
            .await
            .is_err()
        {
            return Ok(None);
        }
    }

    Ok(Some(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_message_is_one_based() {
        assert_eq!(
            progress_message(0, 3, "Spicy Ramen Bowl"),
            "Generating photo 1 of 3: Spicy Ramen Bowl"
        );
    }

    #[test]
    fn test_terminal_events() {
        assert!(RunEvent::Completed { generated: 1 }.is_terminal());
        assert!(RunEvent::Failed(StudioError::NoDishesParsed).is_terminal());
        assert!(!RunEvent::DishesParsed(2).is_terminal());
    }
}
