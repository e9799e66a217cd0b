//! Menu photographer: turn a restaurant menu into a gallery of styled food
//! photographs, then edit them or write social captions for them.
//!
//! ```no_run
//! use menu_photographer::{GeminiClient, ImageStyle, Session};
//! use std::sync::Arc;
//!
//! # async fn demo() -> menu_photographer::Result<()> {
//! let client = GeminiClient::from_env()?;
//! let mut session = Session::new(Arc::new(client));
//! session.set_menu_text("Margherita Pizza - Fresh tomatoes, mozzarella, basil");
//! session.select_style("Rustic & Dark")?;
//! session.generate_photos().await;
//! for image in session.gallery().iter() {
//!     println!("{} ({})", image.dish_name, image.mime_type);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod download;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod session;

pub use config::GeminiConfig;
pub use download::{download_file_name, save_image};
pub use error::{Result, StudioError};
pub use gateway::ModelGateway;
pub use gemini::{GeminiClient, ImageClient, TextClient};
pub use models::{Dish, GeneratedImage, ImageData, ImageStyle, IMAGE_STYLES};
pub use orchestrator::{Orchestrator, RunEvent, RunStream};
pub use session::{Dialog, ImageGallery, Session};
