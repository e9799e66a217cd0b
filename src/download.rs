use crate::{
    error::{Result, StudioError},
    models::GeneratedImage,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fs;
use std::path::{Path, PathBuf};

/// `"Spicy Ramen Bowl"` -> `"Spicy-Ramen-Bowl.png"`.
///
/// Every whitespace run becomes one hyphen. The extension is always `.png`.
pub fn download_file_name(dish_name: &str) -> String {
    let mut name = String::with_capacity(dish_name.len() + 4);
    let mut in_space = false;
    for c in dish_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('-');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    name.push_str(".png");
    name
}

pub fn decode_image(image: &GeneratedImage) -> Result<Vec<u8>> {
    STANDARD
        .decode(image.base64.trim())
        .map_err(|e| StudioError::SerializationError(format!("invalid base64 image data: {}", e)))
}

/// Writes the decoded image into `dir` and returns the file path.
pub fn save_image(image: &GeneratedImage, dir: &Path) -> Result<PathBuf> {
    let bytes = decode_image(image)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(download_file_name(&image.dish_name));
    fs::write(&path, bytes)?;
    log::info!("💾 Image saved to: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dish, ImageData};

    fn image(name: &str, base64: &str, mime: &str) -> GeneratedImage {
        GeneratedImage::new(
            &Dish::new(name, "desc"),
            "style",
            ImageData {
                base64: base64.into(),
                mime_type: mime.into(),
            },
        )
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("Spicy Ramen Bowl"), "Spicy-Ramen-Bowl.png");
        assert_eq!(download_file_name("Fish  &\tChips"), "Fish-&-Chips.png");
        assert_eq!(download_file_name("Toast"), "Toast.png");
    }

    #[test]
    fn test_save_image_ignores_mime_subtype() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = image("Spicy Ramen Bowl", "aGVsbG8=", "image/jpeg");

        let path = save_image(&jpeg, dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "Spicy-Ramen-Bowl.png");
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_bad_base64_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let broken = image("Soup", "not base64!!", "image/png");
        assert!(matches!(
            save_image(&broken, dir.path()),
            Err(StudioError::SerializationError(_))
        ));
    }
}
