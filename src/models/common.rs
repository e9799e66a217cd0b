use serde::{Deserialize, Serialize};

/// A named menu item extracted from raw menu text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    pub description: String,
}

impl Dish {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A fixed photographic aesthetic applied to every image in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageStyle {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const IMAGE_STYLES: [ImageStyle; 3] = [
    ImageStyle {
        name: "Bright & Modern",
        prompt: "A bright and airy, clean, minimalist photograph with modern plating and high-key lighting, on a white marble background.",
    },
    ImageStyle {
        name: "Rustic & Dark",
        prompt: "A moody, dramatic photograph with dark, rustic styling. The food is presented on a dark wood surface with dramatic side lighting and deep shadows.",
    },
    ImageStyle {
        name: "Social Media",
        prompt: "A vibrant, top-down flat lay photograph, perfect for social media. The dish is arranged neatly on a colorful background with trendy props.",
    },
];

impl ImageStyle {
    pub fn presets() -> &'static [ImageStyle] {
        &IMAGE_STYLES
    }

    /// Looks a preset up by name, ignoring case and surrounding whitespace.
    pub fn by_name(name: &str) -> Option<ImageStyle> {
        let wanted = name.trim();
        IMAGE_STYLES
            .iter()
            .copied()
            .find(|style| style.name.eq_ignore_ascii_case(wanted))
    }
}

impl Default for ImageStyle {
    fn default() -> Self {
        IMAGE_STYLES[0]
    }
}
