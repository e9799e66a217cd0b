use crate::{
    error::{Result, StudioError},
    logger,
    models::{Content, Dish, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part},
};
use serde_json::{json, Value};

use super::transport::Transport;

pub const EXPECTED_CAPTIONS: usize = 3;

const SAMPLE_MENU_PROMPT: &str = "Generate a sample menu for a trendy cafe with 5 creative main dishes. For each dish, provide a name and a brief, appealing description. The format should be one dish per line, like this: \"Dish Name - Description\". Do not include prices or category headers.";

#[derive(Clone)]
pub struct TextClient {
    transport: Transport,
    model: String,
}

impl TextClient {
    pub fn new(transport: Transport) -> Self {
        let model = transport.config().text_model.clone();
        Self { transport, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        log::info!("Invoking model: {}", self.model);
        self.transport
            .post(&self.model, "generateContent", request)
            .await
    }

    pub async fn parse_menu(&self, menu_text: &str) -> Result<Vec<Dish>> {
        let _timer = logger::timer("parse_menu");
        let request = structured_request(menu_prompt(menu_text), dish_list_schema());
        let response = self.generate(&request).await?;
        let dishes = parse_dishes(&response.text())?;
        log::info!("Parsed {} dishes from menu", dishes.len());
        Ok(dishes)
    }

    pub async fn generate_captions(
        &self,
        dish_name: &str,
        dish_description: &str,
        style_prompt: &str,
    ) -> Result<Vec<String>> {
        let _timer = logger::timer("generate_captions");
        let request = structured_request(
            caption_prompt(dish_name, dish_description, style_prompt),
            caption_schema(),
        );
        let response = self.generate(&request).await?;
        parse_captions(&response.text())
    }

    pub async fn generate_sample_menu(&self) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![user_text(SAMPLE_MENU_PROMPT)],
            generation_config: None,
        };
        let text = self.generate(&request).await?.text();
        if text.trim().is_empty() {
            return Err(StudioError::ResponseError(
                "The AI returned an empty sample menu".into(),
            ));
        }
        Ok(text)
    }
}

fn user_text(text: impl Into<String>) -> Content {
    Content {
        role: Some("user".to_string()),
        parts: vec![Part::text(text)],
    }
}

fn structured_request(prompt: String, schema: Value) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![user_text(prompt)],
        generation_config: Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            response_modalities: None,
        }),
    }
}

pub fn menu_prompt(menu_text: &str) -> String {
    format!(
        "Parse the following restaurant menu text into a JSON array of objects. Each object must have a 'name' and a 'description' key. Only include main dishes. Ignore prices, categories, and side notes. Here is the menu: \n\n{}",
        menu_text
    )
}

pub fn caption_prompt(dish_name: &str, dish_description: &str, style_prompt: &str) -> String {
    format!(
        "You are a creative social media manager for a restaurant. Generate 3 engaging and distinct Instagram captions for a dish.\n\n\
         Dish Name: \"{}\"\n\
         Description: \"{}\"\n\
         Photo Style: \"{}\"\n\n\
         For each caption, include a call-to-action and a few relevant, popular food hashtags. Make the tone of each caption slightly different (e.g., one excited, one descriptive, one questioning).",
        dish_name, dish_description, style_prompt
    )
}

pub fn dish_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING", "description": "The name of the dish." },
                "description": { "type": "STRING", "description": "A brief description of the dish." }
            },
            "required": ["name", "description"]
        }
    })
}

pub fn caption_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "captions": {
                "type": "ARRAY",
                "description": "An array of 3 social media captions.",
                "items": { "type": "STRING" }
            }
        },
        "required": ["captions"]
    })
}

/// Decodes the dish array returned by the menu parse call.
pub fn parse_dishes(raw: &str) -> Result<Vec<Dish>> {
    let dishes: Vec<Dish> = serde_json::from_str(raw.trim()).map_err(|e| {
        log::error!("Failed to parse menu JSON: {}", raw);
        StudioError::MalformedResponse(format!("invalid menu structure ({})", e))
    })?;

    for (i, dish) in dishes.iter().enumerate() {
        let missing = if dish.name.trim().is_empty() {
            "name"
        } else if dish.description.trim().is_empty() {
            "description"
        } else {
            continue;
        };
        return Err(StudioError::MalformedResponse(format!(
            "dish {} has an empty {}",
            i + 1,
            missing
        )));
    }
    Ok(dishes)
}

/// Decodes `{"captions": [...]}`. Only presence and array-ness are enforced.
pub fn parse_captions(raw: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        log::error!("Failed to parse captions JSON: {}", raw);
        StudioError::MalformedResponse(format!("invalid captions JSON ({})", e))
    })?;

    let items = value
        .get("captions")
        .and_then(Value::as_array)
        .ok_or_else(|| StudioError::MalformedResponse("missing captions array".into()))?;

    let captions = items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| StudioError::MalformedResponse("caption is not a string".into()))
        })
        .collect::<Result<Vec<_>>>()?;

    if captions.len() != EXPECTED_CAPTIONS {
        log::warn!(
            "Expected {} captions, model returned {}",
            EXPECTED_CAPTIONS,
            captions.len()
        );
    }
    Ok(captions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dishes() {
        let raw = r#"
            [{"name":"Margherita Pizza","description":"Fresh tomatoes, mozzarella, basil"}]
        "#;
        let dishes = parse_dishes(raw).unwrap();
        assert_eq!(
            dishes,
            vec![Dish::new("Margherita Pizza", "Fresh tomatoes, mozzarella, basil")]
        );
    }

    #[test]
    fn test_parse_dishes_empty_array_is_ok() {
        assert!(parse_dishes("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_dishes_rejects_bad_shapes() {
        for raw in [
            "not json",
            r#"{"name":"A","description":"B"}"#,
            r#"[{"name":"A"}]"#,
            r#"[{"name":"  ","description":"B"}]"#,
            r#"[{"name":"Soup","description":""}]"#,
            r#"[{"name":"Soup","description":"Hot"},{"name":"Tea","description":" "}]"#,
        ] {
            assert!(
                matches!(parse_dishes(raw), Err(StudioError::MalformedResponse(_))),
                "accepted {}",
                raw
            );
        }
    }

    #[test]
    fn test_parse_captions() {
        let raw = r#"{"captions":["One! #food","Two. #eats","Three? #yum"]}"#;
        assert_eq!(parse_captions(raw).unwrap().len(), 3);

        // Length is not enforced.
        assert_eq!(parse_captions(r#"{"captions":["only"]}"#).unwrap(), vec!["only"]);
    }

    #[test]
    fn test_parse_captions_rejects_bad_shapes() {
        for raw in [r#"{}"#, r#"{"captions":"one"}"#, r#"{"captions":[1,2,3]}"#, "[]"] {
            assert!(
                matches!(parse_captions(raw), Err(StudioError::MalformedResponse(_))),
                "accepted {}",
                raw
            );
        }
    }

    #[test]
    fn test_prompts_embed_inputs() {
        assert!(menu_prompt("Soup - hot").ends_with("Here is the menu: \n\nSoup - hot"));
        let prompt = caption_prompt("Ramen", "Spicy broth", "moody");
        assert!(prompt.contains("Dish Name: \"Ramen\""));
        assert!(prompt.contains("Photo Style: \"moody\""));
    }

    #[test]
    fn test_structured_request_shape() {
        let request = structured_request("p".into(), dish_list_schema());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "ARRAY");
        assert_eq!(
            value["generationConfig"]["responseSchema"]["items"]["required"],
            json!(["name", "description"])
        );
    }
}
