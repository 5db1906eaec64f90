use serde::{Deserialize, Serialize};

/// Output format accepted by the generate endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Presentation,
    Document,
    Social,
    Webpage,
}

/// How the API treats the input text. The current contract knows exactly
/// these three values; anything else is rejected at deserialization, before
/// any network call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Generate,
    Condense,
    Preserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Pptx,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TextOptions {
    fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.tone.is_none()
            && self.audience.is_none()
            && self.language.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl ImageOptions {
    fn is_empty(&self) -> bool {
        self.source.is_none() && self.model.is_none() && self.style.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderFooterType {
    Text,
    Image,
    CardNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeaderFooterImageSource {
    ThemeLogo,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFooterSize {
    Sm,
    Md,
    Lg,
    Xl,
}

/// One header/footer slot: a text label, an image, or a card number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFooterElement {
    #[serde(rename = "type")]
    pub kind: HeaderFooterType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<HeaderFooterImageSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<HeaderFooterSize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFooter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_left: Option<HeaderFooterElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_center: Option<HeaderFooterElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_right: Option<HeaderFooterElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<HeaderFooterElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_center: Option<HeaderFooterElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_right: Option<HeaderFooterElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_from_first_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_from_last_card: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_footer: Option<HeaderFooter>,
}

/// Caller-supplied parameters, spanning both generations of the contract:
/// legacy flat fields (`textAmount`, `tone`, `audience`, `imageModel`,
/// `imageStyle`) and the current nested option groups. Only this boundary
/// type accepts the loose shape; everything past [`normalize`] sees the
/// canonical [`RequestBody`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    #[serde(default)]
    pub input_text: String,
    pub format: Option<Format>,
    pub text_mode: Option<TextMode>,
    pub num_cards: Option<u32>,
    pub export_as: Option<ExportFormat>,
    pub additional_instructions: Option<String>,
    pub text_amount: Option<String>,
    pub tone: Option<String>,
    pub audience: Option<String>,
    pub image_model: Option<String>,
    pub image_style: Option<String>,
    pub text_options: Option<TextOptions>,
    pub image_options: Option<ImageOptions>,
    pub card_options: Option<CardOptions>,
    pub folder_ids: Option<Vec<String>>,
    pub card_split: Option<String>,
    pub theme_id: Option<String>,
}

/// The canonical body sent to the generate endpoint. Absent optional fields
/// are omitted from the serialized JSON entirely so server-side defaults
/// stay in effect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub input_text: String,
    pub format: Format,
    pub text_mode: TextMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_cards: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_as: Option<ExportFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_options: Option<TextOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_options: Option<ImageOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_options: Option<CardOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_split: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
}

/// Project loose caller parameters into the canonical request body.
///
/// Pure and infallible: missing fields fall back to defaults or are dropped.
/// When a legacy flat field and its nested equivalent are both present, the
/// nested value wins.
pub fn normalize(params: GenerationParams) -> RequestBody {
    let GenerationParams {
        input_text,
        format,
        text_mode,
        num_cards,
        export_as,
        additional_instructions,
        text_amount,
        tone,
        audience,
        image_model,
        image_style,
        text_options,
        image_options,
        card_options,
        folder_ids,
        card_split,
        theme_id,
    } = params;

    let modern_text = text_options.unwrap_or_default();
    let text_options = TextOptions {
        amount: modern_text.amount.or(text_amount),
        tone: modern_text.tone.or(tone),
        audience: modern_text.audience.or(audience),
        language: modern_text.language,
    };

    let modern_image = image_options.unwrap_or_default();
    let image_options = ImageOptions {
        source: modern_image.source,
        model: modern_image.model.or(image_model),
        style: modern_image.style.or(image_style),
    };

    RequestBody {
        input_text,
        format: format.unwrap_or_default(),
        text_mode: text_mode.unwrap_or_default(),
        num_cards,
        export_as,
        additional_instructions,
        text_options: (!text_options.is_empty()).then_some(text_options),
        image_options: (!image_options.is_empty()).then_some(image_options),
        card_options,
        folder_ids,
        card_split,
        theme_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> GenerationParams {
        serde_json::from_value(value).expect("params deserialize")
    }

    #[test]
    fn defaults_applied() {
        let body = normalize(params(json!({"inputText": "Quarterly results"})));
        assert_eq!(body.format, Format::Presentation);
        assert_eq!(body.text_mode, TextMode::Generate);
        assert!(body.text_options.is_none());
        assert!(body.image_options.is_none());
    }

    #[test]
    fn modern_nested_fields_override_legacy_flat_fields() {
        let body = normalize(params(json!({
            "inputText": "x",
            "textAmount": "short",
            "tone": "casual",
            "audience": "everyone",
            "imageModel": "old-model",
            "imageStyle": "sketch",
            "textOptions": {"amount": "detailed", "tone": "formal"},
            "imageOptions": {"model": "new-model"}
        })));

        let text = body.text_options.expect("text options");
        assert_eq!(text.amount.as_deref(), Some("detailed"));
        assert_eq!(text.tone.as_deref(), Some("formal"));
        // No modern equivalent supplied, so the legacy value survives.
        assert_eq!(text.audience.as_deref(), Some("everyone"));

        let image = body.image_options.expect("image options");
        assert_eq!(image.model.as_deref(), Some("new-model"));
        assert_eq!(image.style.as_deref(), Some("sketch"));
    }

    #[test]
    fn legacy_flat_fields_alone_seed_the_groups() {
        let body = normalize(params(json!({
            "inputText": "x",
            "textAmount": "medium",
            "imageStyle": "photorealistic"
        })));
        let text = body.text_options.expect("text options");
        assert_eq!(text.amount.as_deref(), Some("medium"));
        let image = body.image_options.expect("image options");
        assert_eq!(image.style.as_deref(), Some("photorealistic"));
    }

    #[test]
    fn absent_optionals_are_absent_keys_in_serialized_body() {
        let body = normalize(params(json!({"inputText": "x"})));
        let value = serde_json::to_value(&body).expect("serialize");
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 3);
        for key in ["inputText", "format", "textMode"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert!(!obj.values().any(|v| v.is_null()));
    }

    #[test]
    fn pass_through_fields_copied_verbatim() {
        let body = normalize(params(json!({
            "inputText": "x",
            "numCards": 12,
            "exportAs": "pptx",
            "additionalInstructions": "add speaker notes",
            "folderIds": ["f1", "f2"],
            "cardSplit": "auto",
            "themeId": "linen"
        })));
        assert_eq!(body.num_cards, Some(12));
        assert_eq!(body.export_as, Some(ExportFormat::Pptx));
        assert_eq!(body.card_split.as_deref(), Some("auto"));
        assert_eq!(body.theme_id.as_deref(), Some("linen"));
        assert_eq!(body.folder_ids.as_deref(), Some(["f1".to_string(), "f2".to_string()].as_slice()));
    }

    #[test]
    fn card_options_pass_through_structurally() {
        let body = normalize(params(json!({
            "inputText": "x",
            "cardOptions": {
                "dimensions": "16x9",
                "headerFooter": {
                    "bottomRight": {"type": "cardNumber"},
                    "hideFromFirstCard": true
                }
            }
        })));
        let cards = body.card_options.expect("card options");
        assert_eq!(cards.dimensions.as_deref(), Some("16x9"));
        let footer = cards.header_footer.expect("header footer");
        assert_eq!(
            footer.bottom_right.expect("bottom right").kind,
            HeaderFooterType::CardNumber
        );
        assert_eq!(footer.hide_from_first_card, Some(true));
    }

    #[test]
    fn unknown_text_mode_is_rejected_at_the_boundary() {
        let result: Result<GenerationParams, _> =
            serde_json::from_value(json!({"inputText": "x", "textMode": "summarize"}));
        assert!(result.is_err());
    }
}
