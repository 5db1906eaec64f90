use crate::gamma::client::GammaClient;
use crate::gamma::request::{
    CardOptions, ExportFormat, Format, GenerationParams, HeaderFooter, HeaderFooterElement,
    HeaderFooterImageSource, HeaderFooterSize, HeaderFooterType, ImageOptions, TextMode,
    TextOptions,
};
use crate::mcp::{contracts, errors};
use crate::tools::error_result;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolArgs {
    #[serde(default)]
    input_text: String,
    theme_id: Option<String>,
    num_cards: Option<u32>,
}

pub async fn call(client: &GammaClient, args: &Value) -> Value {
    let args: ToolArgs = match serde_json::from_value(args.clone()) {
        Ok(args) => args,
        Err(err) => {
            return error_result(errors::INVALID_INPUT, format!("invalid arguments: {err}"), None);
        }
    };

    if args.input_text.trim().is_empty() {
        return error_result(
            errors::INVALID_INPUT,
            "inputText is required and must not be empty",
            None,
        );
    }

    let params = executive_params(args.input_text, args.theme_id, args.num_cards);
    let result = client.generate(params).await;

    if let Some(url) = &result.url {
        return json!({
            "content": [{
                "type": "text",
                "text": format!(
                    "Executive presentation generated! View it here: {url}\n\n\
                     Format: Professional PPTX with condensed text, photorealistic images, \
                     and executive-focused tone."
                )
            }],
            "structuredContent": {
                "url": url,
                "generation_id": result.generation_id
            },
            "isError": false
        });
    }

    if let Some(generation_id) = &result.generation_id {
        let status = result.error.as_deref().unwrap_or("unknown");
        return json!({
            "content": [{
                "type": "text",
                "text": format!(
                    "Executive presentation created (id={generation_id}). No final URL \
                     available yet. Use the {} tool with generationId to fetch exports. \
                     Polling error / status: {status}",
                    contracts::TOOL_GET_PRESENTATION_ASSETS
                )
            }],
            "structuredContent": {"generation_id": generation_id},
            "isError": false
        });
    }

    let error = result.error.unwrap_or_else(|| "unknown error".to_string());
    error_result(errors::GENERATION_FAILED, error, None)
}

/// Executive-focused defaults: condensed 16x9 PPTX with a theme-logo /
/// card-number footer hidden on the cover card.
fn executive_params(
    input_text: String,
    theme_id: Option<String>,
    num_cards: Option<u32>,
) -> GenerationParams {
    GenerationParams {
        input_text,
        format: Some(Format::Presentation),
        text_mode: Some(TextMode::Condense),
        export_as: Some(ExportFormat::Pptx),
        card_split: Some("inputTextBreaks".to_string()),
        num_cards,
        theme_id,
        text_options: Some(TextOptions {
            amount: Some("medium".to_string()),
            tone: Some("professional and confident".to_string()),
            audience: Some("executives and senior leadership".to_string()),
            language: None,
        }),
        image_options: Some(ImageOptions {
            source: Some("aiGenerated".to_string()),
            model: None,
            style: Some("photorealistic".to_string()),
        }),
        card_options: Some(CardOptions {
            dimensions: Some("16x9".to_string()),
            header_footer: Some(HeaderFooter {
                bottom_left: Some(HeaderFooterElement {
                    kind: HeaderFooterType::Image,
                    value: None,
                    source: Some(HeaderFooterImageSource::ThemeLogo),
                    src: None,
                    size: Some(HeaderFooterSize::Sm),
                }),
                bottom_right: Some(HeaderFooterElement {
                    kind: HeaderFooterType::CardNumber,
                    value: None,
                    source: None,
                    src: None,
                    size: None,
                }),
                hide_from_first_card: Some(true),
                hide_from_last_card: Some(false),
                ..HeaderFooter::default()
            }),
        }),
        ..GenerationParams::default()
    }
}
