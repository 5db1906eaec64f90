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

// Rough estimate of one A4 page worth of source text.
const CHARS_PER_CARD: usize = 1000;
const MAX_REPORT_CARDS: usize = 60;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolArgs {
    input_text: Option<String>,
    file_path: Option<String>,
    theme_id: Option<String>,
}

pub async fn call(client: &GammaClient, args: &Value) -> Value {
    let args: ToolArgs = match serde_json::from_value(args.clone()) {
        Ok(args) => args,
        Err(err) => {
            return error_result(errors::INVALID_INPUT, format!("invalid arguments: {err}"), None);
        }
    };

    let content = match args.file_path {
        Some(path) => match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) => {
                return error_result(
                    errors::INVALID_INPUT,
                    format!("failed to read file at {path}: {err}"),
                    None,
                );
            }
        },
        None => args.input_text.unwrap_or_default(),
    };

    if content.trim().is_empty() {
        return error_result(
            errors::INVALID_INPUT,
            "either inputText or filePath must be provided with non-empty content",
            None,
        );
    }

    let params = report_params(content, args.theme_id);
    let result = client.generate(params).await;

    if let Some(url) = &result.url {
        return json!({
            "content": [{
                "type": "text",
                "text": format!(
                    "Executive report generated! View it here: {url}\n\n\
                     Format: A4 PDF with preserved text content, detailed formatting, \
                     and executive-focused professional tone."
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
                    "Executive report created (id={generation_id}). No final URL available \
                     yet. Use the {} tool with generationId to fetch the PDF export. \
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

fn estimate_num_cards(content: &str) -> u32 {
    content
        .trim()
        .len()
        .div_ceil(CHARS_PER_CARD)
        .clamp(1, MAX_REPORT_CARDS) as u32
}

/// Report defaults: A4 document that preserves the input text and exports
/// straight to PDF, sized by content length.
fn report_params(content: String, theme_id: Option<String>) -> GenerationParams {
    let num_cards = estimate_num_cards(&content);
    GenerationParams {
        input_text: content,
        format: Some(Format::Document),
        text_mode: Some(TextMode::Preserve),
        export_as: Some(ExportFormat::Pdf),
        card_split: Some("auto".to_string()),
        num_cards: Some(num_cards),
        theme_id,
        text_options: Some(TextOptions {
            amount: Some("detailed".to_string()),
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
            dimensions: Some("a4".to_string()),
            header_footer: Some(HeaderFooter {
                top_left: Some(HeaderFooterElement {
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
