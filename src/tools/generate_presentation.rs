use crate::gamma::client::GammaClient;
use crate::gamma::request::GenerationParams;
use crate::mcp::{contracts, errors};
use crate::tools::error_result;
use serde_json::{Value, json};

pub async fn call(client: &GammaClient, args: &Value) -> Value {
    let params: GenerationParams = match serde_json::from_value(args.clone()) {
        Ok(params) => params,
        Err(err) => {
            return error_result(errors::INVALID_INPUT, format!("invalid arguments: {err}"), None);
        }
    };

    if params.input_text.trim().is_empty() {
        return error_result(
            errors::INVALID_INPUT,
            "inputText is required and must not be empty",
            None,
        );
    }

    let result = client.generate(params).await;

    if let Some(url) = &result.url {
        return json!({
            "content": [{
                "type": "text",
                "text": format!("Presentation generated! View it here: {url}")
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
                    "Generation created (id={generation_id}). No final URL available yet. \
                     Use the {} tool with generationId to fetch exports. \
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
