use crate::gamma::client::{GammaClient, GammaError};
use crate::mcp::errors;
use crate::tools::error_result;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolArgs {
    generation_id: String,
    #[serde(default)]
    download: bool,
}

pub async fn call(client: &GammaClient, args: &Value) -> Value {
    let args: ToolArgs = match serde_json::from_value(args.clone()) {
        Ok(args) => args,
        Err(err) => {
            return error_result(errors::INVALID_INPUT, format!("invalid arguments: {err}"), None);
        }
    };

    if args.generation_id.trim().is_empty() {
        return error_result(errors::INVALID_INPUT, "generationId must not be empty", None);
    }

    let bundle = match client.get_assets(&args.generation_id, args.download).await {
        Ok(bundle) => bundle,
        Err(err @ GammaError::Io(_)) => {
            return error_result(errors::INTERNAL_ERROR, err.to_string(), None);
        }
        Err(err) => {
            return error_result(
                errors::API_ERROR,
                format!("failed to fetch generation {}: {err}", args.generation_id),
                None,
            );
        }
    };

    let resource = serde_json::to_value(&bundle).unwrap_or_else(|_| json!({}));

    json!({
        "content": [{
            "type": "resource",
            "resource": {
                "text": resource.to_string(),
                "uri": "",
                "mimeType": "application/json"
            }
        }],
        "structuredContent": resource,
        "isError": false
    })
}
