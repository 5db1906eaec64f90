use crate::prompts::PromptRegistry;
use serde_json::json;

pub mod contracts;
pub mod errors;

pub fn tool_definitions() -> Vec<serde_json::Value> {
    vec![
        json!({
            "name": contracts::TOOL_GENERATE_PRESENTATION,
            "description": "Generate a presentation with the Gamma API. The response includes a link to the generated presentation when available.",
            "inputSchema": contracts::generate_presentation_schema()
        }),
        json!({
            "name": contracts::TOOL_GENERATE_EXECUTIVE_PRESENTATION,
            "description": "Generate an executive presentation with professional defaults: condensed text, 16x9 PPTX export, photorealistic images.",
            "inputSchema": contracts::generate_executive_presentation_schema()
        }),
        json!({
            "name": contracts::TOOL_GENERATE_EXECUTIVE_REPORT,
            "description": "Generate a detailed executive report as an A4 PDF, preserving the exact input text. Provide either inputText or filePath.",
            "inputSchema": contracts::generate_executive_report_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_PRESENTATION_ASSETS,
            "description": "Return downloadable PDF/PPTX URLs for a generationId, optionally downloading them to local paths.",
            "inputSchema": contracts::get_presentation_assets_schema()
        }),
    ]
}

pub fn prompt_definitions(registry: &PromptRegistry) -> Vec<serde_json::Value> {
    registry
        .iter()
        .map(|def| {
            let arguments: Vec<serde_json::Value> = def
                .parameters
                .iter()
                .map(|(name, param)| {
                    let mut argument = json!({
                        "name": name,
                        "required": param.required
                    });
                    if let Some(description) = &param.description
                        && let Some(obj) = argument.as_object_mut()
                    {
                        obj.insert("description".to_string(), json!(description));
                    }
                    argument
                })
                .collect();

            json!({
                "name": def.name,
                "description": def.description,
                "arguments": arguments
            })
        })
        .collect()
}
