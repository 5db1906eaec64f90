use serde_json::json;

pub const TOOL_GENERATE_PRESENTATION: &str = "gamma.generate_presentation";
pub const TOOL_GENERATE_EXECUTIVE_PRESENTATION: &str = "gamma.generate_executive_presentation";
pub const TOOL_GENERATE_EXECUTIVE_REPORT: &str = "gamma.generate_executive_report";
pub const TOOL_GET_PRESENTATION_ASSETS: &str = "gamma.get_presentation_assets";

pub const FORMATS: &[&str] = &["presentation", "document", "social", "webpage"];
pub const TEXT_MODES: &[&str] = &["generate", "condense", "preserve"];
pub const TEXT_AMOUNTS: &[&str] = &["brief", "medium", "detailed", "extensive"];
pub const EXPORT_FORMATS: &[&str] = &["pdf", "pptx"];
pub const IMAGE_SOURCES: &[&str] = &[
    "aiGenerated",
    "pictographic",
    "unsplash",
    "giphy",
    "webAllImages",
    "webFreeToUse",
    "webFreeToUseCommercially",
    "placeholder",
    "noImages",
];

fn header_footer_element_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "type": { "type": "string", "enum": ["text", "image", "cardNumber"] },
            "value": { "type": "string" },
            "source": { "type": "string", "enum": ["themeLogo", "custom"] },
            "src": { "type": "string" },
            "size": { "type": "string", "enum": ["sm", "md", "lg", "xl"] }
        },
        "required": ["type"],
        "additionalProperties": false
    })
}

fn card_options_schema() -> serde_json::Value {
    let element = header_footer_element_schema();
    json!({
        "type": "object",
        "properties": {
            "dimensions": {
                "type": "string",
                "description": "Card dimensions. Presentation: fluid, 16x9, 4x3. Document: fluid, pageless, letter, a4. Social: 1x1, 4x5, 9x16."
            },
            "headerFooter": {
                "type": "object",
                "properties": {
                    "topLeft": element,
                    "topCenter": element,
                    "topRight": element,
                    "bottomLeft": element,
                    "bottomCenter": element,
                    "bottomRight": element,
                    "hideFromFirstCard": { "type": "boolean" },
                    "hideFromLastCard": { "type": "boolean" }
                },
                "additionalProperties": false
            }
        },
        "additionalProperties": false
    })
}

pub fn generate_presentation_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "inputText": {
                "type": "string",
                "description": "The topic or source text for the generation."
            },
            "format": { "type": "string", "enum": FORMATS },
            "textMode": {
                "type": "string",
                "enum": TEXT_MODES,
                "description": "How the input text is treated (generate | condense | preserve)."
            },
            "numCards": { "type": "integer", "minimum": 1, "maximum": 75 },
            "exportAs": { "type": "string", "enum": EXPORT_FORMATS },
            "additionalInstructions": { "type": "string" },
            "textAmount": {
                "type": "string",
                "enum": ["short", "medium", "long"],
                "description": "Legacy shorthand for text amount (kept for backward compatibility)."
            },
            "tone": { "type": "string", "description": "Legacy flat field; prefer textOptions.tone." },
            "audience": { "type": "string", "description": "Legacy flat field; prefer textOptions.audience." },
            "imageModel": { "type": "string", "description": "Legacy flat field; prefer imageOptions.model." },
            "imageStyle": { "type": "string", "description": "Legacy flat field; prefer imageOptions.style." },
            "textOptions": {
                "type": "object",
                "properties": {
                    "amount": { "type": "string", "enum": TEXT_AMOUNTS },
                    "tone": { "type": "string" },
                    "audience": { "type": "string" },
                    "language": { "type": "string" }
                },
                "additionalProperties": false
            },
            "imageOptions": {
                "type": "object",
                "properties": {
                    "source": { "type": "string", "enum": IMAGE_SOURCES },
                    "model": { "type": "string" },
                    "style": { "type": "string" }
                },
                "additionalProperties": false
            },
            "cardOptions": card_options_schema(),
            "folderIds": { "type": "array", "items": { "type": "string" } },
            "cardSplit": { "type": "string" },
            "themeId": { "type": "string" }
        },
        "required": ["inputText"],
        "additionalProperties": false
    })
}

pub fn generate_executive_presentation_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "inputText": {
                "type": "string",
                "description": "The content or topic for the executive presentation."
            },
            "themeId": {
                "type": "string",
                "description": "Optional theme ID; the workspace default applies when absent."
            },
            "numCards": { "type": "integer", "minimum": 1, "maximum": 75 }
        },
        "required": ["inputText"],
        "additionalProperties": false
    })
}

pub fn generate_executive_report_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "inputText": {
                "type": "string",
                "description": "Report content, markdown supported. Either this or filePath is required."
            },
            "filePath": {
                "type": "string",
                "description": "Path to a file whose content becomes the report input."
            },
            "themeId": { "type": "string" }
        },
        "additionalProperties": false
    })
}

pub fn get_presentation_assets_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "generationId": {
                "type": "string",
                "description": "The generationId returned by the generate tools."
            },
            "download": {
                "type": "boolean",
                "description": "If true, download the assets and return local file paths."
            }
        },
        "required": ["generationId"],
        "additionalProperties": false
    })
}
