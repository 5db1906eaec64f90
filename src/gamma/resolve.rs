use serde_json::Value;

// Field names the API has used for a direct result URL across revisions,
// in priority order. All observed variants stay live; there is no version
// flag to branch on.
const URL_FIELDS: &[&str] = &[
    "gammaUrl",
    "gamma_url",
    "url",
    "exportUrl",
    "export_url",
    "outputUrl",
    "output_url",
];

const ID_FIELDS: &[&str] = &["generationId", "generation_id", "id"];

const COMPLETED_STATUSES: &[&str] = &["completed", "succeeded"];
const FAILED_STATUSES: &[&str] = &["failed", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Completed,
    Failed,
    InProgress,
}

/// Extract the generation identifier from an API response payload.
/// Returns `None` when no known field carries a non-empty string.
pub fn extract_generation_id(payload: &Value) -> Option<String> {
    ID_FIELDS
        .iter()
        .filter_map(|field| payload.get(*field).and_then(Value::as_str))
        .find(|id| !id.is_empty())
        .map(str::to_string)
}

/// Extract a result URL from an API response payload, trying the direct
/// field names first and then the first element of the `outputs`, `exports`
/// and `artifacts` arrays. `exports` entries may be bare strings or objects
/// with a `url` field.
pub fn extract_result_url(payload: &Value) -> Option<String> {
    let direct = URL_FIELDS
        .iter()
        .find_map(|field| payload.get(*field).and_then(Value::as_str));
    if let Some(url) = direct {
        return Some(url.to_string());
    }

    first_element_url(payload.get("outputs"))
        .or_else(|| first_export_url(payload.get("exports")))
        .or_else(|| first_element_url(payload.get("artifacts")))
}

/// Classify a status string from the status endpoint. Anything that is not
/// a known terminal synonym means the job is still running.
pub fn classify_status(status: &str) -> Status {
    let status = status.to_lowercase();
    if COMPLETED_STATUSES.contains(&status.as_str()) {
        Status::Completed
    } else if FAILED_STATUSES.contains(&status.as_str()) {
        Status::Failed
    } else {
        Status::InProgress
    }
}

/// The status string itself has moved between `status` and `state`.
pub fn extract_status(payload: &Value) -> String {
    payload
        .get("status")
        .or_else(|| payload.get("state"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase()
}

/// Extract a downloadable artifact URL for one file extension, per the
/// asset endpoint contract: a generic `exportUrl` filtered by suffix, then
/// the named `pdfUrl`/`pptxUrl` field, then any `exports` entry (bare
/// string or object-with-url) whose URL ends in the extension.
pub fn extract_asset_url(payload: &Value, extension: &str) -> Option<String> {
    let suffix = format!(".{extension}");

    if let Some(url) = payload.get("exportUrl").and_then(Value::as_str)
        && url.ends_with(&suffix)
    {
        return Some(url.to_string());
    }

    let named = format!("{extension}Url");
    if let Some(url) = payload.get(named.as_str()).and_then(Value::as_str) {
        return Some(url.to_string());
    }

    payload
        .get("exports")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find_map(|entry| {
            let url = match entry {
                Value::String(url) => url.as_str(),
                Value::Object(_) => entry.get("url").and_then(Value::as_str)?,
                _ => return None,
            };
            url.ends_with(&suffix).then(|| url.to_string())
        })
}

fn first_element_url(array: Option<&Value>) -> Option<String> {
    array
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn first_export_url(array: Option<&Value>) -> Option<String> {
    let entry = array.and_then(Value::as_array).and_then(|e| e.first())?;
    match entry {
        Value::String(url) => Some(url.clone()),
        Value::Object(_) => entry
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
