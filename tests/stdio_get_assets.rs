use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn call_tool(
    child: &mut Child,
    arguments: serde_json::Value,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut stdin = child.stdin.take().expect("stdin available");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout available"));

    let request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 4,
        "method": "tools/call",
        "params": {
            "name": "gamma.get_presentation_assets",
            "arguments": arguments
        }
    });
    let serialized = serde_json::to_string(&request)?;
    writeln!(stdin, "{serialized}")?;
    stdin.flush()?;

    let mut line = String::new();
    stdout.read_line(&mut line)?;

    let response: serde_json::Value = serde_json::from_str(line.trim())?;
    Ok(response.get("result").cloned().expect("result present"))
}

#[tokio::test(flavor = "multi_thread")]
async fn assets_returned_as_json_resource() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/generations/gen-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "exportUrl": "https://x/deck.pptx"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut child = Command::new(env!("CARGO_BIN_EXE_mcp-gamma"))
        .args(["serve", "--stdio"])
        .env("GAMMA_API_KEY", "test-key")
        .env("GAMMA_API_BASE_URL", format!("{}/generations", server.uri()))
        .env("GAMMA_PROMPTS_HOT_RELOAD", "false")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let result = call_tool(&mut child, serde_json::json!({"generationId": "gen-7"}))?;
    assert_eq!(result.get("isError").and_then(|v| v.as_bool()), Some(false));

    let resource_text = result
        .pointer("/content/0/resource/text")
        .and_then(|v| v.as_str())
        .expect("resource text present");
    let bundle: serde_json::Value = serde_json::from_str(resource_text)?;

    assert_eq!(
        bundle.get("generation_id").and_then(|v| v.as_str()),
        Some("gen-7")
    );
    assert_eq!(
        bundle.get("pptx").and_then(|v| v.as_str()),
        Some("https://x/deck.pptx")
    );
    assert!(bundle.get("pdf").is_none());
    assert!(bundle.get("downloads").is_none());

    let _ = child.kill();
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn status_fetch_failure_is_an_api_error() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/generations/gen-missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let mut child = Command::new(env!("CARGO_BIN_EXE_mcp-gamma"))
        .args(["serve", "--stdio"])
        .env("GAMMA_API_KEY", "test-key")
        .env("GAMMA_API_BASE_URL", format!("{}/generations", server.uri()))
        .env("GAMMA_PROMPTS_HOT_RELOAD", "false")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let result = call_tool(&mut child, serde_json::json!({"generationId": "gen-missing"}))?;
    assert_eq!(result.get("isError").and_then(|v| v.as_bool()), Some(true));

    let kind = result
        .pointer("/structuredContent/error/kind")
        .and_then(|v| v.as_str());
    assert_eq!(kind, Some("api_error"));
    let message = result
        .pointer("/structuredContent/error/message")
        .and_then(|v| v.as_str())
        .expect("message present");
    assert!(message.contains("gen-missing"));
    assert!(message.contains("404"));

    let _ = child.kill();
    Ok(())
}
