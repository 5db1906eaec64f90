use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

struct PromptServer {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<std::process::ChildStdout>,
}

fn spawn_with_prompt_dirs(
    public: &std::path::Path,
    private: &std::path::Path,
) -> Result<PromptServer, Box<dyn std::error::Error>> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mcp-gamma"))
        .args(["serve", "--stdio"])
        .env("GAMMA_PROMPTS_PUBLIC_DIR", public)
        .env("GAMMA_PROMPTS_PRIVATE_DIR", private)
        .env("GAMMA_PROMPTS_HOT_RELOAD", "false")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()?;

    let stdin = child.stdin.take().expect("stdin available");
    let stdout = BufReader::new(child.stdout.take().expect("stdout available"));
    Ok(PromptServer {
        child,
        stdin,
        stdout,
    })
}

fn round_trip(
    server: &mut PromptServer,
    request: serde_json::Value,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let serialized = serde_json::to_string(&request)?;
    writeln!(server.stdin, "{serialized}")?;
    server.stdin.flush()?;

    let mut line = String::new();
    server.stdout.read_line(&mut line)?;
    Ok(serde_json::from_str(line.trim())?)
}

fn write_prompt_file(dir: &std::path::Path, file: &str, body: serde_json::Value) {
    std::fs::write(dir.join(file), body.to_string()).expect("write prompt file");
}

#[test]
fn prompts_list_and_get_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    let public = root.path().join("public");
    let private = root.path().join("private");
    std::fs::create_dir_all(&public)?;
    std::fs::create_dir_all(&private)?;

    write_prompt_file(
        &public,
        "greeting.json",
        serde_json::json!({
            "name": "greeting",
            "description": "Greets someone by name",
            "parameters": {
                "name": {"type": "string", "description": "Who to greet", "required": false}
            },
            "template": "Hello {{name || \"World\"}}"
        }),
    );

    let mut server = spawn_with_prompt_dirs(&public, &private)?;

    let response = round_trip(
        &mut server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "prompts/list",
            "params": {}
        }),
    )?;
    let prompts = response
        .get("result")
        .and_then(|value| value.get("prompts"))
        .and_then(|value| value.as_array())
        .expect("prompts array present");
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0].get("name").and_then(|v| v.as_str()),
        Some("greeting")
    );

    // Rendered with the literal default.
    let response = round_trip(
        &mut server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "prompts/get",
            "params": {"name": "greeting", "arguments": {}}
        }),
    )?;
    let text = response
        .pointer("/result/messages/0/content/text")
        .and_then(|v| v.as_str())
        .expect("message text");
    assert_eq!(text, "Hello World");

    // Rendered with a supplied argument.
    let response = round_trip(
        &mut server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "prompts/get",
            "params": {"name": "greeting", "arguments": {"name": "Ann"}}
        }),
    )?;
    let text = response
        .pointer("/result/messages/0/content/text")
        .and_then(|v| v.as_str())
        .expect("message text");
    assert_eq!(text, "Hello Ann");

    let _ = server.child.kill();
    Ok(())
}

#[test]
fn private_prompt_overrides_public_and_unknown_name_errors()
-> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    let public = root.path().join("public");
    let private = root.path().join("private");
    std::fs::create_dir_all(&public)?;
    std::fs::create_dir_all(&private)?;

    write_prompt_file(
        &public,
        "briefing.json",
        serde_json::json!({
            "name": "briefing",
            "description": "Public briefing",
            "parameters": {},
            "template": "public version"
        }),
    );
    write_prompt_file(
        &private,
        "briefing.json",
        serde_json::json!({
            "name": "briefing",
            "description": "Private briefing",
            "parameters": {},
            "template": "private version"
        }),
    );

    let mut server = spawn_with_prompt_dirs(&public, &private)?;

    let response = round_trip(
        &mut server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "prompts/get",
            "params": {"name": "briefing", "arguments": {}}
        }),
    )?;
    let text = response
        .pointer("/result/messages/0/content/text")
        .and_then(|v| v.as_str())
        .expect("message text");
    assert_eq!(text, "private version");

    let response = round_trip(
        &mut server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "prompts/get",
            "params": {"name": "no-such-prompt", "arguments": {}}
        }),
    )?;
    let message = response
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .expect("error message");
    assert!(message.contains("no-such-prompt"));

    let _ = server.child.kill();
    Ok(())
}

#[test]
fn missing_required_argument_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let root = tempfile::tempdir()?;
    let public = root.path().join("public");
    std::fs::create_dir_all(&public)?;

    write_prompt_file(
        &public,
        "pitch.json",
        serde_json::json!({
            "name": "pitch",
            "description": "Pitch deck",
            "parameters": {
                "company_name": {"type": "string", "required": true}
            },
            "template": "Pitch for {{company_name}}"
        }),
    );

    let mut server = spawn_with_prompt_dirs(&public, &root.path().join("private"))?;

    let response = round_trip(
        &mut server,
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "prompts/get",
            "params": {"name": "pitch", "arguments": {}}
        }),
    )?;
    let message = response
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .expect("error message");
    assert!(message.contains("company_name"));

    let _ = server.child.kill();
    Ok(())
}
