use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value, json};
use std::path::Path;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

mod config;
mod gamma;
mod mcp;
mod prompts;
mod tools;

use config::Config;
use gamma::client::GammaClient;
use prompts::SharedRegistry;

#[derive(Parser)]
#[command(name = "mcp-gamma")]
#[command(
    version,
    about = "MCP server and CLI for Gamma presentation generation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct GenerateArgs {
    /// Topic or source text for the generation
    #[arg(long)]
    input_text: String,
    /// Output format (presentation | document | social | webpage)
    #[arg(long)]
    format: Option<String>,
    /// Text mode (generate | condense | preserve)
    #[arg(long)]
    text_mode: Option<String>,
    /// Number of cards to generate (1-75)
    #[arg(long)]
    num_cards: Option<u32>,
    /// Request a direct export (pdf | pptx)
    #[arg(long)]
    export_as: Option<String>,
    /// Theme identifier
    #[arg(long)]
    theme_id: Option<String>,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct AssetsArgs {
    /// Generation identifier returned by the generate tools
    #[arg(long)]
    generation_id: String,
    /// Download resolved assets to the local temp directory
    #[arg(long)]
    download: bool,
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct RenderPromptArgs {
    /// Prompt template name
    #[arg(long)]
    name: String,
    /// Template arguments as key=value pairs
    #[arg(long = "arg")]
    args: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
    },
    /// Generate a presentation from input text
    Generate(GenerateArgs),
    /// Resolve (and optionally download) export assets for a generation
    Assets(AssetsArgs),
    /// Render a stored prompt template
    RenderPrompt(RenderPromptArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Serve { stdio } => {
            if stdio {
                run_stdio_server(config).await
            } else {
                anyhow::bail!("only --stdio transport is supported")
            }
        }
        Commands::Generate(args) => run_generate(config, args).await,
        Commands::Assets(args) => run_assets(config, args).await,
        Commands::RenderPrompt(args) => run_render_prompt(config, args),
    }
}

async fn run_generate(config: Config, args: GenerateArgs) -> Result<()> {
    let client = GammaClient::new(&config);

    let mut map = Map::new();
    map.insert("inputText".to_string(), json!(args.input_text));
    if let Some(format) = args.format {
        map.insert("format".to_string(), json!(format));
    }
    if let Some(text_mode) = args.text_mode {
        map.insert("textMode".to_string(), json!(text_mode));
    }
    if let Some(num_cards) = args.num_cards {
        map.insert("numCards".to_string(), json!(num_cards));
    }
    if let Some(export_as) = args.export_as {
        map.insert("exportAs".to_string(), json!(export_as));
    }
    if let Some(theme_id) = args.theme_id {
        map.insert("themeId".to_string(), json!(theme_id));
    }

    let result = tools::generate_presentation::call(&client, &Value::Object(map)).await;
    print_tool_result(result, args.json)
}

async fn run_assets(config: Config, args: AssetsArgs) -> Result<()> {
    let client = GammaClient::new(&config);

    let mut map = Map::new();
    map.insert("generationId".to_string(), json!(args.generation_id));
    if args.download {
        map.insert("download".to_string(), json!(true));
    }

    let result = tools::get_presentation_assets::call(&client, &Value::Object(map)).await;
    print_tool_result(result, args.json)
}

fn run_render_prompt(config: Config, args: RenderPromptArgs) -> Result<()> {
    let registry = prompts::loader::load_all(
        Path::new(&config.public_prompt_dir),
        Path::new(&config.private_prompt_dir),
    );

    let Some(def) = registry.lookup(&args.name) else {
        anyhow::bail!("prompt not found: {}", args.name);
    };

    let mut arguments = Map::new();
    for pair in &args.args {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("argument must be key=value: {pair}"))?;
        arguments.insert(key.to_string(), json!(value));
    }

    let missing = prompts::missing_required(def, &arguments);
    if !missing.is_empty() {
        anyhow::bail!("missing required arguments: {}", missing.join(", "));
    }

    println!("{}", prompts::render(def, &arguments));
    Ok(())
}

fn print_tool_result(result: Value, json_output: bool) -> Result<()> {
    let is_error = result
        .get("isError")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if is_error {
        let message = result
            .get("structuredContent")
            .and_then(|value| value.get("error"))
            .and_then(|value| value.get("message"))
            .and_then(|value| value.as_str())
            .unwrap_or("tool error");
        eprintln!("{message}");
        process::exit(1);
    }

    if json_output {
        let structured = result
            .get("structuredContent")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let output = serde_json::to_string_pretty(&structured)?;
        println!("{output}");
        return Ok(());
    }

    let text = result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| {
            value
                .get("text")
                .or_else(|| value.get("resource").and_then(|r| r.get("text")))
        })
        .and_then(|value| value.as_str())
        .unwrap_or("");
    println!("{text}");
    Ok(())
}

async fn run_stdio_server(config: Config) -> Result<()> {
    let client = GammaClient::new(&config);

    let registry: SharedRegistry = Arc::new(RwLock::new(prompts::loader::load_all(
        Path::new(&config.public_prompt_dir),
        Path::new(&config.private_prompt_dir),
    )));
    {
        let loaded = registry.read().await.len();
        if loaded > 0 {
            tracing::info!(count = loaded, "prompt templates loaded");
        }
    }
    if config.hot_reload {
        prompts::loader::spawn_hot_reload(registry.clone(), &config);
    }

    let stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(_) => continue,
        };

        let method = request.get("method").and_then(|value| value.as_str());
        let id = request.get("id").cloned();
        let response = match (method, id) {
            (Some("initialize"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": "2025-11-25",
                    "capabilities": {
                        "tools": {},
                        "prompts": {}
                    },
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }
            })),
            (Some("tools/list"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "tools": mcp::tool_definitions()
                }
            })),
            (Some("tools/call"), Some(id)) => {
                let result = handle_tool_call(&client, &request).await;
                Some(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": result
                }))
            }
            (Some("prompts/list"), Some(id)) => {
                let registry = registry.read().await;
                Some(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": {
                        "prompts": mcp::prompt_definitions(&registry)
                    }
                }))
            }
            (Some("prompts/get"), Some(id)) => {
                Some(handle_prompt_get(&registry, &request, id).await)
            }
            _ => None,
        };

        if let Some(response) = response {
            let serialized =
                serde_json::to_string(&response).context("failed to serialize response")?;
            stdout
                .write_all(serialized.as_bytes())
                .await
                .context("failed to write response")?;
            stdout
                .write_all(b"\n")
                .await
                .context("failed to write response")?;
            stdout.flush().await.context("failed to flush response")?;
        }
    }

    Ok(())
}

async fn handle_tool_call(client: &GammaClient, request: &Value) -> Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return tools::error_result(mcp::errors::INVALID_INPUT, "params must be an object", None);
    };

    let name = params.get("name").and_then(|value| value.as_str());
    let Some(name) = name else {
        return tools::error_result(
            mcp::errors::INVALID_INPUT,
            "params.name must be a string",
            None,
        );
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    match name {
        mcp::contracts::TOOL_GENERATE_PRESENTATION => {
            tools::generate_presentation::call(client, &args).await
        }
        mcp::contracts::TOOL_GENERATE_EXECUTIVE_PRESENTATION => {
            tools::generate_executive_presentation::call(client, &args).await
        }
        mcp::contracts::TOOL_GENERATE_EXECUTIVE_REPORT => {
            tools::generate_executive_report::call(client, &args).await
        }
        mcp::contracts::TOOL_GET_PRESENTATION_ASSETS => {
            tools::get_presentation_assets::call(client, &args).await
        }
        _ => tools::error_result(
            mcp::errors::INVALID_INPUT,
            format!("tool not implemented: {name}"),
            Some(name),
        ),
    }
}

async fn handle_prompt_get(registry: &SharedRegistry, request: &Value, id: Value) -> Value {
    let params = request.get("params").and_then(|value| value.as_object());
    let name = params
        .and_then(|params| params.get("name"))
        .and_then(|value| value.as_str());
    let Some(name) = name else {
        return json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {
                "code": -32602,
                "message": "params.name must be a string"
            }
        });
    };

    let arguments = params
        .and_then(|params| params.get("arguments"))
        .and_then(|value| value.as_object())
        .cloned()
        .unwrap_or_default();

    let registry = registry.read().await;
    let Some(def) = registry.lookup(name) else {
        return json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {
                "code": -32602,
                "message": format!("unknown prompt: {name}")
            }
        });
    };

    let missing = prompts::missing_required(def, &arguments);
    if !missing.is_empty() {
        return json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {
                "code": -32602,
                "message": format!("missing required arguments: {}", missing.join(", "))
            }
        });
    }

    let mismatched = prompts::mismatched_arguments(def, &arguments);
    if !mismatched.is_empty() {
        return json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {
                "code": -32602,
                "message": format!("arguments have wrong types: {}", mismatched.join(", "))
            }
        });
    }

    let text = prompts::render(def, &arguments);
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "description": def.description,
            "messages": [{
                "role": "user",
                "content": {
                    "type": "text",
                    "text": text
                }
            }]
        }
    })
}
