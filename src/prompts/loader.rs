use crate::config::Config;
use crate::prompts::{PromptDef, PromptRegistry, SharedRegistry};
use anyhow::Context;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// Load all prompt files: public directory first, then private, so a
/// private prompt overrides a public one with the same name. A directory
/// that does not exist contributes nothing.
pub fn load_all(public_dir: &Path, private_dir: &Path) -> PromptRegistry {
    let mut registry = PromptRegistry::default();
    load_directory(&mut registry, public_dir);
    load_directory(&mut registry, private_dir);
    registry
}

fn load_directory(registry: &mut PromptRegistry, dir: &Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return,
        Err(err) => {
            warn!(dir = %dir.display(), %err, "failed to read prompt directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        match load_prompt_file(&path) {
            Ok(def) => {
                debug!(name = %def.name, path = %path.display(), "loaded prompt");
                registry.insert(def);
            }
            Err(err) => warn!(path = %path.display(), err = %err, "skipping invalid prompt file"),
        }
    }
}

fn load_prompt_file(path: &Path) -> anyhow::Result<PromptDef> {
    let content = std::fs::read_to_string(path).context("read prompt file")?;
    let def: PromptDef = serde_json::from_str(&content).context("parse prompt file")?;
    if def.name.trim().is_empty() || def.description.trim().is_empty() || def.template.is_empty() {
        anyhow::bail!("name, description and template are required");
    }
    Ok(def)
}

type Fingerprint = BTreeMap<PathBuf, (SystemTime, u64)>;

fn scan_fingerprint(dirs: &[&Path]) -> Fingerprint {
    let mut fingerprint = Fingerprint::new();
    for dir in dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
                fingerprint.insert(path, (modified, meta.len()));
            }
        }
    }
    fingerprint
}

/// Watch the prompt directories and swap the registry when their contents
/// change. Rescans on the debounce interval and waits for two consecutive
/// identical scans before reloading, so rapid successive edits coalesce
/// into one reload.
pub fn spawn_hot_reload(registry: SharedRegistry, config: &Config) -> tokio::task::JoinHandle<()> {
    let public = PathBuf::from(&config.public_prompt_dir);
    let private = PathBuf::from(&config.private_prompt_dir);
    let debounce = if config.reload_debounce.is_zero() {
        Duration::from_millis(100)
    } else {
        config.reload_debounce
    };

    tokio::spawn(async move {
        let dirs = [public.as_path(), private.as_path()];
        let mut fingerprint = scan_fingerprint(&dirs);

        loop {
            tokio::time::sleep(debounce).await;
            let mut current = scan_fingerprint(&dirs);
            if current == fingerprint {
                continue;
            }

            loop {
                tokio::time::sleep(debounce).await;
                let next = scan_fingerprint(&dirs);
                if next == current {
                    break;
                }
                current = next;
            }

            let reloaded = load_all(&public, &private);
            info!(count = reloaded.len(), "prompt templates reloaded");
            *registry.write().await = reloaded;
            fingerprint = current;
        }
    })
}
