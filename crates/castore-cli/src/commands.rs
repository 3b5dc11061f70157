use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context};
use castore_store::{ContentStore, Layout, StoreConfig};
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        store,
        format,
        ..
    } = cli;
    let config = resolve_config(&store)?;
    debug!(
        base = %config.base_path.display(),
        hash = %config.hash,
        layout = ?config.layout,
        "resolved store configuration"
    );
    let store = ContentStore::new(config.into_options()?).context("opening store")?;

    match command {
        Command::Put(args) => cmd_put(&store, args, &format),
        Command::Get(args) => cmd_get(&store, args),
        Command::Size(args) => cmd_size(&store, args, &format),
        Command::Path(args) => cmd_path(&store, args, &format),
    }
}

/// Layer command-line flags over the optional config file.
pub fn resolve_config(args: &StoreArgs) -> anyhow::Result<StoreConfig> {
    let mut config = match &args.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(base) = &args.base_path {
        config.base_path = base.clone();
    }
    if let Some(hash) = args.hash {
        config.hash = hash;
    }
    match args.depth {
        Some(0) => config.layout = Layout::Flat,
        Some(depth) => config.layout = Layout::Depth { depth },
        None => {}
    }
    if let Some(max) = args.max_size {
        config.max_object_size = max;
    }
    if config.base_path.as_os_str().is_empty() {
        bail!("no store location: pass --base-path or set base_path in --config");
    }
    Ok(config)
}

fn cmd_put(store: &ContentStore, args: PutArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let key = match args.path.as_deref() {
        None => store.put(io::stdin().lock())?,
        Some(path) if path == Path::new("-") => store.put(io::stdin().lock())?,
        Some(path) => store
            .put_file(path)
            .with_context(|| format!("storing {}", path.display()))?,
    };
    match format {
        OutputFormat::Text => println!("{key}"),
        OutputFormat::Json => {
            let size = store.size(&key)?;
            println!("{}", json!({ "key": key, "size": size }));
        }
    }
    Ok(())
}

fn cmd_get(store: &ContentStore, args: GetArgs) -> anyhow::Result<()> {
    let Some(mut object) = store.get(&args.key)? else {
        bail!("object {} not found", args.key);
    };
    match &args.output {
        Some(path) => {
            let mut out =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            io::copy(&mut object, &mut out)?;
            eprintln!(
                "{} {} -> {}",
                "✓".green(),
                args.key.short_hex().yellow(),
                path.display().to_string().bold()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            io::copy(&mut object, &mut stdout)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_size(store: &ContentStore, args: KeyArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let Some(size) = store.size(&args.key)? else {
        bail!("object {} not found", args.key);
    };
    match format {
        OutputFormat::Text => println!("{size}"),
        OutputFormat::Json => println!("{}", json!({ "key": args.key, "size": size })),
    }
    Ok(())
}

fn cmd_path(store: &ContentStore, args: KeyArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let path = store.object_path(&args.key)?;
    let present = store.contains(&args.key)?;
    match format {
        OutputFormat::Text => {
            let status = if present { "present".green() } else { "absent".dimmed() };
            println!("{}  ({status})", path.display());
        }
        OutputFormat::Json => println!(
            "{}",
            json!({ "key": args.key, "path": path, "present": present })
        ),
    }
    Ok(())
}
