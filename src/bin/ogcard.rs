use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use ogcard::config::{Cli, Command, RenderArgs, ServeArgs, UrlArgs};
use ogcard::{OgEngine, PRESETS};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    ogcard::telemetry::init(cli.log_format)?;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Render(args) => cmd_render(args).await,
        Command::Url(args) => cmd_url(&args),
        Command::Presets => cmd_presets(),
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let engine = OgEngine::new(args.engine.engine_settings()).context("initialize engine")?;
    ogcard::server::serve(Arc::new(engine), args.server_settings()).await
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let engine = OgEngine::new(args.engine.engine_settings()).context("initialize engine")?;
    let spec = engine.interpret_query(&args.query);
    let png = engine.render_png(&spec).await?;

    write_output(&args.out, &png)?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        spec.width,
        spec.height
    );
    Ok(())
}

fn cmd_url(args: &UrlArgs) -> anyhow::Result<()> {
    println!("{}", args.to_url()?);
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&PRESETS).context("serialize presets")?;
    println!("{json}");
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))
}
