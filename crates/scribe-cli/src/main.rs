mod cli;
mod service;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, Command};
use scribe_config::Config;
use scribe_engine::export::{CommandPaginator, RenderOptions, render};
use scribe_engine::{EditorSession, LiveSelection, io};
use service::CommandService;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render {
            input,
            output,
            trusted,
        } => {
            let options = if trusted {
                RenderOptions::trusted()
            } else {
                config.export.render
            };
            render_document(&input, output.as_deref(), &options)
        }
        Command::Export {
            input,
            output_dir,
            filename,
        } => export_document(&config, &input, output_dir, filename),
        Command::Convert { input, output } => {
            let doc = io::read_document(&input)?;
            io::write_saved_data(&output, &doc)?;
            log::info!("Wrote {}", output.display());
            Ok(())
        }
        Command::Assist {
            input,
            from,
            to,
            mode,
            output,
            service,
        } => {
            let mode = mode.map(Into::into).unwrap_or(config.assist.mode);
            let output = output.unwrap_or_else(|| input.with_extension("json"));
            let service = CommandService::new(&service)
                .ok_or_else(|| anyhow!("no completion command given"))?;

            let mut session =
                EditorSession::with_document(io::read_document(&input)?).with_mode(mode);
            let outcome = pollster::block_on(
                session.request_completion(&LiveSelection::new(from, to), &service),
            )?;

            if outcome.completion.is_fallback() {
                eprintln!("{}", outcome.completion.text());
                return Ok(());
            }
            io::write_saved_data(&output, session.document())?;
            log::info!("Wrote {}", output.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());

    match Config::load_from_path(&config_path)? {
        Some(config) => Ok(config),
        None if path.is_some() => Err(anyhow!(
            "config file not found: {}",
            config_path.display()
        )),
        None => Ok(Config::default()),
    }
}

fn render_document(input: &Path, output: Option<&Path>, options: &RenderOptions) -> Result<()> {
    let doc = io::read_document(input)?;
    let markup = render(&doc, options);

    match output {
        Some(path) => {
            io::write_file(path, markup.as_str())?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{markup}"),
    }
    Ok(())
}

fn export_document(
    config: &Config,
    input: &Path,
    output_dir: Option<PathBuf>,
    filename: Option<String>,
) -> Result<()> {
    let session = EditorSession::with_document(io::read_document(input)?);
    let paginator = CommandPaginator::new(config.export.renderer.clone());

    let mut options = config.export.options.clone();
    if let Some(filename) = filename {
        options.filename = filename;
    }

    let artifact = pollster::block_on(session.export(&paginator, &options, &config.export.render))
        .with_context(|| format!("exporting {}", input.display()))?;

    let dir = output_dir.unwrap_or_else(|| config.export.output_dir.clone());
    let path = artifact
        .write_to(&dir)
        .with_context(|| format!("writing {}", artifact.filename))?;
    println!("{}", path.display());
    Ok(())
}
