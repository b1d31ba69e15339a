use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pitchboard::config::{Command, Config};
use pitchboard::{Dataset, Session};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout stays clean for JSON
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .init();

    let dataset = Dataset::read_csv(&config.data)
        .with_context(|| format!("loading pitch data from {}", config.data.display()))?;

    let mut session = Session::new(&dataset, config.assets());
    for event in config.command.selections().events() {
        session.apply(event)?;
    }

    match &config.command {
        Command::Options(_) => {
            println!("{}", session.options().to_json()?);
        }
        Command::Render { out, text, .. } => {
            let page = session.render()?;
            if *text {
                for line in page.text_lines() {
                    println!("{}", line);
                }
                return Ok(());
            }
            match out {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let mut writer = BufWriter::new(file);
                    page.write_json(&mut writer)?;
                    writer.flush()?;
                    info!("wrote page to {}", path.display());
                }
                None => println!("{}", page.to_json()?),
            }
        }
    }
    Ok(())
}
