//! drives one relay invocation: read an sns event document, transform each
//! record into a slack payload, post it to the configured webhook and print
//! the outcome as json

use std::io::Read;

use anyhow::{Context, Result};
use crier::{event::SnsEvent, log, relay, settings::Settings};

/// exit the complete program if one thread panics
fn setup_panic_handler() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_panic(info);
        std::process::exit(1);
    }));
}

/// read the event json from a file or from stdin when the path is `-`
fn read_event(path: &str) -> Result<String> {
    if path == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read event from stdin")?;
        return Ok(raw);
    }

    std::fs::read_to_string(path).with_context(|| format!("failed to read event file {path}"))
}

/// the entry point of the program
#[tokio::main]
pub async fn main() -> Result<()> {
    setup_panic_handler();

    let settings = Settings::global();

    log::setup_logging().context("could not setup logging")?;

    let raw = read_event(settings.event.as_str())?;
    let event: SnsEvent =
        serde_json::from_str(&raw).context("event document is not a valid sns envelope")?;

    for record in &event.records {
        let response = relay::relay_record(record, settings).await;
        println!("{}", serde_json::to_string(&response)?);
    }

    Ok(())
}
