//! Command implementations

use std::path::Path;

use anyhow::{Context, Result};

use saldo_core::{
    advisor::{annotate_summaries, AdvisorClient},
    aggregate::aggregate_cards,
    sheet::extract_rows,
};

/// Default listening port when neither --port nor $PORT is set
const DEFAULT_PORT: u16 = 3000;

/// Resolve the listening port: flag > $PORT > default
pub fn resolve_port(flag: Option<u16>) -> Result<u16> {
    match flag {
        Some(port) => Ok(port),
        None => match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", value)),
            Err(_) => Ok(DEFAULT_PORT),
        },
    }
}

pub async fn cmd_serve(host: &str, port: Option<u16>) -> Result<()> {
    let port = resolve_port(port)?;

    println!("Starting saldo server...");
    println!("   Listening: http://{}:{}", host, port);
    println!();
    println!("   Press Ctrl+C to stop");

    saldo_server::serve(host, port).await?;

    Ok(())
}

pub async fn cmd_extract(file: &Path, cuotas: &str, no_advice: bool) -> Result<()> {
    let buffer =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let rows = extract_rows(&buffer)?;
    let mut summaries = aggregate_cards(&rows, cuotas)?;

    if !no_advice {
        let advisor = AdvisorClient::from_env();
        annotate_summaries(&advisor, &mut summaries).await;
    }

    println!("{}", serde_json::to_string_pretty(&summaries)?);

    Ok(())
}
