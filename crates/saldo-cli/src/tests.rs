//! CLI tests

use clap::Parser;
use std::path::PathBuf;

use crate::cli::{Cli, Commands};
use crate::commands::resolve_port;

#[test]
fn test_parse_serve_defaults() {
    let cli = Cli::try_parse_from(["saldo", "serve"]).unwrap();
    match cli.command {
        Commands::Serve { host, port } => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(port, None);
        }
        _ => panic!("expected serve command"),
    }
}

#[test]
fn test_parse_serve_with_port() {
    let cli = Cli::try_parse_from(["saldo", "serve", "--port", "8080"]).unwrap();
    match cli.command {
        Commands::Serve { port, .. } => assert_eq!(port, Some(8080)),
        _ => panic!("expected serve command"),
    }
}

#[test]
fn test_parse_extract() {
    let cli = Cli::try_parse_from([
        "saldo",
        "extract",
        "--file",
        "statement.xlsx",
        "--cuotas",
        "3",
        "--no-advice",
    ])
    .unwrap();
    match cli.command {
        Commands::Extract {
            file,
            cuotas,
            no_advice,
        } => {
            assert_eq!(file, PathBuf::from("statement.xlsx"));
            assert_eq!(cuotas, "3");
            assert!(no_advice);
        }
        _ => panic!("expected extract command"),
    }
}

#[test]
fn test_extract_requires_file() {
    assert!(Cli::try_parse_from(["saldo", "extract"]).is_err());
}

#[test]
fn test_resolve_port_prefers_flag() {
    assert_eq!(resolve_port(Some(8080)).unwrap(), 8080);
}
