//! Tests for the prepare and config subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn cli_parse_prepare_multiple_files() {
    let cli = parse(&[
        "skufetch",
        "prepare",
        "data/skus.txt",
        "data/more.txt",
        "--chunk-size",
        "8000",
        "--base-url",
        "https://store.example.com/_v/catalog/",
    ]);
    match cli.command {
        CliCommand::Prepare {
            identifiers,
            overrides,
        } => {
            assert_eq!(
                identifiers,
                vec![PathBuf::from("data/skus.txt"), PathBuf::from("data/more.txt")]
            );
            assert_eq!(overrides.chunk_size, Some(8000));
            assert!(overrides.base_url.is_some());
        }
        _ => panic!("expected Prepare"),
    }
}

#[test]
fn cli_parse_prepare_requires_a_file() {
    assert!(Cli::try_parse_from(["skufetch", "prepare"]).is_err());
}

#[test]
fn cli_parse_config() {
    match parse(&["skufetch", "config"]).command {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}
