// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text or JSON rendering of command results

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print one value: its Display form, or pretty JSON
pub fn print<T: Serialize + Display>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{value}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Print rows one per line, or as a single JSON array
pub fn print_list<T: Serialize + Display>(items: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => items.iter().for_each(|item| println!("{item}")),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}
