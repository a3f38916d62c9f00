use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Raw phone fields, one per argument
    #[arg(required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NormalizedField {
    input: String,
    normalized: String,
    numbers: Vec<String>,
}

pub fn normalize(ctx: &Context<'_>, args: NormalizeArgs) -> Result<()> {
    let options = ctx
        .config
        .cleaner_options()
        .with_context(|| "build phone normalizer")?;
    let normalizer = options.normalizer;

    let fields: Vec<NormalizedField> = args
        .values
        .into_iter()
        .map(|input| {
            let numbers = normalizer.canonical_numbers(&input);
            NormalizedField {
                normalized: normalizer.format_numbers(&numbers),
                numbers: numbers.into_iter().map(String::from).collect(),
                input,
            }
        })
        .collect();

    if ctx.json {
        return print_json(&fields);
    }

    for field in fields {
        println!("{}", field.normalized);
    }
    Ok(())
}
