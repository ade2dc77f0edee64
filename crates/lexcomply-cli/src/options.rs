//! # Options Subcommand
//!
//! Prints the `{value,label}` options a selector for the given kind shows,
//! e.g. `lexcomply options acts --search factories`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use lexcomply_core::registry;
use lexcomply_core::EntityKind;
use lexcomply_views::{Backend, OptionSelector};

use crate::output::{render_columns, render_json};
use crate::{parse_kind, GlobalOpts, EXIT_OK};

/// Arguments for `lexcomply options`.
#[derive(Args, Debug)]
pub struct OptionsArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: EntityKind,
    /// Type-ahead text; only labels containing it are shown.
    #[arg(long)]
    pub search: Option<String>,
}

/// Execute `lexcomply options`.
pub async fn run_options(args: &OptionsArgs, opts: &GlobalOpts) -> Result<u8> {
    let backend = opts.backend()?;
    run_options_with(backend, args, opts.json).await
}

pub async fn run_options_with(
    backend: Arc<dyn Backend>,
    args: &OptionsArgs,
    json: bool,
) -> Result<u8> {
    let schema = registry::schema(args.kind);
    let mut selector = OptionSelector::new(backend, schema);
    selector
        .load()
        .await
        .with_context(|| format!("failed to load {} options", schema.label))?;
    if let Some(search) = &args.search {
        selector.set_query(search.as_str());
    }

    let visible = selector.visible();
    if json {
        println!("{}", render_json(&visible)?);
    } else {
        let header = ["value", "label"].map(String::from);
        let rows: Vec<Vec<String>> = visible
            .iter()
            .map(|o| vec![o.value.clone(), o.label.clone()])
            .collect();
        print!("{}", render_columns(&header, &rows));
    }
    Ok(EXIT_OK)
}
