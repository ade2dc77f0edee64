//! # Record Subcommands
//!
//! `list`, `create`, `update` and `delete` for any entity kind. Lists go
//! through [`ListView`] and writes through [`Dialog`], so paging, field
//! mapping, validation and upload cleanup match the admin panel.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use lexcomply_client::SortOrder;
use lexcomply_core::registry;
use lexcomply_core::{EntityKind, FileUpload};
use lexcomply_views::{Backend, Dialog, ListSettings, ListView};
use serde_json::Value;

use crate::output::{render_json, render_records};
use crate::{cli_dialog_options, parse_assignment, parse_kind, GlobalOpts, EXIT_OK};

/// Page size used to find a record for `update`.
const LOOKUP_PAGE_SIZE: usize = 1000;

/// Arguments for `lexcomply list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Entity kind (e.g. `acts`, `states`, `news`).
    #[arg(value_parser = parse_kind)]
    pub kind: EntityKind,
    /// Case-insensitive search text.
    #[arg(long)]
    pub search: Option<String>,
    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows per page.
    #[arg(long, default_value_t = lexcomply_views::DEFAULT_PAGE_SIZE)]
    pub limit: usize,
    /// Field to sort by (UI name, see `lexcomply entities`).
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending.
    #[arg(long, requires = "sort")]
    pub desc: bool,
    /// Selector value for per-parent lists (act id for compliances, event
    /// id for event compliances).
    #[arg(long)]
    pub parent: Option<String>,
}

/// Arguments for `lexcomply create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: EntityKind,
    /// Field assignment, repeatable: `--set name="Factories Act"`.
    #[arg(long = "set", value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,
    /// File for the entity's upload field.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Arguments for `lexcomply update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: EntityKind,
    /// Identifier of the record to edit.
    pub id: String,
    #[arg(long = "set", value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,
    /// Replacement file for the entity's upload field.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Selector value needed to find the record in per-parent lists.
    #[arg(long)]
    pub parent: Option<String>,
}

/// Arguments for `lexcomply delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: EntityKind,
    pub id: String,
}

/// Execute `lexcomply list`.
pub async fn run_list(args: &ListArgs, opts: &GlobalOpts) -> Result<u8> {
    let backend = opts.backend()?;
    run_list_with(backend, args, opts.json).await
}

pub async fn run_list_with(backend: Arc<dyn Backend>, args: &ListArgs, json: bool) -> Result<u8> {
    let schema = registry::schema(args.kind);
    if schema.endpoints.list.is_none() {
        bail!("{} cannot be listed", schema.label);
    }
    if schema.endpoints.parent_param.is_some() && args.parent.is_none() {
        bail!("listing {} needs --parent", schema.label);
    }

    let order = if args.desc { SortOrder::Desc } else { SortOrder::Asc };
    let mut view = ListView::new(backend, schema).with_settings(ListSettings {
        parent: args.parent.clone(),
        filter: args.search.clone().unwrap_or_default(),
        sort: args.sort.clone().map(|field| (field, order)),
        page: args.page.saturating_sub(1),
        page_size: args.limit,
    })?;
    view.refresh()
        .await
        .with_context(|| format!("failed to list {}", schema.label))?;

    let rows = view.visible_rows();
    if json {
        println!("{}", render_json(&rows)?);
    } else {
        print!("{}", render_records(schema, &rows));
        println!(
            "page {} of {} ({} rows)",
            view.page() + 1,
            view.page_count().max(1),
            view.matching_count()
        );
    }
    Ok(EXIT_OK)
}

/// Execute `lexcomply create`.
pub async fn run_create(args: &CreateArgs, opts: &GlobalOpts) -> Result<u8> {
    let backend = opts.backend()?;
    run_create_with(backend, args, opts.json).await
}

pub async fn run_create_with(
    backend: Arc<dyn Backend>,
    args: &CreateArgs,
    json: bool,
) -> Result<u8> {
    let schema = registry::schema(args.kind);
    let dialog = Dialog::create(backend, schema).with_options(cli_dialog_options());
    submit(dialog, &args.assignments, args.file.as_deref(), json).await
}

/// Execute `lexcomply update`.
pub async fn run_update(args: &UpdateArgs, opts: &GlobalOpts) -> Result<u8> {
    let backend = opts.backend()?;
    run_update_with(backend, args, opts.json).await
}

pub async fn run_update_with(
    backend: Arc<dyn Backend>,
    args: &UpdateArgs,
    json: bool,
) -> Result<u8> {
    let schema = registry::schema(args.kind);
    if schema.endpoints.parent_param.is_some() && args.parent.is_none() {
        bail!("updating {} needs --parent", schema.label);
    }
    let mut view = ListView::new(backend, schema).with_settings(ListSettings {
        parent: args.parent.clone(),
        page_size: LOOKUP_PAGE_SIZE,
        ..ListSettings::default()
    })?;
    view.refresh()
        .await
        .with_context(|| format!("failed to load {} {}", schema.label, args.id))?;

    let dialog = view
        .edit_dialog(&args.id)?
        .with_options(cli_dialog_options());
    submit(dialog, &args.assignments, args.file.as_deref(), json).await
}

async fn submit(
    mut dialog: Dialog,
    assignments: &[(String, String)],
    file: Option<&std::path::Path>,
    json: bool,
) -> Result<u8> {
    for (field, value) in assignments {
        dialog.set(field, value.as_str())?;
    }
    if let Some(path) = file {
        let upload =
            FileUpload::read(path).with_context(|| format!("cannot read {}", path.display()))?;
        dialog.attach_file(upload)?;
    }

    let label = dialog.schema().label;
    let response = dialog
        .submit()
        .await
        .with_context(|| format!("{label} was not saved"))?;
    print_outcome(&dialog, &response, json)?;
    Ok(EXIT_OK)
}

fn print_outcome(dialog: &Dialog, response: &Value, json: bool) -> Result<()> {
    if json {
        println!("{}", render_json(response)?);
    } else if let Some(notice) = dialog.notice() {
        println!("{}", notice.message);
    }
    Ok(())
}

/// Execute `lexcomply delete`.
pub async fn run_delete(args: &DeleteArgs, opts: &GlobalOpts) -> Result<u8> {
    let backend = opts.backend()?;
    run_delete_with(backend, args, opts.json).await
}

pub async fn run_delete_with(
    backend: Arc<dyn Backend>,
    args: &DeleteArgs,
    json: bool,
) -> Result<u8> {
    let schema = registry::schema(args.kind);
    backend
        .delete(schema, &args.id)
        .await
        .with_context(|| format!("failed to delete {} {}", schema.label, args.id))?;
    if json {
        println!("{}", render_json(&serde_json::json!({"deleted": args.id}))?);
    } else {
        println!("{} {} deleted", schema.label, args.id);
    }
    Ok(EXIT_OK)
}
