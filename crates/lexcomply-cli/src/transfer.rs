//! # Transfer and Copy Subcommands
//!
//! `transfer` runs both wizard steps in one go: the periodicity lookup
//! preselects the transfer type, `--type` overrides it. `copy` submits the
//! compliance copy dialog.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use lexcomply_core::TransferType;
use lexcomply_views::{Backend, Dialog, TransferWizard};

use crate::output::render_json;
use crate::{cli_dialog_options, GlobalOpts, EXIT_OK};

/// Arguments for `lexcomply transfer`.
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Compliance to transfer.
    pub compliance_id: String,
    /// Transfer type: one_time, due_date, event_based or ongoing. Defaults
    /// to the type implied by the compliance's periodicity.
    #[arg(long = "type")]
    pub transfer_type: Option<TransferType>,
    /// New due date (YYYY-MM-DD) for one_time and due_date transfers.
    #[arg(long)]
    pub due_date: Option<String>,
    /// Triggering event for event_based transfers.
    #[arg(long)]
    pub event_name: Option<String>,
    /// Periodicity of the triggering event.
    #[arg(long)]
    pub event_periodicity: Option<String>,
}

/// Arguments for `lexcomply copy`.
#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Compliance to copy.
    pub compliance_id: String,
    /// Target act id.
    #[arg(long)]
    pub act: String,
    /// Title for the copy.
    #[arg(long)]
    pub title: Option<String>,
    /// Target state id.
    #[arg(long)]
    pub state: Option<String>,
}

/// Execute `lexcomply transfer`.
pub async fn run_transfer(args: &TransferArgs, opts: &GlobalOpts) -> Result<u8> {
    let backend = opts.backend()?;
    run_transfer_with(backend, args, opts.json).await
}

pub async fn run_transfer_with(
    backend: Arc<dyn Backend>,
    args: &TransferArgs,
    json: bool,
) -> Result<u8> {
    let mut wizard = TransferWizard::new(backend).with_options(cli_dialog_options());
    wizard.set_compliance_id(args.compliance_id.as_str())?;
    let preselected = wizard
        .lookup()
        .await
        .with_context(|| format!("failed to look up compliance {}", args.compliance_id))?;
    tracing::info!(
        periodicity = wizard.periodicity().unwrap_or_default(),
        ?preselected,
        "compliance periodicity"
    );

    if let Some(t) = args.transfer_type {
        wizard.select_type(t)?;
    }
    if let Some(date) = &args.due_date {
        wizard.set_due_date(date.as_str())?;
    }
    if let Some(name) = &args.event_name {
        wizard.set_event_name(name.as_str())?;
    }
    if let Some(periodicity) = &args.event_periodicity {
        wizard.set_event_periodicity(periodicity.as_str())?;
    }

    let response = wizard
        .submit()
        .await
        .with_context(|| format!("compliance {} was not transferred", args.compliance_id))?;
    if json {
        println!("{}", render_json(&response)?);
    } else if let Some(notice) = wizard.notice() {
        println!("{}", notice.message);
    }
    Ok(EXIT_OK)
}

/// Execute `lexcomply copy`.
pub async fn run_copy(args: &CopyArgs, opts: &GlobalOpts) -> Result<u8> {
    let backend = opts.backend()?;
    run_copy_with(backend, args, opts.json).await
}

pub async fn run_copy_with(backend: Arc<dyn Backend>, args: &CopyArgs, json: bool) -> Result<u8> {
    let mut dialog = Dialog::copy_compliance(backend, &args.compliance_id)?
        .with_options(cli_dialog_options());
    dialog.set("actId", args.act.as_str())?;
    if let Some(title) = &args.title {
        dialog.set("title", title.as_str())?;
    }
    if let Some(state) = &args.state {
        dialog.set("stateId", state.as_str())?;
    }

    let response = dialog
        .submit()
        .await
        .with_context(|| format!("compliance {} was not copied", args.compliance_id))?;
    if json {
        println!("{}", render_json(&response)?);
    } else if let Some(notice) = dialog.notice() {
        println!("{}", notice.message);
    }
    Ok(EXIT_OK)
}
