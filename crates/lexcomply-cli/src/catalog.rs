//! # Entities Subcommand
//!
//! Lists every entity kind with its fields, so callers know which names
//! `--set` accepts.

use anyhow::Result;
use clap::Args;
use lexcomply_core::registry;
use lexcomply_core::{EntityKind, EntitySchema, PaginationMode, Requirement};
use serde::Serialize;

use crate::output::{render_columns, render_json};
use crate::{parse_kind, GlobalOpts, EXIT_OK};

/// Arguments for `lexcomply entities`.
#[derive(Args, Debug)]
pub struct EntitiesArgs {
    /// Show the fields of one kind only.
    #[arg(value_parser = parse_kind)]
    pub kind: Option<EntityKind>,
}

#[derive(Debug, Serialize)]
pub struct FieldSummary {
    pub name: &'static str,
    pub api_name: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    pub required: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EntitySummary {
    pub kind: EntityKind,
    pub label: &'static str,
    pub paginated_on_server: bool,
    pub operations: Vec<&'static str>,
    pub upload: Option<&'static str>,
    pub fields: Vec<FieldSummary>,
}

impl EntitySummary {
    pub fn of(schema: &'static EntitySchema) -> Self {
        let ep = &schema.endpoints;
        let operations = [
            ("list", ep.list.is_some()),
            ("create", ep.create.is_some()),
            ("update", ep.update.is_some()),
            ("delete", ep.delete.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();

        Self {
            kind: schema.kind,
            label: schema.label,
            paginated_on_server: schema.pagination == PaginationMode::Server,
            operations,
            upload: schema.upload.map(|u| u.field),
            fields: schema
                .fields
                .iter()
                .map(|f| FieldSummary {
                    name: f.name,
                    api_name: f.api_name,
                    label: f.label,
                    kind: f.kind.name(),
                    required: match f.requirement {
                        Requirement::Always => "yes",
                        Requirement::OnCreate => "on create",
                        Requirement::Optional => "no",
                    },
                })
                .collect(),
        }
    }
}

/// Execute `lexcomply entities`.
pub fn run_entities(args: &EntitiesArgs, opts: &GlobalOpts) -> Result<u8> {
    let summaries: Vec<EntitySummary> = match args.kind {
        Some(kind) => vec![EntitySummary::of(registry::schema(kind))],
        None => registry::all_schemas().map(EntitySummary::of).collect(),
    };

    if opts.json {
        println!("{}", render_json(&summaries)?);
        return Ok(EXIT_OK);
    }

    for summary in &summaries {
        println!(
            "{} ({}): {}",
            summary.kind,
            summary.label,
            summary.operations.join(", ")
        );
        let header = ["field", "api name", "type", "required"].map(String::from);
        let rows: Vec<Vec<String>> = summary
            .fields
            .iter()
            .map(|f| {
                vec![
                    f.name.to_string(),
                    f.api_name.to_string(),
                    f.kind.to_string(),
                    f.required.to_string(),
                ]
            })
            .collect();
        println!("{}", render_columns(&header, &rows));
    }
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reflects_schema() {
        let act = EntitySummary::of(&registry::ACT);
        assert!(act.paginated_on_server);
        assert_eq!(act.operations, vec!["list", "create", "update", "delete"]);
        assert_eq!(act.upload, None);
        let ty = act.fields.iter().find(|f| f.name == "actType").unwrap();
        assert_eq!(ty.api_name, "type");
        assert_eq!(ty.required, "yes");

        let copy = EntitySummary::of(&registry::COMPLIANCE_COPY);
        assert_eq!(copy.operations, vec!["create"]);

        let doc = EntitySummary::of(&registry::DOCUMENT);
        assert_eq!(doc.upload, Some("file"));
    }
}
