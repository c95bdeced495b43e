// src/bin/rolecheck.rs

use anyhow::Context;
use clap::{Parser, Subcommand};
use rolecheck::{
    configs::initializer::{setup_rolecheck_logging, OutputFormat, RolecheckConfig},
    error::AccessError,
    policy::default_permissions,
    registry::PermissionTable,
    request::{check_permission_dynamic, AccessRequest, RequestUser},
};
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const EXIT_ALLOWED: u8 = 0;
const EXIT_DENIED: u8 = 1;
const EXIT_INVALID: u8 = 2;

#[derive(Parser)]
#[command(name = "rolecheck")]
#[command(about = "Evaluate role-based permission checks against the built-in policy")]
#[command(version)]
struct Cli {
    /// Output format (table, json); defaults to ROLECHECK_OUTPUT
    #[arg(short, long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a user may perform an action on a model
    Check {
        /// JSON file holding a full request: model, action, user, data
        #[arg(short, long, conflicts_with_all = ["model", "action", "user", "data"])]
        request: Option<PathBuf>,
        /// Model name (post, comment)
        #[arg(short, long, required_unless_present = "request")]
        model: Option<String>,
        /// Action name (view, create, update, delete)
        #[arg(short, long, required_unless_present = "request")]
        action: Option<String>,
        /// JSON file holding the user
        #[arg(short, long, required_unless_present = "request")]
        user: Option<PathBuf>,
        /// JSON file holding the resource instance, if one exists
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Print the built-in permission table
    Table,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::from(EXIT_INVALID)
        }
    }
}

fn run() -> anyhow::Result<u8> {
    let cli = Cli::parse();
    let config = RolecheckConfig::from_env()?;
    setup_rolecheck_logging(&config);

    let format = match &cli.format {
        Some(raw) => raw.parse::<OutputFormat>()?,
        None => config.output,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Check { request, model, action, user, data } => {
            let request = match request {
                Some(path) => AccessRequest::from_file(path)?,
                None => AccessRequest {
                    model: model.unwrap_or_default(),
                    action: action.unwrap_or_default(),
                    user: read_json::<RequestUser>(
                        user.as_deref().context("--user is required")?,
                    )?,
                    data: data.as_deref().map(read_json::<Value>).transpose()?,
                },
            };
            check(default_permissions(), &request, format, &mut out)
        }
        Commands::Table => {
            render_table(default_permissions(), format, &mut out)?;
            Ok(EXIT_ALLOWED)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// 0 when allowed, 1 when denied, 2 when the request itself is invalid.
fn exit_code(decision: &Result<bool, AccessError>) -> u8 {
    match decision {
        Ok(true) => EXIT_ALLOWED,
        Ok(false) => EXIT_DENIED,
        Err(_) => EXIT_INVALID,
    }
}

fn check<W: Write>(
    table: &PermissionTable,
    request: &AccessRequest,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<u8> {
    let decision = check_permission_dynamic(table, request);

    match (&decision, format) {
        (Ok(allowed), OutputFormat::Json) => {
            let body = json!({
                "model": request.model,
                "action": request.action,
                "user": request.user.id,
                "allowed": allowed,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        }
        (Ok(allowed), OutputFormat::Table) => {
            writeln!(out, "{}", if *allowed { "allowed" } else { "denied" })?;
        }
        (Err(e), OutputFormat::Json) => {
            let body = json!({ "error": e.to_string() });
            writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
        }
        (Err(e), OutputFormat::Table) => {
            eprintln!("❌ {}", e);
        }
    }

    Ok(exit_code(&decision))
}

fn table_json(table: &PermissionTable) -> Value {
    let mut roles = serde_json::Map::new();
    for role in table.roles() {
        let mut models = serde_json::Map::new();
        for model in table.models_for(role) {
            let actions: serde_json::Map<String, Value> = table
                .actions_for(role, model)
                .into_iter()
                .map(|(action, kind)| (action.to_string(), json!(kind)))
                .collect();
            models.insert(model.to_string(), Value::Object(actions));
        }
        roles.insert(role.to_string(), Value::Object(models));
    }
    Value::Object(roles)
}

fn render_table<W: Write>(
    table: &PermissionTable,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&table_json(table))?)?;
        }
        OutputFormat::Table => {
            writeln!(out, "{:<12} {:<10} {:<10} {:<12}", "Role", "Model", "Action", "Rule")?;
            writeln!(out, "{}", "-".repeat(46))?;

            for role in table.roles() {
                let models = table.models_for(role);
                if models.is_empty() {
                    writeln!(
                        out,
                        "{:<12} {:<10} {:<10} {:<12}",
                        role.as_str(),
                        "-",
                        "-",
                        "(none)"
                    )?;
                }
                for model in models {
                    for (action, kind) in table.actions_for(role, model) {
                        writeln!(
                            out,
                            "{:<12} {:<10} {:<10} {:<12}",
                            role.as_str(),
                            model.as_str(),
                            action.as_str(),
                            kind.as_str()
                        )?;
                    }
                }
            }
        }
    }

    Ok(())
}
