//! Host command handlers.

use tabled::Tabled;

use purehost_core::{ArraySession, Host, HostSpec};

use crate::cli::{GlobalOpts, HostsArgs, HostsCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

const MASK: &str = "****";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IQN")]
    iqn: String,
    #[tabled(rename = "WWN")]
    wwn: String,
    #[tabled(rename = "NQN")]
    nqn: String,
    #[tabled(rename = "Host Group")]
    hgroup: String,
}

impl From<&Host> for HostRow {
    fn from(h: &Host) -> Self {
        Self {
            name: h.name.clone(),
            iqn: h.iqn.join(", "),
            wwn: h.wwn.join(", "),
            nqn: h.nqn.join(", "),
            hgroup: h.hgroup.clone().unwrap_or_default(),
        }
    }
}

fn list_or_dash(list: Option<&Vec<String>>) -> String {
    match list {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => "-".into(),
    }
}

fn detail(h: &HostSpec) -> String {
    let mut lines = vec![
        format!("Name:            {}", h.name),
        format!("IQN:             {}", list_or_dash(h.iqn.as_ref())),
        format!("WWN:             {}", list_or_dash(h.wwn.as_ref())),
        format!("NQN:             {}", list_or_dash(h.nqn.as_ref())),
        format!("Preferred Array: {}", list_or_dash(h.preferred_array.as_ref())),
        format!(
            "Personality:     {}",
            h.personality
                .map_or_else(|| "-".into(), |p| p.to_string())
        ),
        format!("Host Group:      {}", h.hgroup.as_deref().unwrap_or("-")),
        format!("Volumes:         {}", list_or_dash(h.connected_volumes.as_ref())),
    ];
    // Observed state reports unset CHAP users as empty strings.
    let host_user = non_blank(h.host_user.as_deref());
    let target_user = non_blank(h.target_user.as_deref());
    if host_user.is_some() || target_user.is_some() {
        lines.push(format!("CHAP Host:       {}", host_user.unwrap_or("-")));
        lines.push(format!("CHAP Target:     {}", target_user.unwrap_or("-")));
    }
    lines.join("\n")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Replace CHAP secrets before anything is printed.
fn redact(mut spec: HostSpec) -> HostSpec {
    for secret in [&mut spec.host_password, &mut spec.target_password] {
        if secret.as_deref().is_some_and(|s| !s.is_empty()) {
            *secret = Some(MASK.into());
        }
    }
    spec
}

fn print_spec(spec: HostSpec, global: &GlobalOpts) -> Result<(), CliError> {
    let spec = redact(spec);
    let out = output::render_single(&global.output, &spec, detail, |h| h.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &ArraySession,
    args: HostsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let hosts = session.hosts();

    match args.command {
        HostsCommand::List => {
            let all = session.list_hosts().await?;
            let out = output::render_list(
                &global.output,
                &all,
                |h| HostRow::from(h),
                |h| h.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HostsCommand::Show { name } => {
            let spec = hosts
                .read(&name)
                .await?
                .ok_or_else(|| CliError::host_not_found(&name))?;
            print_spec(spec, global)
        }

        // Import emits a reusable spec, so the table view falls back to YAML.
        HostsCommand::Import { name } => {
            let spec = redact(hosts.import(&name).await?);
            let out = match global.output {
                OutputFormat::Table => serde_yaml::to_string(&spec)?,
                ref format => {
                    output::render_single(format, &spec, detail, |h| h.name.clone())?
                }
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        HostsCommand::Apply { file, id } => {
            let desired = util::read_spec_file(&file)?;
            let id = id.unwrap_or_else(|| desired.name.clone());

            let (verb, converged) = match hosts.read(&id).await? {
                Some(previous) => {
                    let state = hosts
                        .update(&id, &previous, &desired)
                        .await
                        .map_err(|e| CliError::from_reconcile("update", e))?;
                    ("updated", state)
                }
                None => {
                    let state = hosts
                        .create(&desired)
                        .await
                        .map_err(|e| CliError::from_reconcile("create", e))?;
                    ("created", state)
                }
            };

            output::print_status(
                &output::status_line(&global.color, verb, &format!("host {}", converged.name)),
                global.quiet,
            );
            print_spec(converged, global)
        }

        HostsCommand::Delete { name } => {
            let current = hosts
                .read(&name)
                .await?
                .ok_or_else(|| CliError::host_not_found(&name))?;
            let volumes = current.connected_volumes.unwrap_or_default();

            let prompt = if volumes.is_empty() {
                format!("Delete host {name}?")
            } else {
                format!(
                    "Disconnect {} volume(s) and delete host {name}?",
                    volumes.len()
                )
            };
            if !util::confirm("delete host", &prompt, global.yes)? {
                return Ok(());
            }

            hosts
                .delete(&name, &volumes)
                .await
                .map_err(|e| CliError::from_reconcile("delete", e))?;
            output::print_status(
                &output::status_line(&global.color, "deleted", &format!("host {name}")),
                global.quiet,
            );
            Ok(())
        }
    }
}
