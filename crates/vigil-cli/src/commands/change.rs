use anyhow::{Context, bail};
use chrono::Utc;
use serde_json::json;
use vigil_core::commands::EngineCommand;
use vigil_core::entities::DetectedChange;
use vigil_core::enums::{ChangeScope, ChangeStatus, LifecycleEvent};
use vigil_core::ids::PREFIX_CHANGE;
use vigil_evidence::{horizon_chips, resolve_lifecycle_transition};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ChangeCommands;
use crate::commands::parse::{parse_enum, parse_instant};
use crate::context::AppContext;
use crate::output::output;

/// Handle `vigil change`.
pub async fn handle(
    action: &ChangeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ChangeCommands::Add {
            page,
            element,
            scope,
            before,
            after,
            description,
            detected_at,
        } => {
            let scope: ChangeScope = parse_enum(scope, "scope")?;
            let detected_at = parse_instant(detected_at.as_deref(), "detected-at")?;
            let change = DetectedChange {
                id: ctx.service.db().generate_id(PREFIX_CHANGE).await?,
                page: page.clone(),
                element: element.clone(),
                scope,
                before: before.clone(),
                after: after.clone(),
                description: description.clone(),
                status: ChangeStatus::Watching,
                first_detected_at: detected_at,
                last_seen_at: detected_at,
                updated_at: Utc::now(),
            };
            ctx.service
                .apply_commands(vec![EngineCommand::InsertChange {
                    change: change.clone(),
                }])
                .await?;
            output(&change, flags.format)
        }
        ChangeCommands::Get { id } => {
            let db = ctx.service.db();
            let change = db
                .get_change(id)
                .await
                .with_context(|| format!("change '{id}' not found"))?;
            let checkpoints = db.list_checkpoints(id).await?;
            let chips = horizon_chips(&checkpoints);
            output(
                &json!({
                    "change": change,
                    "checkpoints": checkpoints,
                    "chips": chips,
                }),
                flags.format,
            )
        }
        ChangeCommands::List { status } => {
            let db = ctx.service.db();
            let changes = match status {
                Some(raw) => {
                    db.list_changes_by_status(parse_enum(raw, "status")?)
                        .await?
                }
                None => db.list_changes().await?,
            };
            output(&changes, flags.format)
        }
        ChangeCommands::Revert { id } => {
            apply_lifecycle(id, LifecycleEvent::Reverted, ctx, flags).await
        }
        ChangeCommands::Supersede { id } => {
            apply_lifecycle(id, LifecycleEvent::Superseded, ctx, flags).await
        }
    }
}

async fn apply_lifecycle(
    id: &str,
    event: LifecycleEvent,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let change = ctx
        .service
        .db()
        .get_change(id)
        .await
        .with_context(|| format!("change '{id}' not found"))?;

    let Some(transition) = resolve_lifecycle_transition(change.status, event) else {
        bail!("change '{id}' is already {}; its status is final", change.status);
    };

    let records = ctx
        .service
        .apply_commands(vec![EngineCommand::ApplyTransition {
            change_id: change.id.clone(),
            from: change.status,
            transition: transition.clone(),
        }])
        .await?;
    let applied = records.iter().any(|r| r.applied);

    output(
        &json!({
            "change_id": change.id,
            "from": change.status,
            "transition": transition,
            "applied": applied,
        }),
        flags.format,
    )
}
