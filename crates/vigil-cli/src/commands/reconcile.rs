use std::io::Read;

use anyhow::{Context, bail};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use vigil_core::entities::{DetectedChange, MatchCandidate};
use vigil_core::ids::PREFIX_CHANGE;
use vigil_llm::{ReconcileContext, candidate_window, parse_audit_response, reconcile};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReconcileArgs;
use crate::context::AppContext;
use crate::output::output;

/// Candidate sets accepted by `--candidates`: the full `vigil candidates`
/// output or just its array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PresentedCandidates {
    Listing { candidates: Vec<MatchCandidate> },
    Bare(Vec<MatchCandidate>),
}

impl PresentedCandidates {
    fn into_vec(self) -> Vec<MatchCandidate> {
        match self {
            Self::Listing { candidates } | Self::Bare(candidates) => candidates,
        }
    }
}

/// Handle `vigil reconcile`.
///
/// Proposals are gated against the candidate set passed with `--candidates`.
/// Without it the window is rebuilt from current state, which only matches
/// what the LLM saw if nothing was tracked in between.
pub async fn handle(
    args: &ReconcileArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if args.input == "-" && args.candidates.as_deref() == Some("-") {
        bail!("the audit response and the candidate set cannot both be read from stdin");
    }

    let raw = read_input(&args.input, "audit response")?;
    let audit = parse_audit_response(&raw).context("failed to parse LLM audit response")?;

    let db = ctx.service.db();
    let tracked = db.list_changes().await?;
    let presented = match &args.candidates {
        Some(path) => load_presented(path, &tracked)?,
        None => candidate_window(&tracked, ctx.config.evidence.max_match_candidates),
    };
    let fresh_ids = db.generate_ids(PREFIX_CHANGE, audit.changes.len()).await?;

    let reconciliation = reconcile(
        &audit.changes,
        &fresh_ids,
        &presented,
        &tracked,
        ReconcileContext {
            page: &args.page,
            seen_at: Utc::now(),
        },
    )?;

    let records = ctx.service.apply_commands(reconciliation.commands).await?;
    let applied = records.iter().filter(|r| r.applied).count();

    output(
        &json!({
            "page": args.page,
            "outcomes": reconciliation.outcomes,
            "commands_applied": applied,
        }),
        flags.format,
    )
}

/// Read a presented candidate set, dropping ids that are not tracked here.
fn load_presented(path: &str, tracked: &[DetectedChange]) -> anyhow::Result<Vec<MatchCandidate>> {
    let raw = read_input(path, "candidate set")?;
    let presented: PresentedCandidates = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse candidate set from {path}"))?;

    let (known, unknown): (Vec<_>, Vec<_>) = presented
        .into_vec()
        .into_iter()
        .partition(|candidate| tracked.iter().any(|t| t.id == candidate.id));
    for candidate in &unknown {
        tracing::warn!(id = %candidate.id, "presented candidate is not a tracked change; ignoring");
    }
    Ok(known)
}

fn read_input(input: &str, what: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .with_context(|| format!("failed to read {what} from stdin"))?;
        return Ok(raw);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {what} from {input}"))
}
