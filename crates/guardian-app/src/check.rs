//! The `check` use case: evaluate every node and produce a scan report.

use crate::context::GuardianContext;
use anyhow::Context;
use guardian_domain::ComplianceRunner;
use guardian_settings::{FailOn, ResolvedConfig};
use guardian_types::{ScanData, ScanReport, ToolMeta, Verdict, SCHEMA_SCAN_V1};
use time::OffsetDateTime;

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ScanReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run every node, open advisories for failures, and wrap the outcome in a report.
pub fn run_check(ctx: &GuardianContext) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let outcome = ComplianceRunner::new(&ctx.storage.nodes, &ctx.storage.advisories, ctx.evaluator())
        .parallel(ctx.config.parallel)
        .run_all()
        .context("run compliance checks")?;

    let finished_at = OffsetDateTime::now_utc();
    let verdict = if outcome.all_ok() {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    let data = ScanData::from_results(&outcome.results, &outcome.advisories_created);

    let report = ScanReport {
        schema: SCHEMA_SCAN_V1.to_string(),
        tool: ToolMeta {
            name: "guardian".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict,
        results: outcome.results,
        advisories: outcome.advisories_created,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: ctx.config.clone(),
    })
}

/// Map verdict to exit code: 0 = pass, 2 = fail (unless `fail_on = "never"`).
pub fn verdict_exit_code(verdict: Verdict, fail_on: FailOn) -> i32 {
    match (verdict, fail_on) {
        (Verdict::Pass, _) => 0,
        (Verdict::Fail, FailOn::Never) => 0,
        (Verdict::Fail, FailOn::Advisory) => 2,
    }
}
