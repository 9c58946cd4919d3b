//! `audit` command: submit, run, and print a report.

use brandaudit_core::{AppConfig, AuditStatus};
use brandaudit_pipeline::{
    load_audit_report, submit_audit, AuditOrchestrator, AuditReport, InMemoryStore,
    PipelineSettings,
};

use crate::source::build_profile_source;

/// Run a complete audit for `handle` against an in-memory store.
///
/// # Errors
///
/// Returns an error for an invalid handle or if the report cannot be
/// assembled. A failed run is printed, then reported as an error so the
/// process exits non-zero.
pub(crate) async fn run_audit_command(
    config: &AppConfig,
    handle: &str,
    language: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let source = build_profile_source(config);
    let store = InMemoryStore::new();
    let language = language.unwrap_or(config.language.as_str());

    let audit = submit_audit(&store, handle, language).await?;
    let settings = PipelineSettings::from_app_config(config);
    let orchestrator = AuditOrchestrator::new(source.as_ref(), &store, settings);
    let finished = orchestrator.run_audit(audit.id).await?;
    let report = load_audit_report(&store, audit.id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if finished.status == AuditStatus::Failed {
        anyhow::bail!(
            "audit {} failed: {}",
            finished.id,
            finished.error_message.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn print_report(report: &AuditReport) {
    let handle = report.brand.as_ref().map_or("?", |b| b.handle.as_str());
    println!("# Brand Audit: @{handle}");
    println!();
    println!("**Audit**: {}", report.id);
    println!("**Status**: {} ({}%)", report.status, report.progress);
    if let Some(error) = &report.error_message {
        println!("**Error**: {error}");
    }
    println!("**Health score**: {}", fmt_opt(report.health_score));
    if let Some(brand) = &report.brand {
        println!("**Followers**: {}", fmt_opt(brand.followers_count));
    }
    if let Some(summary) = &report.executive_summary {
        println!();
        println!("{summary}");
    }
    println!();

    if report.influencers.is_empty() {
        println!("no influencers linked");
        return;
    }

    let header = format!(
        "{:<26}{:<18}{:>10}{:>9}{:>7}{:>9}{:>9}{:>10}{:>8}",
        "HANDLE", "SOURCE", "FOLLOWERS", "ER", "FRAUD", "CONTENT", "AUDIENCE", "REACH", "CPM"
    );
    println!("{header}");
    for i in &report.influencers {
        println!(
            "{:<26}{:<18}{:>10}{:>9}{:>7}{:>9}{:>9}{:>10}{:>8}",
            i.handle,
            i.discovery_source.as_str(),
            fmt_opt(i.followers_count),
            fmt_opt(i.engagement_rate.map(|r| format!("{:.2}%", r * 100.0))),
            fmt_opt(i.fraud_score.map(|s| format!("{s:.2}"))),
            fmt_opt(i.content_quality_score.map(|s| format!("{s:.2}"))),
            fmt_opt(i.audience_quality_score.map(|s| format!("{s:.2}"))),
            fmt_opt(i.estimated_reach),
            fmt_opt(i.estimated_cpm.map(|c| format!("{c:.2}"))),
        );
    }

    if !report.audience_overlaps.is_empty() {
        let mut overlaps: Vec<_> = report.audience_overlaps.iter().collect();
        overlaps.sort_by(|a, b| b.overlap_percentage.total_cmp(&a.overlap_percentage));
        println!();
        println!("Top audience overlaps:");
        for o in overlaps.iter().take(5) {
            println!(
                "  @{} / @{}: {:.1}%",
                o.influencer_a_handle, o.influencer_b_handle, o.overlap_percentage
            );
        }
    }

    if !report.recommendations.is_empty() {
        println!();
        println!("Recommendations:");
        for r in &report.recommendations {
            println!("  - {r}");
        }
    }
}
