//! Text and JSON output for ledger views

use colored::Colorize;
use plantlog::help::LandingPage;
use plantlog::ledger::{BathIndicators, BendingSummary, LevellerDashboard, Listed};
use plantlog::model::{
    BathCampaign, Campaign, LevellerRecord, Location, Position, RollCampaign, RollMovement, Supplier,
};
use plantlog::overlay::PlotMarker;
use plantlog::Derived;
use serde::Serialize;

/// Where command results go.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print `value` as JSON, or the text produced by `text`.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text(value));
        }
        Ok(())
    }
}

pub fn days(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |d| d.to_string())
}

pub fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |r| format!("{r:.2}"))
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

fn heading(title: &str, count: usize) -> String {
    format!("\n{} ({})\n", title.bold(), count)
}

fn status(derived: &Derived, open: bool) -> String {
    if open {
        format!("{} {}d", "open".green(), days(derived.days))
    } else {
        format!("{} {}d", "closed".dimmed(), days(derived.days))
    }
}

pub fn rolls(title: &str, rows: &[Listed<RollMovement>]) -> String {
    let mut out = heading(title, rows.len());
    for row in rows {
        let r = &row.record;
        out.push_str(&format!(
            "  #{:<4} {:<8} {:<16} {} -> {:<10} {}  {}\n",
            row.position,
            r.code,
            r.location.as_str(),
            r.entry,
            or_dash(r.exit.as_str()),
            status(&row.derived, r.exit.is_empty()),
            r.note,
        ));
    }
    out
}

pub fn baths(title: &str, rows: &[Listed<BathCampaign>]) -> String {
    let mut out = heading(title, rows.len());
    for row in rows {
        let r = &row.record;
        out.push_str(&format!(
            "  #{:<4} {:<3} {} -> {}  {}d  titular {} ({} mm)  reserva {} ({} mm)  {}\n",
            row.position,
            r.campaign.as_str(),
            r.start,
            r.end,
            days(row.derived.days),
            or_dash(&r.titular.set_id),
            or_dash(&r.titular.diameter),
            or_dash(&r.reserve.set_id),
            or_dash(&r.reserve.diameter),
            r.notes,
        ));
    }
    out
}

pub fn levellers(title: &str, rows: &[Listed<LevellerRecord>]) -> String {
    let mut out = heading(title, rows.len());
    for row in rows {
        let r = &row.record;
        out.push_str(&format!(
            "  #{:<4} {:<8} {:<9} {} -> {:<10} {}  km {}  km/dia {}\n",
            row.position,
            r.code,
            r.position.as_str(),
            r.entry,
            or_dash(r.exit.as_str()),
            status(&row.derived, r.exit.is_empty()),
            or_dash(&r.exit_distance),
            rate(row.derived.rate),
        ));
    }
    out
}

pub fn markers(markers: &[PlotMarker]) -> String {
    let mut out = heading("Floor plan", markers.len());
    for marker in markers {
        out.push_str(&format!(
            "  {:<8} ({:>6.1}, {:>6.1})  {}\n",
            marker.label,
            marker.x,
            marker.y,
            marker.tooltip.replace('\n', " | "),
        ));
    }
    out
}

pub fn indicators(ind: &BathIndicators) -> String {
    let mean = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
    let mut out = format!(
        "\n{}\n  Campaigns: {}\n  Mean titular diameter: {}\n  Mean reserve diameter: {}\n",
        "Bath indicators".bold(),
        ind.campaigns,
        mean(ind.mean_titular_diameter),
        mean(ind.mean_reserve_diameter),
    );
    out.push_str("  Mean days in bath:\n");
    for (campaign, days) in &ind.mean_days_by_campaign {
        out.push_str(&format!("    {campaign:<4} {days:.1}\n"));
    }
    out
}

pub fn dashboard(dash: &LevellerDashboard) -> String {
    let mut out = format!(
        "\n{}\n  Records: {}\n  Total km: {:.1}\n  Positions: {}\n  Ranking:\n",
        "Tension leveller".bold(),
        dash.records,
        dash.total_km,
        dash.positions,
    );
    for (i, (code, km)) in dash.ranking.iter().enumerate() {
        out.push_str(&format!("    {}. {code:<8} {km:.0} km\n", i + 1));
    }
    out
}

pub fn bending(summary: &BendingSummary) -> String {
    let life = format!("{:.1}%", summary.life_used_pct);
    let life = if summary.life_used_pct >= 100.0 {
        life.red().to_string()
    } else {
        life
    };
    format!(
        "\n{} {}\n  Km total: {:.0} km\n  Days in operation: {}\n  Mean km increment: {}\n  Life used: {}\n",
        "Bending".bold(),
        summary.code,
        summary.last_km,
        summary.days_in_operation,
        summary
            .mean_km_increment
            .map_or_else(|| "-".to_string(), |m| format!("{m:.1}")),
        life,
    )
}

pub fn landing(page: &LandingPage) -> String {
    let mut out = page.to_string();
    out.push_str(&format!("\n## {}\n", "Valores aceitos".bold()));
    for (field, labels) in [
        ("Localização", Location::LABELS),
        ("Campanha (rolo)", RollCampaign::LABELS),
        ("Fornecedor", Supplier::LABELS),
        ("Campanha (banho)", Campaign::LABELS),
        ("Posição", Position::LABELS),
    ] {
        out.push_str(&format!("{field}: {}\n", labels.join(", ")));
    }
    out
}
