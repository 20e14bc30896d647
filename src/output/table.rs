//! Text rendering of reports and careers.
//!
//! Wilson intervals are derived here from stored counts. Segments with
//! fewer duels than the configured minimum carry a low-sample marker.

use super::schema::{MatchReport, PlayerDuelSegment, PlayerMatchStats};
use crate::aggregator::career::PlayerCareer;
use crate::aggregator::numeric::{wilson_interval, WILSON_Z_95};

const LOW_SAMPLE_MARK: &str = "low sample";

/// Render the scoreboard and FHHS table of one match
///
/// **Public** - used by the `show` command
///
/// # Arguments
/// * `report` - Stored or freshly aggregated report
/// * `low_sample_duels` - Segments below this duel count are flagged
pub fn render_match(report: &MatchReport, low_sample_duels: u32) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "  MATCH {}  {}  {} rounds @ {} tick",
        report.match_hash, report.map_name, report.round_count, report.tick_rate
    ));
    if let Some(date) = report.effective_date() {
        lines.push(format!("  Played: {}", date.format("%Y-%m-%d %H:%M UTC")));
    }
    lines.push(String::new());

    let mut players: Vec<&PlayerMatchStats> = report.players.iter().collect();
    players.sort_by(|a, b| b.kills.cmp(&a.kills).then(a.steam_id.cmp(&b.steam_id)));
    lines.extend(render_scoreboard(&players));

    for player in &players {
        let segments: Vec<&PlayerDuelSegment> = report.player_segments(player.steam_id).collect();
        if segments.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("  FIRST-HIT HEADSHOTS  {}", display_name(player)));
        lines.extend(render_segments(&segments, low_sample_duels));
    }

    lines.join("\n")
}

/// Render a player's cross-match summary
///
/// **Public** - used by the `player` command
pub fn render_career(career: &PlayerCareer, low_sample_duels: u32) -> String {
    let t = &career.totals;
    let mut lines = Vec::new();

    lines.push(format!(
        "  PLAYER {} ({})  {} matches",
        display_name(t),
        career.steam_id,
        career.matches
    ));
    if let (Some(first), Some(last)) = (career.first_played, career.last_played) {
        lines.push(format!("  Period: {} .. {}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d")));
    }
    lines.push(String::new());
    lines.extend(render_scoreboard(&[t]));
    lines.push(String::new());

    lines.push(format!(
        "  Openings {}/{}  Trades {}/{} (traded {})  Clutches {}/{}  Multi-kills 2K {} 3K {} 4K {} 5K {}",
        t.opening_kills,
        t.opening_deaths,
        t.trade_kills,
        t.trade_deaths,
        t.traded_deaths,
        t.clutch_wins,
        t.clutch_rounds,
        t.multi_kills[0],
        t.multi_kills[1],
        t.multi_kills[2],
        t.multi_kills[3]
    ));
    lines.push(format!(
        "  Duels {}W/{}L  hits-to-kill {:.1}  exposure {:.0}ms won / {:.0}ms lost  correction {:.1}° ({:.0}% under 2°)",
        t.duel_wins,
        t.duel_losses,
        t.median_hits_to_kill,
        t.median_win_exposure_ms,
        t.median_loss_exposure_ms,
        t.median_correction_deg,
        t.pct_correction_under_2
    ));
    lines.push(format!(
        "  Crosshair {:.1}° (pitch {:.1}°, yaw {:.1}°, {:.0}% under 5°) over {} sights",
        t.crosshair_median_deg,
        t.crosshair_median_pitch_deg,
        t.crosshair_median_yaw_deg,
        t.crosshair_pct_under_5,
        t.crosshair_samples
    ));
    lines.push(format!(
        "  AWP {} kills, {} deaths (dry {}, re-peek {}, isolated {})",
        t.awp_kills, t.awp_deaths, t.awp_deaths_dry, t.awp_deaths_repeek, t.awp_deaths_isolated
    ));
    lines.push(format!(
        "  Flashes {} blinds, {} enemies ({:.1}s blind), {} team, {} effective",
        t.flash_blinds, t.enemies_flashed, t.enemy_blind_secs, t.team_flashes, t.effective_flashes
    ));
    lines.push(format!(
        "  TTK {:.0}ms  TTD {:.0}ms  one-taps {}  counter-strafe {:.0}% of {} shots",
        t.median_ttk_ms, t.median_ttd_ms, t.one_taps, t.counter_strafe_pct, t.shots_fired
    ));

    if !career.segments.is_empty() {
        lines.push(String::new());
        lines.push("  FIRST-HIT HEADSHOTS".to_string());
        let segments: Vec<&PlayerDuelSegment> = career.segments.iter().collect();
        lines.extend(render_segments(&segments, low_sample_duels));
    }

    lines.join("\n")
}

fn render_scoreboard(players: &[&PlayerMatchStats]) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("  ┏━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━━━━┳━━━━━━━━┳━━━━━━━━┳━━━━━━━━┳━━━━━━━━━┓".to_string());
    lines.push(format!(
        "  ┃ {:<20} ┃ {:^11} ┃ {:^6} ┃ {:^6} ┃ {:^6} ┃ {:^7} ┃",
        "Player", "K/D/A", "ADR", "HS%", "KAST%", "Role"
    ));
    lines.push("  ┣━━━━━━━━━━━━━━━━━━━━━━╋━━━━━━━━━━━━━╋━━━━━━━━╋━━━━━━━━╋━━━━━━━━╋━━━━━━━━━┫".to_string());

    for p in players {
        lines.push(format!(
            "  ┃ {:<20} ┃ {:>11} ┃ {:>6.1} ┃ {:>6.1} ┃ {:>6.1} ┃ {:<7} ┃",
            truncate(&display_name(p), 20),
            format!("{}/{}/{}", p.kills, p.deaths, p.assists),
            p.adr(),
            p.hs_pct(),
            p.kast_pct(),
            p.role.to_string()
        ));
    }

    lines.push("  ┗━━━━━━━━━━━━━━━━━━━━━━┻━━━━━━━━━━━━━┻━━━━━━━━┻━━━━━━━━┻━━━━━━━━┻━━━━━━━━━┛".to_string());
    lines
}

/// One row per segment: duel counts, FHHS% and its 95% interval
pub fn render_segments(segments: &[&PlayerDuelSegment], low_sample_duels: u32) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "  {:<12} {:<8} {:>6} {:>6} {:>8} {:>17} {:>8}",
        "Weapon", "Range", "Duels", "Hits", "FHHS%", "95% CI", "Exposure"
    ));

    for s in segments {
        let fhhs = s
            .fhhs_pct()
            .map(|p| format!("{:.1}", p))
            .unwrap_or_else(|| "-".to_string());
        let mut row = format!(
            "  {:<12} {:<8} {:>6} {:>6} {:>8} {:>17} {:>6.0}ms",
            s.weapon_bucket.as_str(),
            s.distance_bin.as_str(),
            s.duel_count,
            s.first_hit_count,
            fhhs,
            format_interval(s.first_hit_hs_count, s.first_hit_count),
            s.median_exposure_ms
        );
        if is_low_sample(s, low_sample_duels) {
            row.push_str("  (");
            row.push_str(LOW_SAMPLE_MARK);
            row.push(')');
        }
        lines.push(row);
    }

    lines
}

/// Whether a segment has too few duels to read much into
pub fn is_low_sample(segment: &PlayerDuelSegment, low_sample_duels: u32) -> bool {
    segment.duel_count < low_sample_duels
}

/// Wilson 95% interval as "[lo%, hi%]", "-" without trials
pub fn format_interval(successes: u32, trials: u32) -> String {
    match wilson_interval(successes, trials, WILSON_Z_95) {
        Some((lo, hi)) => format!("[{:.1}%, {:.1}%]", lo * 100.0, hi * 100.0),
        None => "-".to_string(),
    }
}

fn display_name(stats: &PlayerMatchStats) -> String {
    if stats.name.is_empty() {
        stats.steam_id.to_string()
    } else {
        stats.name.clone()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width - 3).collect();
        format!("{}...", kept)
    }
}
