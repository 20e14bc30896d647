use crate::utils::config::SCHEMA_VERSION;

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Demostats Match Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  match_hash: string       - Content hash of the replay");
        println!("  map_name: string         - Map played");
        println!("  tick_rate: number        - Server ticks per second");
        println!("  round_count: number      - Rounds in the match");
        println!("  played_at: string?       - ISO 8601 match time");
        println!("  ingested_at: string?     - ISO 8601 store time");
        println!("  players: array           - One row per player");
        println!("    kills/deaths/assists/damage, opening, trade and clutch counts");
        println!("    duel, crosshair, AWP, flash and timing medians; role");
        println!("  rounds: array            - One row per (player, round)");
        println!("    flags: opening, trade, survived, traded, KAST, post-plant, clutch");
        println!("    buy_type: full | force | half | eco");
        println!("  weapons: array           - One row per (player, weapon)");
        println!("  duel_segments: array     - One row per (player, weapon bucket, distance bin)");
        println!("    distance_bin: 0-5m | 5-10m | 10-15m | 15-20m | 20-30m | 30m+ | unknown");
        println!("    duel_count, first_hit_count, first_hit_hs_count, medians");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Demostats v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Per-player, per-round and per-duel statistics from decoded replays.");
}
