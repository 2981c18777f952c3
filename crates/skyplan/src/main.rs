//! `skyplan` - CLI for flight planning and pilot currency tracking.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use chrono::{NaiveDate, Utc};
use clap::Parser;

use skyplan::aircraft::{self, AircraftProfile};
use skyplan::airports;
use skyplan::cli::{
    Cli, Command, ConfigCommand, ExportFormat, LogbookCommand, RangeCommand, RouteCommand,
    SyncCommand, TripCommand, WbCommand, WindCommand,
};
use skyplan::currency::{evaluate_currencies, NEVER_ESTABLISHED};
use skyplan::export::{generate_fpl, generate_gpx, generate_json, GpxOptions};
use skyplan::logbook::{self, LogbookEntry};
use skyplan::planning::{
    calculate_range, calculate_weight_balance, solve_wind_triangle, RangeInputs, StationLoads,
    TripEstimator, TripOptions,
};
use skyplan::sync::{ConflictResolver, ResolverState};
use skyplan::{init_logging, Config, Route, Storage};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Range(cmd) => handle_range(&config, &cmd),
        Command::Trip(cmd) => handle_trip(&config, &cmd),
        Command::Wb(cmd) => handle_wb(&config, &cmd),
        Command::Wind(cmd) => handle_wind(&cmd),
        Command::Currency(cmd) => handle_currency(&config, cmd.json),
        Command::Logbook(cmd) => handle_logbook(&config, &cmd),
        Command::Route(cmd) => handle_route(&config, &cmd),
        Command::Sync(cmd) => handle_sync(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    Storage::open(config.database_path()).context("opening local database")
}

fn load_profile(name: &str) -> anyhow::Result<AircraftProfile> {
    aircraft::find_profile(name)
        .with_context(|| format!("no aircraft profile matching '{name}'"))
}

/// Build a route from ICAO identifiers using the built-in airport registry.
fn route_from_icaos(name: &str, icaos: &[String]) -> anyhow::Result<Route> {
    let mut route = Route::new(name);
    for icao in icaos {
        let Some(airport) = airports::find_builtin(icao) else {
            bail!("unknown airport '{icao}': only the built-in airports are available offline");
        };
        route.push(airport.into())?;
    }
    Ok(route)
}

fn handle_range(config: &Config, cmd: &RangeCommand) -> anyhow::Result<()> {
    let profile = load_profile(&cmd.aircraft)?;

    let mut inputs = RangeInputs::from_profile(
        &profile,
        cmd.fuel_percent,
        cmd.unusable.unwrap_or(config.flight.default_unusable_fuel_gal),
    );
    if let Some(capacity) = cmd.fuel_capacity {
        inputs.fuel_capacity_gal = capacity;
    }
    if let Some(burn) = cmd.burn_rate {
        inputs.burn_rate_gph = burn;
    }
    if let Some(speed) = cmd.cruise_speed {
        inputs.cruise_speed_kt = speed;
    }

    let estimate = calculate_range(&inputs, &config.reserve)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("Range: {}", profile.name);
        println!("  Fuel on board:  {:.1} gal", inputs.fuel_capacity_gal * inputs.current_fuel_percent / 100.0);
        println!("  Reserve policy: {:.2} hr fixed reserve", config.reserve.fixed_hours);
        println!("  Reserve fuel:   {:.1} gal", estimate.reserve_fuel_gal);
        println!("  Usable fuel:    {:.1} gal", estimate.usable_fuel_gal);
        println!("  Max range:      {:.0} NM", estimate.max_range_nm);
        println!("  With reserve:   {:.0} NM  (unusable fuel deducted only)", estimate.with_reserve_nm);
    }
    Ok(())
}

fn handle_trip(config: &Config, cmd: &TripCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let profile = load_profile(&cmd.aircraft)?;

    let route = match &cmd.load {
        Some(name) => storage
            .load_route(name)
            .with_context(|| format!("loading saved route '{name}'"))?,
        None => route_from_icaos("trip", &cmd.waypoints)?,
    };

    let mut prices = storage.load_price_book(config)?;
    let options = TripOptions {
        departure_fuel_percent: cmd.fuel_percent,
        souls_on_board: cmd.souls,
        include_landing_fees: !cmd.no_landing_fees,
        include_fbo_fees: cmd.fbo_fees,
    };

    let estimator = TripEstimator::new(config);
    let estimate = estimator.estimate(&route, &profile, &options, &mut prices)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!("Trip: {} ({})", route.name, profile.name);
    println!();
    println!("  {:<6} {:<6} {:>6} {:>8} {:>7} {:>8} {:>9}", "From", "To", "Crs", "Dist", "Time", "Fuel", "Cost");
    for leg in &estimate.legs {
        println!(
            "  {:<6} {:<6} {:>5.0}° {:>5.0} NM {:>5.1} h {:>5.1} gal {:>8.2}{}",
            leg.from_icao,
            leg.to_icao,
            leg.bearing_deg,
            leg.distance_nm,
            leg.time_hr,
            leg.fuel_gal,
            leg.fuel_cost,
            if leg.fuel_stop { "  ⛽ fuel stop" } else { "" },
        );
    }
    println!();
    println!("  Distance:     {:.0} NM", estimate.total_distance_nm);
    println!("  Flight time:  {:.1} hr", estimate.total_time_hr);
    println!(
        "  Fuel needed:  {:.1} gal  (burn × {:.2} trip reserve)",
        estimate.total_fuel_gal, config.reserve.trip_multiplier
    );
    println!("  Fuel cost:    ${:.2}", estimate.fuel_cost);
    if options.include_landing_fees {
        println!("  Landing fees: ${:.2}", estimate.landing_fees);
    }
    if options.include_fbo_fees {
        println!("  FBO fees:     ${:.2}", estimate.fbo_fees);
    }
    println!("  Total cost:   ${:.2}", estimate.total_cost);
    if options.souls_on_board > 1 {
        println!(
            "  Per person:   ${:.2}  ({} souls)",
            estimate.cost_per_person, options.souls_on_board
        );
    }
    if !estimate.fuel_stops.is_empty() {
        println!("  Fuel stops:   {}", estimate.fuel_stops.join(", "));
    }
    Ok(())
}

fn handle_wb(config: &Config, cmd: &WbCommand) -> anyhow::Result<()> {
    let profile = load_profile(&cmd.aircraft)?;
    let loads = StationLoads {
        front_seats_lb: cmd.front,
        rear_seat_1_lb: cmd.rear1,
        rear_seat_2_lb: cmd.rear2,
        baggage_1_lb: cmd.baggage1,
        baggage_2_lb: cmd.baggage2,
        fuel_gal: cmd.fuel,
    };

    let wb = calculate_weight_balance(&profile, &loads, config)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&wb)?);
        return Ok(());
    }

    println!("Weight & Balance: {}", profile.name);
    println!("  Fuel weight:  {:.1} lb ({} at {:.1} lb/gal)", wb.fuel_weight_lb, profile.fuel_type, config.fuel_density_lb_per_gal(profile.fuel_type));
    println!("  Total weight: {:.1} lb (max {:.0})", wb.total_weight_lb, profile.max_weight_lb);
    println!("  CG:           {:.2} in (limits {:.1}–{:.1})", wb.cg_in, profile.cg_limits.forward, profile.cg_limits.aft);
    match (wb.cg_in_limits, wb.over_max_weight) {
        (true, false) => println!("  Verdict:      WITHIN LIMITS"),
        (false, false) => println!("  Verdict:      CG OUT OF LIMITS"),
        (true, true) => println!("  Verdict:      OVERWEIGHT"),
        (false, true) => println!("  Verdict:      OVERWEIGHT AND CG OUT OF LIMITS"),
    }
    Ok(())
}

fn handle_wind(cmd: &WindCommand) -> anyhow::Result<()> {
    let solution = solve_wind_triangle(cmd.heading, cmd.tas, cmd.wind_dir, cmd.wind_speed)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        println!("Wind Triangle");
        println!("  Heading {:.0}°, TAS {:.0} kt, wind {:.0}° at {:.0} kt", cmd.heading, cmd.tas, cmd.wind_dir, cmd.wind_speed);
        println!("  Ground speed: {:.0} kt", solution.ground_speed_kt);
        println!("  Track:        {:.0}°", solution.track_deg);
        println!("  Drift:        {:+.0}°", solution.wind_correction_deg);
    }
    Ok(())
}

fn handle_currency(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let entries = storage.list_entries()?;
    let statuses = evaluate_currencies(&entries, Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No logbook entries. Add flights with 'skyplan logbook add'.");
        return Ok(());
    }

    println!("Currency ({} logbook entries)", entries.len());
    for status in &statuses {
        let state = if status.is_current {
            format!("current, {} days left", status.days_remaining)
        } else if status.days_remaining == NEVER_ESTABLISHED {
            "never established".to_string()
        } else {
            format!("EXPIRED {} days ago", -status.days_remaining)
        };
        println!("  {} {:<32} {}", status.icon, status.name, state);
        if let Some(expires_at) = status.expires_at {
            println!("     {:<32} expires {}", status.description, expires_at.format("%Y-%m-%d"));
        } else {
            println!("     {}", status.description);
        }
    }
    Ok(())
}

fn handle_logbook(config: &Config, cmd: &LogbookCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;

    match cmd {
        LogbookCommand::Add {
            date,
            total,
            solo,
            night,
            instrument,
            cross_country,
            day_landings,
            night_landings,
            dual,
        } => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{date}', expected YYYY-MM-DD"))?;
            let entry = LogbookEntry {
                id: None,
                date,
                total_time: *total,
                solo_time: *solo,
                night_time: *night,
                instrument_time: *instrument,
                cross_country_time: *cross_country,
                day_landings: *day_landings,
                night_landings: *night_landings,
                dual_received: *dual,
            };
            let id = storage.insert_entry(&entry)?;
            println!("Added logbook entry {id} for {date}.");
        }
        LogbookCommand::List { limit } => {
            let entries = storage.list_entries()?;
            if entries.is_empty() {
                println!("Logbook is empty.");
                return Ok(());
            }
            println!("  {:<12} {:>6} {:>6} {:>6} {:>5} {:>5} {:>6}", "Date", "Total", "Night", "Instr", "Day", "Ngt", "Dual");
            for entry in entries.iter().take(*limit) {
                println!(
                    "  {:<12} {:>6.1} {:>6.1} {:>6.1} {:>5} {:>5} {:>6.1}",
                    entry.date,
                    entry.total_time,
                    entry.night_time,
                    entry.instrument_time,
                    entry.day_landings,
                    entry.night_landings,
                    entry.dual_received,
                );
            }
        }
        LogbookCommand::Totals { json } => {
            let entries = storage.list_entries()?;
            let totals = logbook::totals(&entries);
            if *json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else {
                println!("Logbook totals ({} entries)", totals.entries);
                println!("  Total time:    {:.1} hr", totals.total_time);
                println!("  Solo:          {:.1} hr", totals.solo_time);
                println!("  Night:         {:.1} hr", totals.night_time);
                println!("  Instrument:    {:.1} hr", totals.instrument_time);
                println!("  Cross-country: {:.1} hr", totals.cross_country_time);
                println!("  Dual received: {:.1} hr", totals.dual_received);
                println!("  Landings:      {} day / {} night", totals.day_landings, totals.night_landings);
            }
        }
    }
    Ok(())
}

fn handle_route(config: &Config, cmd: &RouteCommand) -> anyhow::Result<()> {
    let mut storage = open_storage(config)?;

    match cmd {
        RouteCommand::Save { name, waypoints } => {
            let route = route_from_icaos(name, waypoints)?;
            route.require_estimable()?;
            storage.save_route(&route)?;
            println!("Saved route '{}' with {} waypoints.", name, route.len());
        }
        RouteCommand::List => {
            let names = storage.list_routes()?;
            if names.is_empty() {
                println!("No saved routes.");
            }
            for name in names {
                println!("{name}");
            }
        }
        RouteCommand::Show { name, json } => {
            let route = storage.load_route(name)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                println!("Route '{}'", route.name);
                for waypoint in route.waypoints() {
                    println!(
                        "  {:<6} {:<36} {:>9.4} {:>10.4}",
                        waypoint.icao, waypoint.name, waypoint.latitude, waypoint.longitude
                    );
                }
            }
        }
        RouteCommand::Delete { name } => {
            if storage.delete_route(name)? {
                println!("Deleted route '{name}'.");
            } else {
                println!("No saved route named '{name}'.");
            }
        }
        RouteCommand::Export { name, format, output } => {
            let route = storage.load_route(name)?;
            let content = match format {
                ExportFormat::Gpx => generate_gpx(&route, &GpxOptions::default()),
                ExportFormat::Fpl => generate_fpl(&route),
                ExportFormat::Json => generate_json(&route)?,
            };
            match output {
                Some(path) => {
                    std::fs::write(path, &content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Exported '{}' to {}.", name, path.display());
                }
                None => println!("{content}"),
            }
        }
    }
    Ok(())
}

fn handle_sync(config: &Config, cmd: &SyncCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;

    match cmd {
        SyncCommand::Status { json } => {
            let stats = storage.stats()?;
            if *json {
                let status = serde_json::json!({
                    "pending_changes": stats.pending_changes,
                    "unresolved_conflicts": stats.unresolved_conflicts,
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Sync status");
                println!("  Pending changes:      {}", stats.pending_changes);
                println!("  Unresolved conflicts: {}", stats.unresolved_conflicts);
            }
        }
        SyncCommand::Resolve { strategy, all } => {
            let mut resolver = ConflictResolver::new(storage);
            let mut state = resolver.start()?;
            if state == ResolverState::Done {
                println!("No conflicts to resolve.");
                return Ok(());
            }

            let mut resolved = 0usize;
            while let ResolverState::Presenting { .. } = state {
                if let Some(conflict) = resolver.current() {
                    println!(
                        "Conflict {} of {}: {} ({})",
                        resolved + 1,
                        resolver.total(),
                        conflict.kind,
                        conflict.conflict_kind,
                    );
                }
                state = resolver.resolve((*strategy).into())?;
                resolved += 1;
                if !*all {
                    break;
                }
            }
            println!("Resolved {resolved} conflict(s).");
            if state != ResolverState::Done {
                let remaining = resolver.total() - resolved;
                println!("{remaining} conflict(s) remaining; rerun with --all to clear them.");
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!();
                println!("[Storage]");
                println!("  Database path:     {}", config.database_path().display());
                println!("  Cache TTL:         {} days", config.storage.cache_ttl_days);
                println!();
                println!("[Fuel]");
                println!("  100LL density:     {:.1} lb/gal", config.fuel.density_100ll_lb_per_gal);
                println!("  Jet-A density:     {:.1} lb/gal", config.fuel.density_jet_a_lb_per_gal);
                println!("  Fallback price:    ${:.2}/gal", config.fuel.fallback_price_per_gal);
                println!();
                println!("[Fees]");
                println!("  Landing (large):   ${:.2}", config.fees.landing_large);
                println!("  Landing (medium):  ${:.2}", config.fees.landing_medium);
                println!("  Landing (small):   ${:.2}", config.fees.landing_small);
                println!();
                println!("[Reserve]");
                println!("  Fixed reserve:     {:.2} hr", config.reserve.fixed_hours);
                println!("  Trip multiplier:   {:.2}×", config.reserve.trip_multiplier);
                println!("  Fuel stop at:      {:.0}% of range", config.reserve.fuel_stop_fraction * 100.0);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
