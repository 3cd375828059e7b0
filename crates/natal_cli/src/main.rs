use clap::{Parser, Subcommand};
use serde_json::json;

use natal_chart::{
    ALL_BODIES, AspectPlacement, BirthInstant, Body, EphemerisProvider, HouseSystem, Location,
    Placements, Sign, calculated_summary, compute_placements, derive_summary, detect_aspects,
};
use natal_search::{
    ScanConfig, next_ingress, next_station, search_natal_transits, search_year_calendar,
};

mod mean;

use mean::MeanMotionEphemeris;

#[derive(Parser)]
#[command(name = "natal", about = "Natal chart and event calendar CLI")]
struct Cli {
    /// Emit JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Zodiac sign from an ecliptic longitude
    Sign {
        /// Ecliptic longitude in degrees
        lon: f64,
    },
    /// Cast a birth chart
    Chart {
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Local wall-clock time (HH:MM or HH:MM:SS)
        #[arg(long)]
        time: String,
        /// IANA timezone name (e.g. Europe/Paris)
        #[arg(long)]
        zone: String,
        /// Birth latitude in degrees (omit if unknown)
        #[arg(long)]
        lat: Option<f64>,
        /// Birth longitude in degrees (omit if unknown)
        #[arg(long)]
        lon: Option<f64>,
    },
    /// Next sign ingress of a body after a date
    NextIngress {
        /// Body name (sun, moon, mercury, ...)
        body: String,
        /// UTC date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// Next station of a body after a date
    NextStation {
        /// Body name (mercury, venus, mars, ...)
        body: String,
        /// UTC date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// Full event calendar for a year
    Calendar {
        /// Calendar year
        year: i32,
    },
    /// Transits to a natal chart over a window
    Transits {
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Local wall-clock time (HH:MM or HH:MM:SS)
        #[arg(long)]
        time: String,
        /// IANA timezone name
        #[arg(long)]
        zone: String,
        /// Window start, UTC date (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Window length in days
        #[arg(long, default_value = "30")]
        days: f64,
    },
}

fn parse_body(name: &str) -> Body {
    match ALL_BODIES
        .iter()
        .find(|b| b.name().eq_ignore_ascii_case(name))
    {
        Some(&body) => body,
        None => {
            eprintln!("Unknown body: {name}");
            std::process::exit(1);
        }
    }
}

/// UT Julian Day at 00:00 of a YYYY-MM-DD date.
fn parse_utc_date(date: &str) -> f64 {
    match BirthInstant::parse(date, "00:00", "UTC") {
        Ok(birth) => match birth.to_julian_day() {
            Ok(jd) => jd,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn cast_chart(
    provider: &dyn EphemerisProvider,
    date: &str,
    time: &str,
    zone: &str,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Placements {
    let birth = match BirthInstant::parse(date, time, zone) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let location = match (lat, lon) {
        (Some(lat), Some(lon)) => Location::from_raw(lat, lon),
        _ => Location::Unknown,
    };
    match compute_placements(provider, &birth, location, HouseSystem::Placidus) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn print_chart(placements: &Placements, aspects: &[AspectPlacement]) {
    println!("JD (UT): {:.6}", placements.jd_ut);
    for p in &placements.bodies {
        let house = p
            .house
            .map(|h| format!(" house {h}"))
            .unwrap_or_default();
        let rx = if p.retrograde { " Rx" } else { "" };
        println!(
            "  {:<10} {:>8.4} deg  {} {:.4}{}{}",
            p.body.name(),
            p.longitude_deg,
            p.sign.name(),
            p.degree_in_sign(),
            house,
            rx
        );
    }
    if let Some(asc) = placements.angles.ascendant {
        println!("  Ascendant  {:>8.4} deg  {}", asc.longitude_deg, asc.sign.name());
    }
    if let Some(mc) = placements.angles.midheaven {
        println!("  Midheaven  {:>8.4} deg  {}", mc.longitude_deg, mc.sign.name());
    }

    let summary = derive_summary(placements, aspects);
    println!("Chart ruler: {}", summary.chart_ruler.map_or("-", |b| b.name()));
    for s in &summary.dominant_signs {
        println!("  dominant sign {} ({:.2})", s.sign.name(), s.score);
    }
    for b in &summary.dominant_bodies {
        println!("  dominant body {} ({:.2})", b.body.name(), b.score);
    }
    for a in summary.top_aspects.iter() {
        println!(
            "  {} {} {} (orb {:.2})",
            a.body_a.name(),
            a.aspect.name(),
            a.body_b.name(),
            a.orb_deg
        );
    }

    let features = calculated_summary(placements, aspects);
    println!("Sect: {:?}", features.sect);
    if let Some(sn) = features.south_node {
        println!("South node: {:.4} deg {}", sn.longitude_deg, sn.sign.name());
    }
    if let Some(pof) = features.fortune {
        println!("Part of Fortune: {:.4} deg {}", pof.longitude_deg, pof.sign.name());
    }
    for st in &features.emphasis.stelliums {
        let names: Vec<&str> = st.bodies.iter().map(|b| b.name()).collect();
        println!("Stellium in {:?}: {}", st.locus, names.join(", "));
    }
    for pat in &features.patterns {
        let names: Vec<&str> = pat.bodies.iter().map(|b| b.name()).collect();
        println!("{:?}: {}", pat.kind, names.join(", "));
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let provider = MeanMotionEphemeris;

    match cli.command {
        Commands::Sign { lon } => {
            let sign = Sign::from_longitude(lon);
            if cli.json {
                println!(
                    "{}",
                    json!({
                        "sign": sign.name(),
                        "degree_in_sign": lon.rem_euclid(360.0) - sign.start_deg(),
                    })
                );
            } else {
                println!(
                    "{} ({:.4} deg in sign)",
                    sign.name(),
                    lon.rem_euclid(360.0) - sign.start_deg()
                );
            }
        }

        Commands::Chart {
            date,
            time,
            zone,
            lat,
            lon,
        } => {
            let placements = cast_chart(&provider, &date, &time, &zone, lat, lon);
            let aspects = detect_aspects(&placements.bodies);
            if cli.json {
                let summary = derive_summary(&placements, &aspects);
                let features = calculated_summary(&placements, &aspects);
                println!(
                    "{}",
                    json!({
                        "placements": placements,
                        "aspects": aspects,
                        "summary": summary,
                        "features": features,
                    })
                );
            } else {
                print_chart(&placements, &aspects);
            }
        }

        Commands::NextIngress { body, date } => {
            let body = parse_body(&body);
            let jd = parse_utc_date(&date);
            let config = ScanConfig::for_body(body);
            match next_ingress(&provider, body, jd, &config) {
                Ok(Some(e)) => {
                    if cli.json {
                        println!("{}", json!(e));
                    } else {
                        let when = e.utc.map_or_else(
                            || format!("JD {:.5}", e.jd_ut),
                            |utc| utc.format("%Y-%m-%d %H:%M UTC").to_string(),
                        );
                        println!(
                            "{} enters {} at {}{}",
                            e.body.name(),
                            e.to_sign.name(),
                            when,
                            if e.retrograde { " (retrograde)" } else { "" }
                        );
                    }
                }
                Ok(None) => println!("No ingress found in scan range"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::NextStation { body, date } => {
            let body = parse_body(&body);
            let jd = parse_utc_date(&date);
            let config = ScanConfig::for_body(body);
            match next_station(&provider, body, jd, &config) {
                Ok(Some(e)) => {
                    if cli.json {
                        println!("{}", json!(e));
                    } else {
                        let when = e.utc.map_or_else(
                            || format!("JD {:.5}", e.jd_ut),
                            |utc| utc.format("%Y-%m-%d %H:%M UTC").to_string(),
                        );
                        println!(
                            "{} stations {} at {} ({:.4} deg {})",
                            e.body.name(),
                            e.direction.name(),
                            when,
                            e.longitude_deg,
                            e.sign.name()
                        );
                    }
                }
                Ok(None) => println!("No station found in scan range"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Calendar { year } => match search_year_calendar(&provider, year) {
            Ok(calendar) => {
                if cli.json {
                    println!("{}", json!(calendar));
                } else {
                    println!("{year}: {} ingresses, {} stations", calendar.ingresses.len(), calendar.stations.len());
                    for s in &calendar.seasons {
                        let when = s.ingress.utc.map_or_else(
                            || format!("JD {:.5}", s.ingress.jd_ut),
                            |utc| utc.format("%Y-%m-%d %H:%M UTC").to_string(),
                        );
                        println!("  {} at {}", s.season.name(), when);
                    }
                    for e in &calendar.ingresses {
                        let when = e.utc.map_or_else(
                            || format!("JD {:.5}", e.jd_ut),
                            |utc| utc.format("%Y-%m-%d %H:%M").to_string(),
                        );
                        println!(
                            "  {} {} -> {}{}",
                            when,
                            e.body.name(),
                            e.to_sign.name(),
                            if e.retrograde { " (Rx)" } else { "" }
                        );
                    }
                    for e in &calendar.stations {
                        let when = e.utc.map_or_else(
                            || format!("JD {:.5}", e.jd_ut),
                            |utc| utc.format("%Y-%m-%d %H:%M").to_string(),
                        );
                        println!("  {} {} stations {}", when, e.body.name(), e.direction.name());
                    }
                }
            }
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },

        Commands::Transits {
            date,
            time,
            zone,
            from,
            days,
        } => {
            let natal = cast_chart(&provider, &date, &time, &zone, None, None);
            let jd_start = parse_utc_date(&from);
            match search_natal_transits(&provider, &natal, jd_start, jd_start + days) {
                Ok(events) => {
                    if cli.json {
                        println!("{}", json!(events));
                    } else {
                        for e in &events {
                            let when = e.utc.map_or_else(
                                || format!("JD {:.5}", e.jd_ut),
                                |utc| utc.format("%Y-%m-%d %H:%M").to_string(),
                            );
                            println!(
                                "  {} {} {} natal {} (pass {}{})",
                                when,
                                e.transiting.name(),
                                e.aspect.name(),
                                e.natal_body.name(),
                                e.pass,
                                if e.retrograde { ", Rx" } else { "" }
                            );
                        }
                    }
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
