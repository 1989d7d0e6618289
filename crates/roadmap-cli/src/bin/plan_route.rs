use anyhow::{bail, Context, Result};
use clap::Parser;
use roadmap_cli::{load_colliders, Config};
use roadmap_core::{FrameConverter, GlobalPosition, LocalPosition, RoadmapPlanner};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Colliders CSV file (falls back to PLANNER_COLLIDERS)
    #[arg(long)]
    colliders: Option<String>,

    /// Start position as LAT,LON[,ALT]
    #[arg(long)]
    start: String,

    /// Goal position as LAT,LON[,ALT]
    #[arg(long)]
    goal: String,

    /// Home position as LAT,LON[,ALT]; defaults to the colliders header
    #[arg(long)]
    home: Option<String>,

    /// Planning altitude in meters
    #[arg(long)]
    altitude: Option<f64>,

    /// Safety margin around obstacles in meters
    #[arg(long)]
    safety_margin: Option<f64>,

    /// Collinearity pruning tolerance
    #[arg(long)]
    epsilon: Option<f64>,

    /// Also report each waypoint as lat/lon
    #[arg(long)]
    geodetic: bool,
}

#[derive(Debug, Serialize)]
struct GeodeticWaypoint {
    lat: f64,
    lon: f64,
    altitude_m: f64,
}

#[derive(Debug, Serialize)]
struct Output {
    #[serde(flatten)]
    result: roadmap_core::PlanResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    geodetic: Option<Vec<GeodeticWaypoint>>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("roadmap_cli=info".parse()?)
                .add_directive("roadmap_core=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::from_env();
    if let Some(altitude) = args.altitude {
        config.planner.planning_altitude = altitude;
    }
    if let Some(margin) = args.safety_margin {
        config.planner.safety_margin = margin;
    }
    if let Some(epsilon) = args.epsilon {
        config.planner.prune_epsilon = epsilon;
    }

    let Some(colliders_path) = args.colliders.or(config.colliders_path) else {
        bail!("no colliders file given (use --colliders or PLANNER_COLLIDERS)");
    };
    let map = load_colliders(&colliders_path)?;
    tracing::info!(
        "Loaded {} obstacles from {}",
        map.obstacles.len(),
        colliders_path
    );

    let home = match &args.home {
        Some(raw) => parse_position(raw).context("invalid --home")?,
        None => map.home,
    };
    let start = parse_position(&args.start).context("invalid --start")?;
    let goal = parse_position(&args.goal).context("invalid --goal")?;

    let planner = RoadmapPlanner::new(config.planner.clone());
    let result = planner.plan(start, goal, home, &map.obstacles)?;
    if !result.success {
        tracing::warn!("No path found between start and goal");
    }

    let geodetic: Option<Vec<GeodeticWaypoint>> = args.geodetic.then(|| {
        result
            .waypoints
            .iter()
            .map(|wp| {
                let local = LocalPosition::new(wp.north as f64, wp.east as f64, -wp.altitude_m);
                let global = planner.frame().local_to_global(local, home);
                GeodeticWaypoint {
                    lat: global.lat,
                    lon: global.lon,
                    altitude_m: global.altitude_m,
                }
            })
            .collect()
    });

    let output = Output { result, geodetic };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Parse `LAT,LON[,ALT]`.
fn parse_position(raw: &str) -> Result<GlobalPosition> {
    let values = raw
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()
        .with_context(|| format!("{:?} is not a list of numbers", raw))?;
    match values[..] {
        [lat, lon] => Ok(GlobalPosition::new(lat, lon, 0.0)),
        [lat, lon, alt] => Ok(GlobalPosition::new(lat, lon, alt)),
        _ => bail!("expected LAT,LON[,ALT], got {:?}", raw),
    }
}
