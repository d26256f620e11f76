use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use mortar_sight::{
    dispatch, estimate_elevation, DisplayCommand, MeasurementSession, MortarConfig, Point2D,
    ScreenGeometry, SessionEvent, StatusReadout,
};

#[derive(Parser)]
#[command(name = "mortar-cli")]
#[command(version = "0.1.0")]
#[command(about = "Mortar range finder: screen clicks to range-dial setting", long_about = None)]
struct Cli {
    /// JSON settings file (screen size, FOV, max range, ...)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the angular reference values for a resolution
    Geometry {
        /// Screen width (px)
        #[arg(long)]
        width: Option<f64>,

        /// Screen height (px)
        #[arg(long)]
        height: Option<f64>,

        /// Horizontal field of view (degrees)
        #[arg(long)]
        fov: Option<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Elevation angle of a clicked pixel row
    Elevation {
        /// Pixel row of the click
        #[arg(short = 'y', long, allow_hyphen_values = true)]
        y: f64,

        /// Screen width (px)
        #[arg(long)]
        width: Option<f64>,

        /// Screen height (px)
        #[arg(long)]
        height: Option<f64>,

        /// Horizontal field of view (degrees)
        #[arg(long)]
        fov: Option<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Range-dial setting for a known elevation and ground distance
    Solve {
        /// Target elevation (degrees, negative below)
        #[arg(short = 'e', long, allow_hyphen_values = true, value_parser = parse_finite)]
        elevation: f64,

        /// Ground distance to the target (meters)
        #[arg(short = 'd', long, value_parser = parse_finite)]
        distance: f64,

        /// Maximum range of the weapon (meters)
        #[arg(long, value_parser = parse_finite)]
        max_range: Option<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Run one full measurement from five clicks
    Measure {
        /// First calibration click, "x,y"
        #[arg(long, value_parser = parse_point)]
        scale_from: Point2D,

        /// Second calibration click, "x,y"
        #[arg(long, value_parser = parse_point)]
        scale_to: Point2D,

        /// Firing position on the map, "x,y"
        #[arg(long, value_parser = parse_point)]
        from: Point2D,

        /// Target position on the map, "x,y"
        #[arg(long, value_parser = parse_point)]
        to: Point2D,

        /// Pixel row of the target in the world view
        #[arg(long, allow_hyphen_values = true)]
        target_y: f64,

        /// Screen width (px)
        #[arg(long)]
        width: Option<f64>,

        /// Screen height (px)
        #[arg(long)]
        height: Option<f64>,

        /// Horizontal field of view (degrees)
        #[arg(long)]
        fov: Option<f64>,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Feed a JSON event script through a session
    Replay {
        /// File holding a JSON array of events
        #[arg(short = 's', long)]
        script: PathBuf,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Display tool information
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct SolveOutput {
    elevation_deg: f64,
    horizontal_distance_m: f64,
    max_range_m: f64,
    range_setting_m: Option<f64>,
    envelope_limit_m: f64,
}

#[derive(Debug, Serialize)]
struct ElevationOutput {
    y: f64,
    center_y: f64,
    elevation_deg: f64,
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    commands: Vec<DisplayCommand>,
    readout: StatusReadout,
}

fn parse_point(s: &str) -> Result<Point2D, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got \"{}\"", s))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("bad x in \"{}\": {}", s, e))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("bad y in \"{}\": {}", s, e))?;
    Ok(Point2D::new(x, y))
}

fn parse_finite(s: &str) -> Result<f64, String> {
    let value = s.trim().parse::<f64>().map_err(|e| format!("bad number \"{}\": {}", s, e))?;
    if !value.is_finite() {
        return Err(format!("\"{}\" is not a finite number", s));
    }
    Ok(value)
}

fn load_config(path: Option<&PathBuf>) -> Result<MortarConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(MortarConfig::load(path)?),
        None => Ok(MortarConfig::default()),
    }
}

fn geometry_from(config: &MortarConfig, width: Option<f64>, height: Option<f64>, fov: Option<f64>) -> Result<ScreenGeometry, Box<dyn Error>> {
    Ok(ScreenGeometry::from_resolution(
        width.unwrap_or(config.screen_width_px),
        height.unwrap_or(config.screen_height_px),
        fov.unwrap_or(config.horizontal_fov_deg),
    )?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Geometry { width, height, fov, output } => {
            let geometry = geometry_from(&config, width, height, fov)?;
            display_geometry(&geometry, output)?;
        },

        Commands::Elevation { y, width, height, fov, output } => {
            let geometry = geometry_from(&config, width, height, fov)?;
            let elevation_deg = estimate_elevation(&geometry, Point2D::new(0.0, y))?;
            let result = ElevationOutput {
                y,
                center_y: geometry.center_y,
                elevation_deg,
            };
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Table => {
                    println!("╔════════════════════════════════════════╗");
                    println!("║ Click Row:         {:>8.1} px         ║", result.y);
                    println!("║ Center Row:        {:>8.1} px         ║", result.center_y);
                    println!("║ Elevation:         {:>8.2} °          ║", result.elevation_deg);
                    println!("╚════════════════════════════════════════╝");
                },
            }
        },

        Commands::Solve { elevation, distance, max_range, output } => {
            let mut solver = config.solver();
            if let Some(max_range) = max_range {
                solver.max_range_m = max_range;
            }
            let result = SolveOutput {
                elevation_deg: elevation,
                horizontal_distance_m: distance,
                max_range_m: solver.max_range_m,
                range_setting_m: solver.solve(elevation, distance).ok(),
                envelope_limit_m: solver.envelope_limit(elevation),
            };
            display_solution(&result, output)?;
        },

        Commands::Measure { scale_from, scale_to, from, to, target_y, width, height, fov, output } => {
            config.validate()?;
            let geometry = geometry_from(&config, width, height, fov)?;
            let mut session = MeasurementSession::with_parts(
                geometry,
                config.solver(),
                config.reference_meters,
                config.result_prompt_ms,
            );
            let mut commands: Vec<DisplayCommand> = Vec::new();
            let center_x = session.geometry().width_px / 2.0;

            dispatch(&mut session, SessionEvent::Start, &mut commands);
            for point in [scale_from, scale_to, from, to, Point2D::new(center_x, target_y)] {
                dispatch(&mut session, SessionEvent::PointCaptured { x: point.x, y: point.y }, &mut commands);
            }

            display_readout(&session.readout(), output)?;
        },

        Commands::Replay { script, output } => {
            let contents = fs::read_to_string(&script)?;
            let events: Vec<SessionEvent> = serde_json::from_str(&contents)?;

            let mut session = MeasurementSession::new(&config)?;
            let mut commands: Vec<DisplayCommand> = Vec::new();
            for event in events {
                dispatch(&mut session, event, &mut commands);
            }

            match output {
                OutputFormat::Json => {
                    let result = ReplayOutput {
                        commands,
                        readout: session.readout(),
                    };
                    println!("{}", serde_json::to_string_pretty(&result)?);
                },
                OutputFormat::Table => {
                    for command in &commands {
                        match command {
                            DisplayCommand::ShowPrompt { text, auto_close_ms } => {
                                let text = text.replace('\n', " | ");
                                match auto_close_ms {
                                    Some(ms) => println!("SHOW   {} (closes after {} ms)", text, ms),
                                    None => println!("SHOW   {}", text),
                                }
                            },
                            DisplayCommand::ClosePrompt => println!("CLOSE"),
                        }
                    }
                    println!();
                    display_readout(&session.readout(), output)?;
                },
            }
        },

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║        MORTAR SIGHT v0.1.0             ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Screen-click mortar range finder.      ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Steps:                                 ║");
            println!("║ • 2 clicks on a 100 m map segment      ║");
            println!("║ • 2 clicks: your position, target      ║");
            println!("║ • 1 click on the target in view        ║");
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn display_geometry(geometry: &ScreenGeometry, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(geometry)?);
        },
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║         SCREEN GEOMETRY                ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Resolution:     {:>6.0} x {:<6.0}        ║", geometry.width_px, geometry.height_px);
            println!("║ Horizontal FOV:    {:>8.2} °          ║", geometry.horizontal_fov_deg);
            println!("║ Vertical FOV:      {:>8.2} °          ║", geometry.vertical_fov_deg());
            println!("║ Max Elevation:     {:>8.2} °          ║", geometry.max_elevation_deg);
            println!("║ Center Row:        {:>8.1} px         ║", geometry.center_y);
            println!("╚════════════════════════════════════════╝");
        },
    }

    Ok(())
}

fn display_solution(result: &SolveOutput, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        },
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║         RANGE SETTING                  ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Elevation:         {:>8.2} °          ║", result.elevation_deg);
            println!("║ Ground Distance:   {:>8.1} m          ║", result.horizontal_distance_m);
            println!("║ Max Range:         {:>8.1} m          ║", result.max_range_m);
            println!("║ Envelope Limit:    {:>8.1} m          ║", result.envelope_limit_m);
            println!("╠════════════════════════════════════════╣");
            match result.range_setting_m {
                Some(range) => println!("║ Range Setting:     {:>8.0} m          ║", range),
                None => println!("║ Range Setting:     No solution         ║"),
            }
            println!("╚════════════════════════════════════════╝");
        },
    }

    Ok(())
}

fn display_readout(readout: &StatusReadout, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(readout)?);
        },
        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║         MEASUREMENT                    ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Status:      {:<26}║", readout.status_text);
            println!("║ Distance:    {:<26}║", readout.horizontal_distance_text);
            println!("║ Elevation:   {:<26}║", readout.elevation_angle_text);
            println!("║ Result:      {:<26}║", readout.result_text);
            println!("╚════════════════════════════════════════╝");
        },
    }

    Ok(())
}
