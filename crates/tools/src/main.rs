use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use formats::{FeatureCollection, PlotBundle};
use foundation::math::{Rotation, Vec2};
use globe::{GlobePlot, HostState, LocalizationPlot, Overlays, PlotConfig, PlotView};
use layers::labels::{feature_anchor, is_feature_visible};
use scene::picking::pick;
use scene::selection::SelectedFields;
use scene::visibility::ViewCap;
use scene::{Interaction, LayerKind};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render sky localizations onto a globe")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a plot bundle and write it as SVG
    Render {
        #[command(flatten)]
        plot: PlotArgs,

        /// Pixel to click before writing, as x,y (repeatable, applied in order)
        #[arg(long, value_parser = parse_point)]
        click: Vec<Vec2>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Report which interactive element a pixel hits
    Pick {
        #[command(flatten)]
        plot: PlotArgs,

        /// Pixel as x,y
        #[arg(long, value_parser = parse_point)]
        at: Vec2,
    },

    /// List sources and galaxies with their visibility in the current view
    Visible {
        #[command(flatten)]
        plot: PlotArgs,
    },
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// JSON plot bundle (localization, overlays, options)
    #[arg(long)]
    bundle: PathBuf,

    /// JSON renderer config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// orthographic or mollweide
    #[arg(long)]
    projection: Option<String>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// View rotation as lon,lat,roll degrees (defaults to the first contour feature)
    #[arg(long, value_parser = parse_rotation, allow_hyphen_values = true)]
    rotation: Option<Rotation>,

    /// Selected field ids
    #[arg(long, value_delimiter = ',')]
    select: Vec<u32>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    match Cli::parse().command {
        Command::Render { plot, click, out } => cmd_render(&plot, &click, out.as_deref()),
        Command::Pick { plot, at } => cmd_pick(&plot, at),
        Command::Visible { plot } => cmd_visible(&plot),
    }
}

struct Session {
    bundle: PlotBundle,
    plot: GlobePlot,
    host: HostState,
}

impl Session {
    fn open(args: &PlotArgs) -> Result<Self, String> {
        let raw = fs::read_to_string(&args.bundle)
            .map_err(|e| format!("read {:?}: {e}", args.bundle))?;
        let bundle: PlotBundle =
            serde_json::from_str(&raw).map_err(|e| format!("parse {:?}: {e}", args.bundle))?;

        let mut config = match &args.config {
            Some(path) => {
                let raw =
                    fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
                PlotConfig::from_json_str(&raw).map_err(|e| e.to_string())?
            }
            None => PlotConfig::default(),
        };
        if let Some(p) = &args.projection {
            config.projection = p.clone();
        }
        if let Some(w) = args.width {
            config.width = w;
        }
        if let Some(h) = args.height {
            config.height = h;
        }

        let plot = GlobePlot::new(config).map_err(|e| e.to_string())?;
        let host = HostState {
            rotation: args.rotation,
            selected_fields: SelectedFields::from_ids(args.select.iter().copied()),
        };
        Ok(Self { bundle, plot, host })
    }

    /// Renders the bundle with the host's current state; clicks at `click`
    /// afterwards when given.
    fn draw(&mut self, click: Option<Vec2>) -> Result<Option<Interaction>, String> {
        let selected = self.host.selected_fields.clone();
        let mut adapter = LocalizationPlot::new(&selected);
        adapter.localization = self.bundle.localization.as_ref();
        adapter.overlays = Overlays::from_bundle(&self.bundle);
        adapter.rotation = self.host.rotation;

        let view = adapter.render(&mut self.plot).map_err(|e| e.to_string())?;
        let props = match view {
            PlotView::Loading { missing } => {
                return Err(format!("localization incomplete, missing: {}", missing.join(", ")));
            }
            PlotView::Globe(props) => props,
        };
        let Some(px) = click else {
            return Ok(None);
        };
        self.plot
            .click(&props, &mut self.host, px)
            .map_err(|e| e.to_string())
    }
}

fn cmd_render(args: &PlotArgs, clicks: &[Vec2], out: Option<&Path>) -> Result<(), String> {
    let mut session = Session::open(args)?;
    for px in clicks {
        let hit = session.draw(Some(*px))?;
        info!(x = px.x, y = px.y, ?hit, "click");
    }
    session.draw(None)?;

    let svg = session.plot.surface().to_svg();
    match out {
        Some(path) => {
            fs::write(path, svg.as_bytes()).map_err(|e| format!("write {path:?}: {e}"))?;
            info!(
                path = %path.display(),
                redraws = session.plot.redraw_count(),
                selected = ?session.host.selected_fields.to_vec(),
                "wrote svg"
            );
        }
        None => println!("{svg}"),
    }
    Ok(())
}

#[derive(Serialize)]
struct PickReport {
    layer: &'static str,
    field_id: Option<u32>,
    observation: Option<String>,
    tooltip: Option<String>,
}

fn cmd_pick(args: &PlotArgs, at: Vec2) -> Result<(), String> {
    let mut session = Session::open(args)?;
    session.draw(None)?;

    let surface = session.plot.surface();
    let report = pick(surface, at).map(|hit| {
        let (field_id, observation) = match hit.interaction {
            Interaction::ToggleField(id) => (Some(id), None),
            Interaction::ToggleObservation(key) => (None, Some(key)),
        };
        PickReport {
            layer: hit.layer.name(),
            field_id,
            observation,
            tooltip: surface.elements()[hit.index].tooltip.clone(),
        }
    });
    let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct VisibilityRow {
    layer: &'static str,
    name: Option<String>,
    lon_deg: f64,
    lat_deg: f64,
    distance_deg: f64,
    visible: bool,
}

fn cmd_visible(args: &PlotArgs) -> Result<(), String> {
    let mut session = Session::open(args)?;
    session.draw(None)?;
    let projection = session
        .plot
        .projection()
        .ok_or_else(|| "nothing was drawn".to_string())?;
    let cap = ViewCap::of(projection);

    let mut rows = Vec::new();
    let bundle = &session.bundle;
    let sources = bundle.sources.as_ref().and_then(|b| b.geojson.as_ref());
    let galaxies = bundle.galaxies.as_ref().and_then(|b| b.geojson.as_ref());
    collect_rows(&mut rows, LayerKind::Sources, sources, &cap);
    collect_rows(&mut rows, LayerKind::Galaxies, galaxies, &cap);

    let json = serde_json::to_string_pretty(&rows).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn collect_rows(
    rows: &mut Vec<VisibilityRow>,
    layer: LayerKind,
    features: Option<&FeatureCollection>,
    cap: &ViewCap,
) {
    let Some(features) = features else {
        return;
    };
    for feature in &features.features {
        let Some(anchor) = feature_anchor(feature) else {
            continue;
        };
        rows.push(VisibilityRow {
            layer: layer.name(),
            name: feature.name().map(str::to_string),
            lon_deg: anchor.lon_deg,
            lat_deg: anchor.lat_deg,
            distance_deg: cap.distance(anchor).to_degrees(),
            visible: is_feature_visible(cap, feature),
        });
    }
}

fn parse_point(s: &str) -> Result<Vec2, String> {
    let parts = parse_numbers(s)?;
    match parts.as_slice() {
        [x, y] => Ok(Vec2::new(*x, *y)),
        _ => Err(format!("expected x,y but got {s:?}")),
    }
}

fn parse_rotation(s: &str) -> Result<Rotation, String> {
    let parts = parse_numbers(s)?;
    match parts.as_slice() {
        [lon, lat] => Ok(Rotation::new(*lon, *lat, 0.0)),
        [lon, lat, roll] => Ok(Rotation::new(*lon, *lat, *roll)),
        _ => Err(format!("expected lon,lat[,roll] but got {s:?}")),
    }
}

fn parse_numbers(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|e| format!("bad number {p:?}: {e}"))
        })
        .collect()
}
