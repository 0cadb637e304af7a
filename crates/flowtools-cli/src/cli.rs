use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Petter Johansson",
    version,
    about = "flowtools - read, combine, analyse and draw the flow field data maps of simulated droplets.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S droplet.min-mass=1.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Average every N consecutive maps of a run into one map.
    Average(AverageArgs),
    /// Combine any number of maps of the same grid into one map.
    Aggregate(AggregateArgs),
    /// Merge legacy density and flow maps into current maps.
    Convert(ConvertArgs),
    /// Combine blocks of cells of a map into larger cells.
    Coarsen(CoarsenArgs),
    /// Cut out the cells of a map inside a region.
    Cut(CutArgs),
    /// Collect the spreading of a droplet through the maps of a run.
    Spread(SpreadArgs),
    /// Combine spread files of repeated runs into mean values with errors.
    CombineSpread(CombineSpreadArgs),
    /// Print the spreading velocity of combined spread files.
    SpreadVelocity(VelocityArgs),
    /// Give spread files a new time between frames.
    Retime(RetimeArgs),
    /// Print the flow profile of a map along y.
    Profile(ProfileArgs),
    /// Draw figures of maps or spreading.
    Plot(PlotArgs),
    /// Print the cells of maps.
    Print(PrintArgs),
    /// Print information about the grid of a map.
    Info(InfoArgs),
}

/// Frame numbers of a run.
#[derive(Args, Debug, Clone)]
pub struct FrameRangeArgs {
    /// First frame number
    #[arg(short, long, default_value_t = 1, value_name = "FRAME")]
    pub start: u64,

    /// Last frame number, by default the last frame on disk
    #[arg(short, long, value_name = "FRAME")]
    pub end: Option<u64>,
}

/// Naming of the numbered map files of a run.
#[derive(Args, Debug, Clone, Default)]
pub struct NamingArgs {
    /// Extension of map files [default: .dat]
    #[arg(long = "ext", value_name = "EXT")]
    pub extension: Option<String>,

    /// Number of digits of frame numbers in file names [default: 5]
    #[arg(long, value_name = "INT")]
    pub num_digits: Option<usize>,
}

/// Which cells belong to the droplet.
#[derive(Args, Debug, Clone, Default)]
pub struct DropletArgs {
    /// Minimum mass of droplet cells [default: 0]
    #[arg(short, long, value_name = "MASS")]
    pub min_mass: Option<f64>,

    /// Number of columns to each side searched for a connected cell [default: 1]
    #[arg(long, value_name = "INT")]
    pub columns: Option<usize>,
}

#[derive(Args, Debug)]
pub struct AverageArgs {
    /// File name base of the input maps
    #[arg(short = 'f', long, value_name = "BASE")]
    pub base: String,

    /// Number of consecutive maps to average
    #[arg(short, long, default_value_t = 1, value_name = "INT")]
    pub number: usize,

    /// File name base of the averaged maps
    #[arg(short, long, default_value = "out_", value_name = "BASE")]
    pub out: String,

    /// Sum mass and atom counts instead of averaging them
    #[arg(long)]
    pub sum: bool,

    #[command(flatten)]
    pub frames: FrameRangeArgs,

    #[command(flatten)]
    pub naming: NamingArgs,
}

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Maps to combine
    #[arg(required = true, value_name = "MAP")]
    pub inputs: Vec<PathBuf>,

    /// Path of the combined map
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Sum mass and atom counts instead of averaging them
    #[arg(long)]
    pub sum: bool,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// File name base of the legacy density maps
    #[arg(short, long, value_name = "BASE")]
    pub dens: String,

    /// File name base of the legacy flow maps
    #[arg(short, long, value_name = "BASE")]
    pub flow: String,

    /// File name base of the converted maps
    #[arg(short, long, value_name = "BASE")]
    pub output: String,

    /// Split maps summed since the start of the simulation into single frames
    #[arg(long)]
    pub decumulate: bool,

    #[command(flatten)]
    pub frames: FrameRangeArgs,

    #[command(flatten)]
    pub naming: NamingArgs,
}

#[derive(Args, Debug)]
pub struct CoarsenArgs {
    /// Map to coarsen
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Path of the coarsened map
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Number of cells combined along x and y
    #[arg(short = 'n', long, num_args = 2, required = true, value_names = ["NX", "NY"])]
    pub cells: Vec<usize>,
}

#[derive(Args, Debug)]
pub struct CutArgs {
    /// Map to cut
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Path of the cut map
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    #[arg(long, value_name = "X", allow_hyphen_values = true)]
    pub xmin: Option<f64>,
    #[arg(long, value_name = "X", allow_hyphen_values = true)]
    pub xmax: Option<f64>,
    #[arg(long, value_name = "Y", allow_hyphen_values = true)]
    pub ymin: Option<f64>,
    #[arg(long, value_name = "Y", allow_hyphen_values = true)]
    pub ymax: Option<f64>,
}

#[derive(Args, Debug)]
pub struct SpreadArgs {
    /// File name base of the maps of the run
    pub base: String,

    /// Row of the substrate floor
    pub floor: usize,

    /// Path of the spread file to write
    pub save: PathBuf,

    /// Time between frames [default: 1]
    #[arg(long = "delta-t", visible_alias = "dt", value_name = "TIME")]
    pub delta_t: Option<f64>,

    /// Also export the spreading as CSV
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Save paths are relative to the directory of the input base
    #[arg(long)]
    pub relative: bool,

    #[command(flatten)]
    pub droplet: DropletArgs,

    #[command(flatten)]
    pub frames: FrameRangeArgs,

    #[command(flatten)]
    pub naming: NamingArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    None,
    #[default]
    Impact,
    Com,
}

#[derive(Args, Debug)]
pub struct CombineSpreadArgs {
    /// Spread files to combine
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Path of the combined spread file
    #[arg(short, long, value_name = "PATH")]
    pub save: PathBuf,

    /// How the times of the runs are aligned
    #[arg(long, value_enum, default_value_t = SyncMode::Impact)]
    pub sync: SyncMode,

    /// Also export the combined spreading as CSV
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Spread quantity whose velocity is taken.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VelocityKind {
    /// Left and right edges separately
    Edges,
    Radius,
    #[default]
    Diameter,
}

/// Records which keep a running average near the ends of a series.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    /// All records, averaged over the neighbours that exist
    #[default]
    Full,
    /// Records averaged over as many neighbours on both sides
    Equal,
    /// Records with the full number of neighbours on both sides
    Limited,
}

#[derive(Args, Debug)]
pub struct VelocityArgs {
    /// Spread files of repeated runs, combined before the velocity is taken
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Velocities to either side in the running average
    #[arg(short = 'n', long, default_value_t = 5, value_name = "INT")]
    pub average: usize,

    /// Records to either side in each difference
    #[arg(long, default_value_t = 1, value_name = "INT")]
    pub sample: usize,

    #[arg(long, value_enum, default_value_t = WindowMode::Full)]
    pub include: WindowMode,

    #[arg(short = 't', long = "type", value_enum, default_value_t = VelocityKind::Diameter)]
    pub kind: VelocityKind,

    /// How the times of the runs are aligned
    #[arg(long, value_enum, default_value_t = SyncMode::Com)]
    pub sync: SyncMode,

    /// Also draw the velocity to this image file
    #[arg(short, long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Line colour [default: blue]
    #[arg(short = 'C', long, value_name = "COLOUR")]
    pub colour: Option<String>,

    /// Legend label of the line
    #[arg(short, long, value_name = "LABEL")]
    pub label: Option<String>,

    #[command(flatten)]
    pub figure: FigureArgs,
}

#[derive(Args, Debug)]
pub struct RetimeArgs {
    /// Spread files to retime, overwritten unless --output is given
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// New time between frames
    #[arg(long = "delta-t", visible_alias = "dt", value_name = "TIME")]
    pub delta_t: f64,

    /// Time of the first record after retiming
    #[arg(long, value_name = "TIME", allow_hyphen_values = true)]
    pub t0: Option<f64>,

    /// Files to write instead, one per input file
    #[arg(short, long, num_args = 1.., value_name = "PATH")]
    pub output: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Map to take the profile of
    pub map: PathBuf,

    /// Cells must carry more than this mass [default: 0]
    #[arg(short, long, value_name = "MASS")]
    pub min_mass: Option<f64>,

    /// Lowest row height to include
    #[arg(long, value_name = "Y", allow_hyphen_values = true)]
    pub hmin: Option<f64>,

    /// Highest row height to include
    #[arg(long, value_name = "Y", allow_hyphen_values = true)]
    pub hmax: Option<f64>,

    /// Do not fit a line to the profile
    #[arg(long)]
    pub nofit: bool,

    /// Also draw the profile to this image file
    #[arg(short, long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Line colour [default: blue]
    #[arg(short = 'C', long, value_name = "COLOUR")]
    pub colour: Option<String>,

    /// Legend label of the profile
    #[arg(short, long, value_name = "LABEL")]
    pub label: Option<String>,

    #[command(flatten)]
    pub figure: FigureArgs,
}

#[derive(Args, Debug)]
pub struct PlotArgs {
    #[command(subcommand)]
    pub command: PlotCommands,
}

#[derive(Subcommand, Debug)]
pub enum PlotCommands {
    /// Draw the flow field of droplet cells as arrows.
    Flow(FlowPlotArgs),
    /// Draw the mass of droplet cells.
    Density(DensityPlotArgs),
    /// Draw spreading against time.
    Spread(SpreadPlotArgs),
}

/// Decoration of a figure.
#[derive(Args, Debug, Clone, Default)]
pub struct FigureArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, value_name = "LABEL")]
    pub xlabel: Option<String>,
    #[arg(long, value_name = "LABEL")]
    pub ylabel: Option<String>,
    /// Limits of the x axis, given together
    #[arg(long, value_name = "X", allow_hyphen_values = true, requires = "xmax")]
    pub xmin: Option<f64>,
    #[arg(long, value_name = "X", allow_hyphen_values = true, requires = "xmin")]
    pub xmax: Option<f64>,
    /// Limits of the y axis, given together
    #[arg(long, value_name = "Y", allow_hyphen_values = true, requires = "ymax")]
    pub ymin: Option<f64>,
    #[arg(long, value_name = "Y", allow_hyphen_values = true, requires = "ymin")]
    pub ymax: Option<f64>,
    /// Image size in pixels [default: 800 600]
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"])]
    pub size: Option<Vec<u32>>,
}

/// A map file, or the file name base of a run.
#[derive(Args, Debug, Clone)]
pub struct MapInputArgs {
    /// A map file, or the file name base of the maps of a run
    pub input: String,

    /// Image file to write for a single map, or the file name base of the
    /// images of a run
    #[arg(long, value_name = "PATH")]
    pub save: String,

    #[command(flatten)]
    pub frames: FrameRangeArgs,

    #[command(flatten)]
    pub naming: NamingArgs,
}

#[derive(Args, Debug)]
pub struct FlowPlotArgs {
    #[command(flatten)]
    pub input: MapInputArgs,

    /// Arrow length per unit of flow [default: 1]
    #[arg(long, value_name = "FLOAT")]
    pub scale: Option<f64>,

    /// Arrow colour [default: blue]
    #[arg(long, value_name = "COLOUR")]
    pub colour: Option<String>,

    /// Colour arrows by temperature
    #[arg(long)]
    pub temp: bool,

    #[arg(long = "tmin", value_name = "T", requires = "temp", allow_hyphen_values = true)]
    pub t_min: Option<f64>,
    #[arg(long = "tmax", value_name = "T", requires = "temp", allow_hyphen_values = true)]
    pub t_max: Option<f64>,

    #[command(flatten)]
    pub droplet: DropletArgs,

    #[command(flatten)]
    pub figure: FigureArgs,
}

#[derive(Args, Debug)]
pub struct DensityPlotArgs {
    #[command(flatten)]
    pub input: MapInputArgs,

    /// Mass drawn at full colour, by default the largest mass of a map
    #[arg(long, value_name = "MASS")]
    pub norm: Option<f64>,

    #[command(flatten)]
    pub droplet: DropletArgs,

    #[command(flatten)]
    pub figure: FigureArgs,
}

#[derive(Args, Debug)]
pub struct SpreadPlotArgs {
    /// Spread files to draw
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Image file to write
    #[arg(short, long, value_name = "PATH")]
    pub save: PathBuf,

    /// Draw the radius instead of both edges
    #[arg(long)]
    pub radius: bool,

    /// Height of error bars in standard errors [default: 1]
    #[arg(long, value_name = "FLOAT")]
    pub sigma: Option<f64>,

    /// Do not draw error bars
    #[arg(long)]
    pub noerror: bool,

    /// Shift every series so that its first record is at time zero
    #[arg(long)]
    pub relative: bool,

    /// Line colour of a series, in the order of the files
    #[arg(short = 'C', long = "colour", value_name = "COLOUR")]
    pub colours: Vec<String>,

    /// Legend label of a series, in the order of the files
    #[arg(short, long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    #[command(flatten)]
    pub figure: FigureArgs,
}

#[derive(Args, Debug)]
pub struct PrintArgs {
    /// Maps to print
    #[arg(required = true, value_name = "MAP")]
    pub maps: Vec<PathBuf>,

    /// Print only droplet cells
    #[arg(long)]
    pub droplet: bool,

    #[command(flatten)]
    pub droplet_options: DropletArgs,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Map to inspect
    pub map: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "flowtools",
            "info",
            "map.dat",
            "-vv",
            "-S",
            "droplet.min-mass=2",
            "-c",
            "flowtools.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.set_values, vec!["droplet.min-mass=2"]);
        assert_eq!(cli.config, Some(PathBuf::from("flowtools.toml")));
        assert!(matches!(cli.command, Commands::Info(_)));
    }

    #[test]
    fn spread_takes_positional_base_floor_and_save() {
        let cli = Cli::try_parse_from([
            "flowtools", "spread", "run/map_", "3", "spread.dat", "--delta-t", "2.5", "-m", "1",
        ])
        .unwrap();
        let Commands::Spread(args) = cli.command else {
            panic!("expected spread command");
        };
        assert_eq!(args.base, "run/map_");
        assert_eq!(args.floor, 3);
        assert_eq!(args.delta_t, Some(2.5));
        assert_eq!(args.droplet.min_mass, Some(1.0));
        assert_eq!(args.frames.start, 1);
    }

    #[test]
    fn coarsen_requires_two_factors() {
        assert!(
            Cli::try_parse_from(["flowtools", "coarsen", "-i", "a", "-o", "b", "-n", "2"]).is_err()
        );
        let cli =
            Cli::try_parse_from(["flowtools", "coarsen", "-i", "a", "-o", "b", "-n", "2", "3"])
                .unwrap();
        let Commands::Coarsen(args) = cli.command else {
            panic!("expected coarsen command");
        };
        assert_eq!(args.cells, vec![2, 3]);
    }

    #[test]
    fn velocity_defaults_follow_common_usage() {
        let cli = Cli::try_parse_from(["flowtools", "spread-velocity", "a.dat", "b.dat"]).unwrap();
        let Commands::SpreadVelocity(args) = cli.command else {
            panic!("expected spread-velocity command");
        };
        assert_eq!(args.files.len(), 2);
        assert_eq!((args.average, args.sample), (5, 1));
        assert_eq!(args.kind, VelocityKind::Diameter);
        assert_eq!(args.include, WindowMode::Full);
        assert_eq!(args.sync, SyncMode::Com);
    }

    #[test]
    fn retime_requires_time_step_and_takes_outputs() {
        assert!(Cli::try_parse_from(["flowtools", "retime", "a.dat"]).is_err());
        let cli = Cli::try_parse_from([
            "flowtools", "retime", "a.dat", "b.dat", "--dt", "0.5", "--t0", "-1", "-o", "c.dat",
            "d.dat",
        ])
        .unwrap();
        let Commands::Retime(args) = cli.command else {
            panic!("expected retime command");
        };
        assert_eq!(args.delta_t, 0.5);
        assert_eq!(args.t0, Some(-1.0));
        assert_eq!(args.output, vec![PathBuf::from("c.dat"), PathBuf::from("d.dat")]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["flowtools", "-q", "-v", "info", "map.dat"]).is_err());
    }
}
