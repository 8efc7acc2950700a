use anyhow::Result;
use fern::colors::{Color, ColoredLevelConfig};
use pbrt_scene::parse_scene;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "pbrt-scene")]
struct Args {
    /// set LOG verbosity
    #[structopt(short, long)]
    verbose: bool,

    /// Specify the file that log messages should be written to
    #[structopt(short, long)]
    logfile: Option<PathBuf>,

    /// Print all logging messages to stderr
    #[structopt(short = "e", long)]
    logtostderr: bool,

    #[structopt(parse(from_os_str))]
    /// Path to PBRT scene description file
    input: PathBuf,
}

fn setup_logging(verbose: bool, logfile: Option<PathBuf>, stderr: bool) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green);

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut base_config = fern::Dispatch::new().level(level);

    if let Some(logfile) = logfile {
        let file_config = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!("[{}] {}", record.level(), message))
            })
            .chain(fern::log_file(logfile)?);

        base_config = base_config.chain(file_config);
    }

    if stderr {
        let stderr_config = fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "\x1B[{}m[{}] {}\x1B[0m",
                    colors.get_color(&record.level()).to_fg_str(),
                    record.level(),
                    message,
                ));
            })
            .chain(std::io::stderr());

        base_config = base_config.chain(stderr_config);
    }

    base_config.apply()?;
    Ok(())
}

fn main() -> Result<()> {
    let args: Args = Args::from_args();

    setup_logging(args.verbose, args.logfile, args.logtostderr)?;

    let scene = parse_scene(&args.input)?;

    log::info!(
        "Parsed \"{}\": {} cameras, {} shape groups, {} instances, {} materials, {} textures, {} environments",
        args.input.display(),
        scene.cameras.len(),
        scene.shapes.len(),
        scene.instances.len(),
        scene.materials.len(),
        scene.textures.len(),
        scene.environments.len(),
    );

    Ok(())
}
