use std::{io::Write, path::PathBuf, process};

use clap::{Parser, Subcommand};
use log::{LevelFilter, info};

use py3ode_setup::{BuildConfig, Setup, SystemRunner};

#[derive(Parser)]
#[command(name = "py3ode-setup", version, about = "Build and package the Py3ODE extension module")]
struct Cli {
    /// Directory containing src/ode.pyx and the xode package
    #[arg(long, default_value = ".", global = true)]
    project_dir: PathBuf,
    /// Build with trimesh support (ODE compiled with OPCODE)
    #[arg(long, global = true, conflicts_with = "no_trimesh")]
    trimesh: bool,
    /// Build without trimesh support
    #[arg(long, global = true)]
    no_trimesh: bool,
    /// Print the resolved build plan and debug output
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Locate ODE, generate the C sources and compile the module
    Build {
        /// Staging directory (default: <project>/build)
        #[arg(long)]
        build_dir: Option<PathBuf>,
    },
    /// Build, then copy the module and helper package into site-packages
    Install {
        /// Install here instead of the interpreter's platlib
        #[arg(long)]
        target: Option<PathBuf>,
    },
    /// Generate both variants and write a source archive
    Sdist {
        #[arg(long, default_value = "dist")]
        dist_dir: PathBuf,
    },
    /// Locate ODE and (re)generate both C sources only
    Generate,
    /// Download and install ODE with the bundled install_ode.sh
    InstallOde,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        log::log!(e.log_level(), "{e}");
        process::exit(e.exit_code());
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .format(|buf, record| {
            let level = match record.level() {
                log::Level::Warn => "WARNING".to_string(),
                other => other.to_string(),
            };
            writeln!(buf, "{level}: {}", record.args())
        })
        .init();
}

fn run(cli: Cli) -> py3ode_setup::Result<()> {
    let mut cfg = BuildConfig::load(&cli.project_dir)?;
    if cli.trimesh {
        cfg.trimesh = true;
    } else if cli.no_trimesh {
        cfg.trimesh = false;
    }
    cfg.verbose |= cli.verbose;
    if let Commands::Build {
        build_dir: Some(dir),
    } = &cli.command
    {
        cfg.build_dir = cfg.project_path(dir);
    }

    let runner = SystemRunner;
    let setup = Setup::new(&cfg, &runner);

    match cli.command {
        Commands::Build { .. } => {
            let built = setup.build()?;
            info!("module: {}", built.module.display());
        }
        Commands::Install { target } => {
            let target = target.map(|dir| cfg.project_path(dir));
            for path in setup.install(target.as_deref())? {
                info!("installed {}", path.display());
            }
        }
        Commands::Sdist { dist_dir } => {
            let dist_dir = cfg.project_path(dist_dir);
            setup.sdist(&dist_dir)?;
        }
        Commands::Generate => {
            setup.generate()?;
        }
        Commands::InstallOde => setup.install_ode()?,
    }
    Ok(())
}
