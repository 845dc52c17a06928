use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use log::{error, info, warn};
use thiserror::Error;

use molsculpt::{parse_xyz, write_xyz, Config, Scene, StructureSpec};

const DEFAULT_FRAMES: usize = 300;
const DEFAULT_DT: f32 = 1.0 / 60.0;

const USAGE: &str = "usage: molsculpt [--config FILE] [--frames N] [--dt SECONDS] [--out FILE] \
                     (--structure FILE.json | --xyz FILE.xyz | SYMBOL...)";

#[derive(Error, Debug)]
enum AppError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] molsculpt::ConfigError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid structure file: {0}")]
    StructureJson(#[from] serde_json::Error),

    #[error(transparent)]
    Structure(#[from] molsculpt::StructureError),

    #[error(transparent)]
    Xyz(#[from] molsculpt::XyzError),
}

enum Input {
    Structure(PathBuf),
    Xyz(PathBuf),
    Symbols(Vec<String>),
}

struct Args {
    config: Option<PathBuf>,
    frames: usize,
    dt: f32,
    out: Option<PathBuf>,
    input: Input,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, AppError> {
        let mut config = None;
        let mut frames = DEFAULT_FRAMES;
        let mut dt = DEFAULT_DT;
        let mut out = None;
        let mut input = None;
        let mut symbols = Vec::new();

        let value = |flag: &str, next: Option<String>| {
            next.ok_or_else(|| AppError::Usage(format!("{flag} needs a value")))
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => config = Some(PathBuf::from(value(arg.as_str(), args.next())?)),
                "--out" => out = Some(PathBuf::from(value(arg.as_str(), args.next())?)),
                "--frames" => {
                    frames = value(arg.as_str(), args.next())?
                        .parse()
                        .map_err(|_| AppError::Usage("--frames must be a whole number".into()))?
                }
                "--dt" => {
                    dt = value(arg.as_str(), args.next())?
                        .parse()
                        .map_err(|_| AppError::Usage("--dt must be a number".into()))?
                }
                "--structure" => {
                    input = Some(Input::Structure(value(arg.as_str(), args.next())?.into()))
                }
                "--xyz" => input = Some(Input::Xyz(value(arg.as_str(), args.next())?.into())),
                flag if flag.starts_with("--") => {
                    return Err(AppError::Usage(format!("unknown option {flag}")))
                }
                _ => symbols.push(arg),
            }
        }

        let input = match (input, symbols.is_empty()) {
            (Some(_), false) => {
                return Err(AppError::Usage(
                    "element symbols cannot be mixed with an input file".into(),
                ))
            }
            (Some(input), true) => input,
            (None, false) => Input::Symbols(symbols),
            (None, true) => return Err(AppError::Usage("nothing to build".into())),
        };
        Ok(Self {
            config,
            frames,
            dt,
            out,
            input,
        })
    }
}

fn read(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut scene = Scene::new(config);

    match &args.input {
        Input::Structure(path) => {
            let spec: StructureSpec = serde_json::from_str(&read(path)?)?;
            scene.build_structure(&spec)?;
        }
        Input::Xyz(path) => {
            let frame = parse_xyz(&read(path)?)?;
            scene.import_xyz(&frame)?;
        }
        Input::Symbols(symbols) => {
            for symbol in symbols {
                if scene.add_element(symbol, None).is_none() {
                    warn!("could not add {symbol}");
                }
            }
        }
    }

    for _ in 0..args.frames {
        scene.tick(args.dt);
    }

    let molecule = scene.molecule();
    info!(
        "{} ({} atoms, {} bonds)",
        molecule.formula(),
        molecule.atom_count(),
        molecule.bond_count()
    );
    for (atom, issues) in molecule.invalid_atoms() {
        let symbol = molecule.get_atom(atom).map_or("?", |a| a.symbol());
        for issue in issues {
            warn!("{symbol}{atom}: {issue}");
        }
    }

    let xyz = write_xyz(molecule);
    match &args.out {
        Some(path) => fs::write(path, xyz).map_err(|source| AppError::Io {
            path: path.clone(),
            source,
        })?,
        None => print!("{xyz}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = Args::parse(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            if matches!(err, AppError::Usage(_)) {
                error!("{USAGE}");
            }
            ExitCode::FAILURE
        }
    }
}
