use indexmap::IndexMap;
use labelproof::memory::MemorySurface;
use labelproof::{
    DimensionTable, OFFSET_ACTION_SET, ProofConfig, ProofContext, create_proof,
    missing_offset_actions,
};
use labelproof_core::geom::inches_to_points;
use labelproof_core::prefs::PREFS_FILE_NAME;
use labelproof_core::{LabelType, LegendKey, LegendLibrary, Preferences, most_recent_template};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(labelproof_core::Error),
    Proof(labelproof::Error),
    Json(serde_json::Error),
    MissingActions(Vec<String>),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Proof(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::MissingActions(missing) => {
                write!(f, "Missing required actions:\n\n{}", missing.join("\n"))
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<labelproof_core::Error> for CliError {
    fn from(value: labelproof_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<labelproof::Error> for CliError {
    fn from(value: labelproof::Error) -> Self {
        Self::Proof(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Default)]
enum Command {
    #[default]
    Create,
    CheckActions,
    Band {
        label_type: String,
        inches: String,
    },
    Legend,
    Prefs {
        set_default_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    legends: Option<PathBuf>,
    dimension_table: Option<PathBuf>,
    actions: Option<PathBuf>,
    prefs: Option<PathBuf>,
    out: Option<PathBuf>,
    svg: Option<PathBuf>,
}

/// Recorded actions file: action set -> action -> offsets in inches.
type ActionsFile = IndexMap<String, IndexMap<String, Vec<f64>>>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOut {
    status: &'static str,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    svg: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LegendOut {
    file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrefsOut {
    #[serde(flatten)]
    prefs: Preferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    most_recent_template: Option<PathBuf>,
}

fn usage() -> &'static str {
    "labelproof-cli\n\
\n\
USAGE:\n\
  labelproof-cli [create] [--legends <dir>] [--dimension-table <file>] [--actions <file>] [--out <doc.json>] [--svg <file>] [--pretty] [<config.json>|-]\n\
  labelproof-cli check-actions [--actions <file>]\n\
  labelproof-cli band <label-type> <inches> [--dimension-table <file>] [--pretty]\n\
  labelproof-cli legend [--legends <dir>] [--pretty] [<config.json>|-]\n\
  labelproof-cli prefs [--prefs <file>] [--set-default-dir <dir>] [--pretty]\n\
\n\
NOTES:\n\
  - If <config.json> is omitted or '-', the proof config is read from stdin.\n\
  - create prints a JSON status; --out saves the document, --svg writes a preview.\n\
  - --actions replaces the standard 'Proofer Actions' with offsets (inches) from a JSON file.\n\
  - Set LABELPROOF_LOG (e.g. 'debug') to see progress on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut positional: Vec<String> = Vec::new();
    // The first positional word may name the command; anything else is an input.
    let mut command_seen = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--legends" => args.legends = Some(PathBuf::from(next_value(&mut it)?)),
            "--dimension-table" => {
                args.dimension_table = Some(PathBuf::from(next_value(&mut it)?));
            }
            "--actions" => args.actions = Some(PathBuf::from(next_value(&mut it)?)),
            "--prefs" => args.prefs = Some(PathBuf::from(next_value(&mut it)?)),
            "--out" => args.out = Some(PathBuf::from(next_value(&mut it)?)),
            "--svg" => args.svg = Some(PathBuf::from(next_value(&mut it)?)),
            "--set-default-dir" => {
                let dir = PathBuf::from(next_value(&mut it)?);
                match &mut args.command {
                    Command::Prefs { set_default_dir } => *set_default_dir = Some(dir),
                    _ => return Err(CliError::Usage(usage())),
                }
            }
            "-" => positional.push(a.clone()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            word => positional.push(word.to_string()),
        }
        if !command_seen && positional.len() == 1 {
            command_seen = true;
            let command = match positional[0].as_str() {
                "create" => Some(Command::Create),
                "check-actions" => Some(Command::CheckActions),
                "band" => Some(Command::Band {
                    label_type: String::new(),
                    inches: String::new(),
                }),
                "legend" => Some(Command::Legend),
                "prefs" => Some(Command::Prefs {
                    set_default_dir: None,
                }),
                _ => None,
            };
            if let Some(command) = command {
                args.command = command;
                positional.clear();
            }
        }
    }

    match &mut args.command {
        Command::Create | Command::Legend => match positional.as_slice() {
            [] => {}
            [input] => args.input = Some(input.clone()),
            _ => return Err(CliError::Usage(usage())),
        },
        Command::Band { label_type, inches } => match positional.as_slice() {
            [lt, value] => {
                *label_type = lt.clone();
                *inches = value.clone();
            }
            _ => return Err(CliError::Usage(usage())),
        },
        Command::CheckActions | Command::Prefs { .. } => {
            if !positional.is_empty() {
                return Err(CliError::Usage(usage()));
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn read_config(input: Option<&str>) -> Result<ProofConfig, CliError> {
    let text = read_input(input)?;
    Ok(ProofConfig::from_json(&text)?.normalized())
}

fn load_table(path: Option<&Path>) -> Result<DimensionTable, CliError> {
    match path {
        Some(path) => Ok(DimensionTable::load(path)?),
        None => Ok(DimensionTable::standard()),
    }
}

fn build_surface(actions: Option<&Path>) -> Result<MemorySurface, CliError> {
    let Some(path) = actions else {
        return Ok(MemorySurface::with_standard_actions());
    };
    let text = std::fs::read_to_string(path)?;
    let recorded: ActionsFile = serde_json::from_str(&text)?;
    let mut surface = MemorySurface::new();
    for (set, actions) in recorded {
        for (action, offsets) in actions {
            let offsets = offsets.into_iter().map(inches_to_points).collect();
            surface.register_action(&set, &action, offsets);
        }
    }
    Ok(surface)
}

fn run(args: Args) -> Result<(), CliError> {
    match &args.command {
        Command::Create => {
            let config = read_config(args.input.as_deref())?;
            let mut ctx = ProofContext::default()
                .with_dimension_table(load_table(args.dimension_table.as_deref())?);
            if let Some(dir) = &args.legends {
                ctx = ctx.with_legends(dir);
            }
            let mut surface = build_surface(args.actions.as_deref())?;

            let outcome = create_proof(&mut surface, &config, &ctx)?;
            for warning in &outcome.warnings {
                eprintln!("warning: {warning}");
            }
            if let Some(out) = &args.out {
                surface.save_document(outcome.document, out)?;
            }
            if let Some(svg_path) = &args.svg {
                let model = surface.document_model(outcome.document)?;
                std::fs::write(svg_path, labelproof::svg::render_document(&model))?;
            }

            let out = CreateOut {
                status: outcome.status(),
                warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
                document: args.out.clone(),
                svg: args.svg.clone(),
            };
            write_json(&out, args.pretty)
        }
        Command::CheckActions => {
            let surface = build_surface(args.actions.as_deref())?;
            let missing = missing_offset_actions(&surface, OFFSET_ACTION_SET);
            if !missing.is_empty() {
                return Err(CliError::MissingActions(missing));
            }
            println!("All required actions are available.");
            Ok(())
        }
        Command::Band { label_type, inches } => {
            let label_type: LabelType = label_type.parse()?;
            let inches: f64 = inches.parse().map_err(|_| CliError::Usage(usage()))?;
            let table = load_table(args.dimension_table.as_deref())?;
            let selection = table.classify(label_type, inches)?;
            write_json(&selection, args.pretty)
        }
        Command::Legend => {
            let config = read_config(args.input.as_deref())?;
            let key = LegendKey::from_config(&config);
            let mut out = LegendOut {
                file_name: key.file_name(),
                path: None,
                exists: None,
            };
            if let Some(dir) = &args.legends {
                let (path, exists) = match LegendLibrary::new(dir).resolve(&key) {
                    Ok(path) => (path, true),
                    Err(labelproof_core::Error::LegendNotFound { path, .. }) => (path, false),
                    Err(err) => return Err(err.into()),
                };
                out.path = Some(path);
                out.exists = Some(exists);
            }
            write_json(&out, args.pretty)
        }
        Command::Prefs { set_default_dir } => {
            let path = args
                .prefs
                .clone()
                .unwrap_or_else(|| PathBuf::from(PREFS_FILE_NAME));
            let mut prefs = Preferences::load(&path);
            if let Some(dir) = set_default_dir {
                prefs.default_upload_dir = Some(dir.clone());
                prefs.save(&path)?;
                tracing::info!(prefs = %path.display(), dir = %dir.display(), "saved default upload directory");
            }
            let most_recent_template = match &prefs.default_upload_dir {
                Some(dir) if dir.is_dir() => most_recent_template(dir)?,
                _ => None,
            };
            write_json(
                &PrefsOut {
                    prefs,
                    most_recent_template,
                },
                args.pretty,
            )
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("LABELPROOF_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err @ CliError::MissingActions(_)) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
