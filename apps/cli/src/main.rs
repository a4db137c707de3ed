mod draft_file;
mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};
use serde_json::{Value, json};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use strategy_canvas::{CanvasConfig, CanvasError, CanvasSession, strategy_canvas};

use crate::draft_file::{DraftFile, LoadError};

const CLI_VERSION: &str = "1.0";

const EXIT_OK: i32 = 0;
const EXIT_VALIDATION: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_INVALID_INPUT: i32 = 3;

#[derive(Parser, Debug)]
#[command(name = "canvas", version, about = "Score competitors and print a strategy canvas")]
struct Cli {
    /// Wrap output in a JSON envelope.
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, global = true)]
    verbose: bool,
    /// JSON config file. Falls back to $CANVAS_CONFIG.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a blank draft file.
    Template {
        #[arg(long)]
        competitors: Option<usize>,
        #[arg(long)]
        features: Option<usize>,
    },
    /// Check that every name in a draft file is filled in.
    Validate { file: PathBuf },
    /// Submit a draft file and print the normalized score matrix.
    Table { file: PathBuf },
    /// Submit a draft file and print the strategy canvas chart data.
    Chart { file: PathBuf },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Template { .. } => "template",
            Command::Validate { .. } => "validate",
            Command::Table { .. } => "table",
            Command::Chart { .. } => "chart",
        }
    }
}

struct Output {
    data: Value,
    text: String,
}

#[derive(Debug)]
struct CliError {
    code: i32,
    command: String,
    kind: String,
    message: String,
    fields: Option<Value>,
}

impl CliError {
    fn canvas(cmd: &str, err: CanvasError) -> Self {
        let code = match &err {
            CanvasError::Validation(_) => EXIT_VALIDATION,
            CanvasError::Io(_) => EXIT_IO,
            _ => EXIT_INVALID_INPUT,
        };
        let fields = match &err {
            CanvasError::Validation(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        };
        Self {
            code,
            command: cmd.to_string(),
            kind: err.kind().to_string(),
            message: err.to_string(),
            fields,
        }
    }

    fn load(cmd: &str, err: LoadError) -> Self {
        match err {
            LoadError::Canvas(err) => Self::canvas(cmd, err),
            LoadError::TooManyScores { row, given, metrics } => Self {
                code: EXIT_INVALID_INPUT,
                command: cmd.to_string(),
                kind: "InvalidInput".to_string(),
                message: format!("row {row:?} has {given} scores but there are only {metrics} metrics"),
                fields: None,
            },
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: EXIT_INVALID_INPUT,
            command: "unknown".to_string(),
            kind: "InvalidCommand".to_string(),
            message: message.into(),
            fields: None,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let json_mode = std::env::args().any(|a| a == "--json");
            print_error(json_mode, CliError::invalid(err.to_string().trim_end()));
        }
    };
    init_logging(cli.verbose);

    let command_name = cli.command.name();
    match run(&cli) {
        Ok(output) => {
            print_success(cli.json, command_name, output);
            std::process::exit(EXIT_OK);
        }
        Err(err) => print_error(cli.json, err),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        std::env::var("CANVAS_LOG")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(LevelFilter::Error)
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

fn run(cli: &Cli) -> Result<Output, CliError> {
    let cmd = cli.command.name();
    let config = CanvasConfig::resolve(cli.config.as_deref()).map_err(|e| CliError::canvas(cmd, e))?;
    debug!("running {cmd} with {config:?}");

    match &cli.command {
        Command::Template { competitors, features } => cmd_template(&config, *competitors, *features),
        Command::Validate { file } => cmd_validate(&config, file),
        Command::Table { file } => cmd_table(&config, file),
        Command::Chart { file } => cmd_chart(&config, file),
    }
}

fn load_session(cmd: &str, config: &CanvasConfig, file: &Path) -> Result<CanvasSession, CliError> {
    let draft = DraftFile::read(file).map_err(|e| CliError::canvas(cmd, e))?;
    draft.into_session(config).map_err(|e| CliError::load(cmd, e))
}

fn cmd_template(config: &CanvasConfig, competitors: Option<usize>, features: Option<usize>) -> Result<Output, CliError> {
    let draft = DraftFile::blank(
        competitors.unwrap_or(config.initial_competitors),
        features.unwrap_or(config.initial_features),
    );
    let data = serde_json::to_value(&draft).map_err(|e| CliError::canvas("template", e.into()))?;
    let text = serde_json::to_string_pretty(&data).map_err(|e| CliError::canvas("template", e.into()))?;
    Ok(Output { data, text })
}

fn cmd_validate(config: &CanvasConfig, file: &Path) -> Result<Output, CliError> {
    let session = load_session("validate", config, file)?;
    let errors = session.draft().validate();
    if !errors.is_empty() {
        return Err(CliError::canvas("validate", CanvasError::Validation(errors)));
    }
    Ok(Output {
        data: json!({
            "valid": true,
            "entrants": session.draft().entrant_count(),
            "metrics": session.draft().metric_count(),
        }),
        text: "Draft is complete.".to_string(),
    })
}

fn cmd_table(config: &CanvasConfig, file: &Path) -> Result<Output, CliError> {
    let mut session = load_session("table", config, file)?;
    let matrix = session.submit().map_err(|e| CliError::canvas("table", e))?;
    let data = serde_json::to_value(matrix).map_err(|e| CliError::canvas("table", e.into()))?;
    let text = render::matrix_table(matrix, config.layout);
    Ok(Output { data, text })
}

fn cmd_chart(config: &CanvasConfig, file: &Path) -> Result<Output, CliError> {
    let mut session = load_session("chart", config, file)?;
    let matrix = session.submit().map_err(|e| CliError::canvas("chart", e))?;
    let canvas = strategy_canvas(matrix, &config.palette);
    let data = serde_json::to_value(&canvas).map_err(|e| CliError::canvas("chart", e.into()))?;
    let text = render::chart_lines(&canvas);
    Ok(Output { data, text })
}

fn print_success(json_mode: bool, command: &str, output: Output) {
    if json_mode {
        let response = json!({
            "status": "ok",
            "version": CLI_VERSION,
            "command": command,
            "data": output.data,
            "error": null
        });
        println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
    } else {
        println!("{}", output.text);
    }
}

fn print_error(json_mode: bool, err: CliError) -> ! {
    if json_mode {
        let response = json!({
            "status": "error",
            "version": CLI_VERSION,
            "command": err.command,
            "data": null,
            "error": {
                "code": err.code,
                "type": err.kind,
                "message": err.message,
                "fields": err.fields
            }
        });
        eprintln!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
    } else {
        eprintln!("Error: {}", err.message);
        if let Some(fields) = err.fields.as_ref().and_then(Value::as_object) {
            for (key, message) in fields {
                eprintln!("  {key}: {}", message.as_str().unwrap_or_default());
            }
        }
    }
    std::process::exit(err.code);
}
