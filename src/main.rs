//! suppression-rules - Validation for security finding suppression rules
//!
//! Reads JSON from stdin and writes JSON to stdout.
//!
//! # Usage
//!
//! ```bash
//! # Validate a whole Inspector rule form
//! echo '{"id":"*","resourcePattern":"arn:aws:lambda:*:*:function:foo"}' | suppression-rules
//!
//! # Live check of a single field
//! echo '{"id":"*","resourcePattern":"arn:aws:s3:::bucket"}' | suppression-rules --field resourcePattern
//!
//! # Apply a change to the rule store
//! suppression-rules --create --store rules.json < rule.json
//! ```

use std::env;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde_json::json;
use suppression_rules::{
    audit::AuditLogger,
    config::{Config, Strictness},
    model::{InspectorForm, SuppressionRule, ValidationInput},
    result::FormField,
    store::{RuleStore, StoreError},
    validation::ValidationEngine,
};

/// Print version information
fn print_version() {
    println!("suppression-rules {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"suppression-rules - Validation for security finding suppression rules

USAGE:
    suppression-rules [OPTIONS] < input.json

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -f, --field NAME        Check one field: id, resourcePattern, resourceType, resourceFields
    -s, --strict            Strict identifier validation
    -c, --config PATH       Path to config file
        --store PATH        Path to the JSON rule store
        --list              Print all stored rules
        --create            Create the rule read from stdin
        --update            Update the rule read from stdin
        --delete            Delete the rule (id, ser_id) read from stdin
    -u, --user NAME         Name recorded in the audit log (default: $USER)

ENVIRONMENT:
    SUPPRESSION_RULES_STRICT=1  Strict identifier validation

EXIT STATUS:
    0 when the input is valid or the change was applied, 1 otherwise
"#
    );
}

/// What to do with the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Validate,
    List,
    Create,
    Update,
    Delete,
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    mode: Mode,
    field: Option<Result<FormField, String>>,
    strict: bool,
    config_path: Option<String>,
    store_path: Option<String>,
    user: Option<String>,
}

impl Args {
    fn parse() -> Self {
        Self::parse_from(env::args())
    }

    fn parse_from(args: impl IntoIterator<Item = String>) -> Self {
        let args: Vec<String> = args.into_iter().collect();
        let mut result = Args {
            help: false,
            version: false,
            mode: Mode::Validate,
            field: None,
            strict: false,
            config_path: None,
            store_path: None,
            user: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-s" | "--strict" => result.strict = true,
                "--list" => result.mode = Mode::List,
                "--create" => result.mode = Mode::Create,
                "--update" => result.mode = Mode::Update,
                "--delete" => result.mode = Mode::Delete,
                "-f" | "--field" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.field = Some(args[i].parse());
                    } else {
                        result.field = Some(Err("--field requires a field name".to_string()));
                    }
                }
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                "--store" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.store_path = Some(args[i].clone());
                    }
                }
                "-u" | "--user" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.user = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--field=") => {
                    result.field = Some(arg.trim_start_matches("--field=").parse());
                }
                arg if arg.starts_with("--config=") => {
                    result.config_path = Some(arg.trim_start_matches("--config=").to_string());
                }
                arg if arg.starts_with("--store=") => {
                    result.store_path = Some(arg.trim_start_matches("--store=").to_string());
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn read_stdin() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    Ok(input)
}

fn emit(value: &serde_json::Value) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", value);
    let _ = handle.flush();
}

fn status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Validate stdin input, returning the JSON result and its validity
///
/// Rule records are checked with the product rules; bare forms always get
/// the Inspector checks.
fn evaluate(
    engine: &ValidationEngine,
    field: Option<FormField>,
    input: &str,
) -> Result<(serde_json::Value, bool), serde_json::Error> {
    // Blank input is a form with every field absent
    let input = if input.trim().is_empty() {
        ValidationInput::Form(InspectorForm::default())
    } else {
        ValidationInput::from_json(input)?
    };

    let (value, valid) = match (&input, field) {
        (ValidationInput::Form(form), Some(field)) => {
            let result = engine.check_field(form, field);
            (serde_json::to_value(&result)?, result.is_valid())
        }
        (ValidationInput::Form(form), None) => {
            let result = engine.check_form(form);
            (serde_json::to_value(&result)?, result.is_valid())
        }
        (ValidationInput::Rule(rule), Some(field)) => {
            let result = engine.check_rule_field(rule, field);
            (serde_json::to_value(&result)?, result.is_valid())
        }
        (ValidationInput::Rule(rule), None) => {
            let result = engine.check_rule(rule);
            (serde_json::to_value(&result)?, result.is_valid())
        }
    };

    Ok((value, valid))
}

fn validate(engine: &ValidationEngine, field: Option<FormField>, input: &str) -> ExitCode {
    match evaluate(engine, field, input) {
        Ok((value, valid)) => {
            emit(&value);
            status(valid)
        }
        Err(e) => {
            eprintln!("Error: Failed to parse input: {}", e);
            emit(&json!({"valid": false, "message": format!("Failed to parse input: {}", e)}));
            ExitCode::FAILURE
        }
    }
}

fn open_store(path: &Path, config: &Config) -> Result<RuleStore, StoreError> {
    if path.exists() {
        RuleStore::load_json(path)
    } else if config.store.seed_demo_data {
        RuleStore::with_demo_data()
    } else {
        Ok(RuleStore::new())
    }
}

fn apply(mode: Mode, store: &mut RuleStore, input: &str, actor: &str) -> Result<String, StoreError> {
    let rule = SuppressionRule::from_json(input)?;

    match mode {
        Mode::Create => store
            .create(rule, actor)
            .map(|r| format!("Created item with data: {}", r.summary())),
        Mode::Update => store
            .update(rule, actor)
            .map(|r| format!("Updated item with data: {}", r.summary())),
        Mode::Delete => store
            .delete(&rule.id, &rule.ser_id, actor)
            .map(|r| format!("Deleted item with data: {}", r.summary())),
        Mode::Validate | Mode::List => Ok(String::new()),
    }
}

fn run_store(mode: Mode, args: &Args, config: &Config, engine: ValidationEngine) -> ExitCode {
    let store_path = args
        .store_path
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| config.store_path());

    let Some(store_path) = store_path else {
        eprintln!("Error: No rule store configured (use --store PATH)");
        return ExitCode::FAILURE;
    };

    let store = match open_store(&store_path, config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}: {}", store_path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if mode == Mode::List {
        emit(&serde_json::to_value(store.list()).unwrap_or_default());
        return ExitCode::SUCCESS;
    }

    let audit_path = if config.general.audit_log {
        config.audit_path()
    } else {
        None
    };
    let mut store = store
        .with_engine(engine)
        .with_audit(AuditLogger::new(audit_path.as_deref()));

    let input = match read_stdin() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: Failed to read input: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let actor = args
        .user
        .clone()
        .or_else(|| env::var("USER").ok())
        .unwrap_or_default();

    match apply(mode, &mut store, &input, &actor) {
        Ok(message) => {
            if let Err(e) = store.save_json(&store_path) {
                eprintln!("Error: {}: {}", store_path.display(), e);
                return ExitCode::FAILURE;
            }
            emit(&json!({"ok": true, "message": message}));
            ExitCode::SUCCESS
        }
        Err(StoreError::Invalid(result)) => {
            emit(&json!({
                "ok": false,
                "message": "Inspector validation failed",
                "validation": serde_json::to_value(&result).unwrap_or_default(),
            }));
            ExitCode::FAILURE
        }
        Err(e) => {
            emit(&json!({"ok": false, "message": e.to_string()}));
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    // Load configuration
    let mut config = if let Some(ref path) = args.config_path {
        Config::load_from(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config from {}: {}", path, e);
            Config::default()
        })
    } else {
        Config::load()
    };

    if args.strict {
        config.validation.strictness = Strictness::Strict;
    }

    let engine = ValidationEngine::from_config(&config);

    let field = match args.field.clone().transpose() {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.mode {
        Mode::Validate => match read_stdin() {
            Ok(input) => validate(&engine, field, &input),
            Err(e) => {
                eprintln!("Error: Failed to read input: {}", e);
                ExitCode::FAILURE
            }
        },
        mode => run_store(mode, &args, &config, engine),
    }
}
