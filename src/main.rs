//! bake - a declarative command-recipe runner
//!
//! Usage:
//!   bake              Run the first-declared recipe
//!   bake <name>       Run the named recipe
//!   bake -l           List recipes in declaration order

use bake::{parse, signals, Context, Executor, RegistryError, Resolver, EXIT_USAGE};
use std::env;
use std::fs;
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_FILE: &str = "Bakefile";

fn print_help() {
    println!(
        r#"bake {} - a declarative command-recipe runner

USAGE:
    bake                    Run the first-declared recipe
    bake <recipe>           Run the named recipe
    bake -l, --list         List recipe names in declaration order
    bake -f, --file <path>  Read recipes from <path> (default: ./Bakefile)
    bake --help             Show this help message
    bake --version          Show version

FILE FORMAT:
    # comment
    name:                   Recipe header at column zero
        command line        Indented lines run in order via sh -c

SUBSTITUTION (applied to each line just before it runs):
    $VAR, ${{VAR}}            Environment variable (undefined is an error)
    $(cmd), `cmd`           Output of cmd, trailing newline stripped
    $$                      Literal dollar sign

EXIT CODES:
    0                       Recipe succeeded
    N                       Recipe line (or its substitution) exited N
    2                       Bad invocation: unknown recipe, bad file, bad flag
    130                     Interrupted
"#,
        VERSION
    );
}

fn print_version() {
    println!("bake {}", VERSION);
}

/// Parsed command-line arguments
struct CliArgs {
    list: bool,
    file: Option<String>,
    recipe: Option<String>,
    help: bool,
    version: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut cli = CliArgs {
        list: false,
        file: None,
        recipe: None,
        help: false,
        version: false,
    };

    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "-l" | "--list" => {
                cli.list = true;
            }
            "-f" | "--file" => {
                i += 1;
                match args.get(i) {
                    Some(path) => cli.file = Some(path.clone()),
                    None => return Err(format!("{} requires a path", args[i - 1])),
                }
            }
            "--help" | "-h" => {
                cli.help = true;
            }
            "--version" | "-V" => {
                cli.version = true;
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown flag: {}", flag));
            }
            name => {
                if cli.recipe.is_some() {
                    return Err(format!("unexpected argument: {}", name));
                }
                cli.recipe = Some(name.to_string());
            }
        }
        i += 1;
    }

    Ok(cli)
}

fn exit_code_from(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) if code != 0 => ExitCode::from(code),
        _ => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("bake: {}", e);
            return exit_code_from(EXIT_USAGE);
        }
    };

    if cli.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    let path = cli.file.as_deref().unwrap_or(DEFAULT_FILE);
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("bake: error reading {}: {}", path, e);
            return exit_code_from(EXIT_USAGE);
        }
    };

    let registry = match parse(&text) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("bake: {}: {}", path, e);
            return exit_code_from(EXIT_USAGE);
        }
    };

    // Listing runs nothing
    if cli.list {
        for recipe in registry.list() {
            println!("{}", recipe.name());
        }
        return ExitCode::SUCCESS;
    }

    let recipe = match Resolver::new(&registry).resolve(cli.recipe.as_deref()) {
        Ok(recipe) => recipe,
        Err(e) => {
            eprintln!("bake: {}", e);
            if matches!(e, RegistryError::UnknownRecipe { .. }) && !registry.is_empty() {
                eprintln!("bake: valid recipes are: {}", registry.names().join(", "));
            }
            return exit_code_from(EXIT_USAGE);
        }
    };

    signals::install();
    let ctx = Context::from_env();
    let mut executor = Executor::new();
    match executor.execute(recipe, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bake: {}", e);
            exit_code_from(e.exit_code())
        }
    }
}
