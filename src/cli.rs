use capl_outline::outline::{OutlineGroup, SortOrder, GROUPS};
use capl_outline::output::OutputFormat;
use capl_outline::signature::DeclarationKind;

#[derive(Debug)]
pub struct CliArgs {
    pub root: String,
    pub globs: Vec<String>,
    pub files: Vec<String>,
    pub groups: Vec<OutlineGroup>,
    pub sort: Option<SortOrder>,
    pub format: OutputFormat,
    pub timeout: Option<u64>,
    pub excludes: Vec<String>,
    pub no_defaults: bool,
    pub verbose: bool,
}

#[derive(Debug)]
pub enum CliAction {
    Run(CliArgs),
    Help,
    Version,
}

pub fn parse_args(args: &[String]) -> Result<CliAction, String> {
    let mut root: Option<String> = None;
    let mut globs = Vec::new();
    let mut files = Vec::new();
    let mut kinds: Vec<DeclarationKind> = Vec::new();
    let mut sort: Option<SortOrder> = None;
    let mut format = OutputFormat::Yaml;
    let mut timeout: Option<u64> = None;
    let mut excludes = Vec::new();
    let mut no_defaults = false;
    let mut verbose = false;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--root" | "-d" => {
                i += 1;
                if i >= args.len() { return Err("Missing value for --root".into()); }
                root = Some(args[i].clone());
            }
            "--r" | "--glob" | "-g" => {
                i += 1;
                if i >= args.len() { return Err(format!("Missing value for {}", flag)); }
                globs.push(args[i].clone());
            }
            "--file" => {
                i += 1;
                if i >= args.len() { return Err("Missing value for --file".into()); }
                files.push(args[i].clone());
            }
            "--group" => {
                i += 1;
                if i >= args.len() { return Err("Missing value for --group".into()); }
                let kind = args[i].parse::<DeclarationKind>().map_err(|e| e.to_string())?;
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
            "--sort" => {
                i += 1;
                if i >= args.len() { return Err("Missing value for --sort".into()); }
                sort = Some(args[i].parse::<SortOrder>().map_err(|e| e.to_string())?);
            }
            "--format" => {
                i += 1;
                if i >= args.len() { return Err("Missing value for --format".into()); }
                format = match args[i].as_str() {
                    "yaml" => OutputFormat::Yaml,
                    "json" => OutputFormat::Json,
                    other => return Err(format!("Invalid value for --format: '{}'. Expected 'yaml' or 'json'.", other)),
                };
            }
            "--timeout" => {
                i += 1;
                if i >= args.len() { return Err("Missing value for --timeout".into()); }
                timeout = Some(args[i].parse::<u64>()
                    .map_err(|_| format!("Invalid integer for --timeout: {}", args[i]))?);
            }
            "--exclude" => {
                i += 1;
                if i >= args.len() { return Err("Missing value for --exclude".into()); }
                excludes.push(args[i].clone());
            }
            "--no-defaults" => no_defaults = true,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" | "-?" => return Ok(CliAction::Help),
            "--version" | "-V" => return Ok(CliAction::Version),
            other => return Err(format!("Unknown option: {}\nRun 'capl-outline --help' for usage information.", other)),
        }
        i += 1;
    }

    if !files.is_empty() && !globs.is_empty() {
        return Err("--file and --r are mutually exclusive and cannot be combined.".into());
    }

    // Group order is fixed regardless of the order flags were given in.
    let groups = GROUPS
        .iter()
        .copied()
        .filter(|g| kinds.is_empty() || kinds.contains(&g.kind))
        .collect();

    let root = root.unwrap_or_else(|| std::env::current_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| ".".into()));

    Ok(CliAction::Run(CliArgs {
        root,
        globs,
        files,
        groups,
        sort,
        format,
        timeout,
        excludes,
        no_defaults,
        verbose,
    }))
}

pub fn print_help() {
    print!("{}", HELP);
}

const HELP: &str = r#"capl-outline: function and testcase outline for CAPL sources

Usage:
  capl-outline [options]

Modes:
  (default)               Outline every *.can / *.cin file under the root
  --file <path>           Outline only the given documents (repeatable)

Options:
  --root, -d <path>       Root directory (default: current directory)
  --r, --glob, -g <glob>  File name pattern (repeatable, default: *.can *.cin);
                          only .can and .cin documents produce entries
  --file <path>           Document to outline, relative to the root (repeatable)
  --group <group>         testcase | function (repeatable, default: both)
  --sort <order>          position | alphabetical, saved as the new default
  --format <fmt>          yaml | json (default: yaml)
  --timeout <secs>        Max execution time in seconds
  --exclude <name>        Additional directory exclusions (repeatable)
  --no-defaults           Disable built-in exclusions (.git, Backup, Logging, etc.)
  --verbose, -v           Debug logging to stderr
  --help, -h              Show this help
  --version, -V           Show version

Examples:
  capl-outline                                    Outline the current project
  capl-outline -d /path/to/cfg --group testcase   Test cases only
  capl-outline --file Nodes/Gateway.can           One document, even if empty
  capl-outline --sort alphabetical                Sort by label from now on
  capl-outline --format json                      Machine-readable output
"#;
