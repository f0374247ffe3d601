//! Stencil CLI - Project and file scaffolding from templates

mod commands;
mod logging;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use stencil_core::{NewArgs, NewFileArgs, Overrides, ProductConfig, Settings, TargetKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Stencil product configuration
#[derive(Clone)]
pub struct StencilConfig;

impl ProductConfig for StencilConfig {
    fn name(&self) -> &'static str {
        "stencil"
    }

    fn display_name(&self) -> &'static str {
        "Stencil"
    }

    fn template_dir_env(&self) -> &'static str {
        "STENCIL_TEMPLATE_DIR"
    }

    fn default_template_dir(&self) -> PathBuf {
        // Installed layout: templates/ next to the executable
        let installed = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("templates")))
            .filter(|dir| dir.is_dir());

        installed.unwrap_or_else(|| {
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join("templates")
        })
    }

    fn preset_file_name(&self) -> &'static str {
        ".stencil.preset"
    }

    fn next_steps(&self, output: &Path, kind: TargetKind) -> Vec<String> {
        let mut steps = Vec::new();

        if kind == TargetKind::Project {
            steps.push(format!("cd {}", output.display()));

            if output.join("CMakeLists.txt").is_file() {
                steps.push("cmake -S . -B build".to_string());
                steps.push("cmake --build build".to_string());
            }
        }

        steps
    }
}

/// Version string with optional build details baked in at compile time
fn format_version(version: &str, build_date: Option<&str>, commit: Option<&str>) -> String {
    let mut info = Vec::new();

    if let Some(date) = build_date.filter(|d| !d.is_empty()) {
        info.push(date.to_string());
    }
    if let Some(commit) = commit.filter(|c| !c.is_empty()) {
        info.push(commit.chars().take(10).collect::<String>());
    }

    if info.is_empty() {
        version.to_string()
    } else {
        format!("{} ({})", version, info.join(", "))
    }
}

fn long_version() -> &'static str {
    let formatted = format_version(
        CLI_VERSION,
        option_env!("STENCIL_BUILD_DATE"),
        option_env!("STENCIL_BUILD_COMMIT"),
    );
    Box::leak(formatted.into_boxed_str())
}

#[derive(Parser, Debug)]
#[command(name = "stencil")]
#[command(about = "Scaffold projects and files from templates")]
#[command(version = long_version())]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Template asset root (overrides STENCIL_TEMPLATE_DIR)
    #[arg(long = "template-dir", global = true)]
    pub template_dir: Option<PathBuf>,

    /// User preset file (defaults to ~/.stencil.preset)
    #[arg(long = "preset-file", global = true)]
    pub preset_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project under the current directory
    New(NewCmd),
    /// Create a new file in the current directory
    NewFile(NewFileCmd),
    /// Inspect and manage presets
    #[command(subcommand)]
    Preset(PresetCmd),
    /// Inspect built-in templates
    #[command(subcommand)]
    Test(TestCmd),
}

#[derive(Parser, Debug)]
pub struct NewCmd {
    /// Project name (a new directory)
    pub name: String,

    /// Preset to use; `@dir` selects a built-in template
    #[arg(long)]
    pub preset: Option<String>,

    /// Print the files that would be created without writing them
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct NewFileCmd {
    /// File name; an extension selects the matching file-type template
    pub name: Option<String>,

    /// Preset to use; `@dir` selects a built-in template
    #[arg(long)]
    pub preset: Option<String>,

    /// Print the files that would be created without writing them
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum PresetCmd {
    /// List the names of all user presets
    Ls {
        /// Include built-in templates
        #[arg(short, long)]
        all: bool,
    },
    /// Print the contents of a preset (`@dir` for a built-in)
    Cat { name: String },
    /// Rename a user preset
    Mv { from: String, to: String },
    /// Remove a user preset
    Rm { name: String },
    /// Remove all user presets
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum TestCmd {
    /// Run the questions of a built-in template and print the answers
    Prompt { name: String },
    /// Print the default answers of a built-in template
    Default { name: String },
}

fn run(cli: Cli, config: &StencilConfig) -> Result<()> {
    let overrides = Overrides {
        template_dir: cli.global.template_dir,
        preset_file: cli.global.preset_file,
    };
    let settings = Settings::resolve(config, &overrides).map_err(stencil_core::Error::from)?;
    let here = PathBuf::from(".");

    match cli.command {
        Command::New(cmd) => stencil_core::run_new(
            config,
            &settings,
            NewArgs {
                name: cmd.name,
                preset: cmd.preset,
                dry_run: cmd.dry_run,
                target_dir: here,
            },
        ),
        Command::NewFile(cmd) => stencil_core::run_new_file(
            config,
            &settings,
            NewFileArgs {
                name: cmd.name,
                preset: cmd.preset,
                dry_run: cmd.dry_run,
                target_dir: here,
            },
        ),
        Command::Preset(PresetCmd::Ls { all }) => commands::list(&settings, all),
        Command::Preset(PresetCmd::Cat { name }) => commands::cat(&settings, &name),
        Command::Preset(PresetCmd::Mv { from, to }) => commands::rename(&settings, &from, &to),
        Command::Preset(PresetCmd::Rm { name }) => commands::remove(&settings, &name),
        Command::Preset(PresetCmd::Clear) => commands::clear(&settings),
        Command::Test(TestCmd::Prompt { name }) => commands::test_prompt(&settings, &name),
        Command::Test(TestCmd::Default { name }) => commands::test_default(&settings, &name),
    }
}

/// Exit status for a failed run
fn exit_code(err: &anyhow::Error) -> u8 {
    use stencil_core::Error;

    match err.downcast_ref::<Error>() {
        Some(Error::Aborted) => 130,
        Some(Error::NotFound { .. }) => 3,
        Some(Error::Render(_)) => 4,
        _ => 1,
    }
}

fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let cli = Cli::parse();
    if let Err(e) = logging::init_logging(&cli.global) {
        eprintln!("{} {:#}", "Warning:".yellow(), e);
    }

    let config = StencilConfig;
    let result = run(cli, &config);

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code(&e);
            if code == 130 {
                eprintln!("{}", "Aborted.".dimmed());
            } else {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            }
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_version() {
        assert_eq!(format_version("0.1.0", None, None), "0.1.0");
        assert_eq!(
            format_version("0.1.0", Some("2024-05-01"), Some("0123456789abcdef")),
            "0.1.0 (2024-05-01, 0123456789)"
        );
        assert_eq!(format_version("0.1.0", Some(""), Some("abc")), "0.1.0 (abc)");
    }

    #[test]
    fn test_exit_codes() {
        let aborted = anyhow::Error::from(stencil_core::Error::Aborted);
        assert_eq!(exit_code(&aborted), 130);

        let missing = anyhow::Error::from(stencil_core::Error::NotFound {
            what: "preset",
            name: "x".into(),
        });
        assert_eq!(exit_code(&missing), 3);

        let render = anyhow::Error::from(stencil_core::Error::Render(
            stencil_core::RenderError::OutputConflict(PathBuf::from("a")),
        ));
        assert_eq!(exit_code(&render), 4);

        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
    }

    #[test]
    fn test_parse_new() {
        let cli = Cli::try_parse_from(["stencil", "new", "demo", "--preset", "@projects/cpp/console"])
            .unwrap();
        match cli.command {
            Command::New(cmd) => {
                assert_eq!(cmd.name, "demo");
                assert_eq!(cmd.preset.as_deref(), Some("@projects/cpp/console"));
                assert!(!cmd.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_next_steps() {
        let steps = StencilConfig.next_steps(Path::new("/nonexistent/demo"), TargetKind::Project);
        assert_eq!(steps, vec!["cd /nonexistent/demo".to_string()]);
        assert!(StencilConfig
            .next_steps(Path::new("."), TargetKind::File)
            .is_empty());
    }
}
