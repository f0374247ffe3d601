//! Interactive `new` / `new-file` sessions framed with cliclack

use crate::config::Settings;
use crate::error::Error;
use crate::expression::Evaluator;
use crate::presets::{PresetResolver, PresetStore, TemplateRef};
use crate::product::ProductConfig;
use crate::prompt::{Completion, InputPrompt, Prompt, TermConsole};
use crate::templates::{is_valid_dir_name, Generator, TargetKind, TemplateCatalog};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Arguments of the project command
#[derive(Debug, Clone)]
pub struct NewArgs {
    /// Project directory name, created under `target_dir`
    pub name: String,

    /// Preset name, or `@dir` for a built-in template
    pub preset: Option<String>,

    /// Only print what would be generated
    pub dry_run: bool,

    pub target_dir: PathBuf,
}

/// Arguments of the single-file command
#[derive(Debug, Clone)]
pub struct NewFileArgs {
    /// File name; asked for when absent
    pub name: Option<String>,

    pub preset: Option<String>,

    pub dry_run: bool,

    pub target_dir: PathBuf,
}

/// Create a new project directory from a template
pub fn run_new<C: ProductConfig>(config: &C, settings: &Settings, args: NewArgs) -> Result<()> {
    if args.target_dir.join(&args.name).exists() {
        anyhow::bail!("'{}' already exists", args.name);
    }
    if !is_valid_dir_name(&args.name) {
        anyhow::bail!("'{}' is not a valid directory name", args.name);
    }

    cliclack::intro(config.display_name())?;

    let catalog = load_catalog(settings)?;
    let mut store = open_store(settings)?;
    let evaluator = Evaluator::new();
    let mut console = TermConsole::new();

    let template = cancel_aware(
        PresetResolver::new(&catalog, &mut store, &evaluator)
            .output_name(&args.name)
            .resolve(TargetKind::Project, args.preset.as_deref(), &mut console),
    )?;

    generate(config, &catalog, &template, &args.name, &args.target_dir, args.dry_run)
}

/// Create files in the target directory from a file template
pub fn run_new_file<C: ProductConfig>(
    config: &C,
    settings: &Settings,
    args: NewFileArgs,
) -> Result<()> {
    let mut console = TermConsole::new();

    let name = match args.name {
        Some(name) => name.trim().to_string(),
        None => ask_file_name(&mut console)?,
    };
    if name.is_empty() {
        return Ok(());
    }

    cliclack::intro(config.display_name())?;

    let catalog = load_catalog(settings)?;
    let mut store = open_store(settings)?;
    let evaluator = Evaluator::new();
    let (base, ext) = split_extension(&name);
    let mut resolver = PresetResolver::new(&catalog, &mut store, &evaluator).output_name(base);

    let template = cancel_aware(match ext {
        Some(ext) => resolver.resolve_by_extension(ext, &mut console),
        None => resolver.resolve(TargetKind::File, args.preset.as_deref(), &mut console),
    })?;

    generate(config, &catalog, &template, base, &args.target_dir, args.dry_run)
}

fn load_catalog(settings: &Settings) -> Result<TemplateCatalog> {
    let catalog = TemplateCatalog::discover(&settings.template_root);
    if catalog.all().is_empty() {
        cliclack::log::warning(format!(
            "No templates found in {}",
            settings.template_root.display()
        ))?;
    } else {
        cliclack::log::info(format!(
            "Using templates from {}",
            settings.template_root.display()
        ))?;
    }
    Ok(catalog)
}

fn open_store(settings: &Settings) -> Result<PresetStore> {
    PresetStore::open(&settings.preset_path)
        .map_err(Error::from)
        .with_context(|| format!("Failed to open {}", settings.preset_path.display()))
}

/// Close the session frame when the user cancelled
fn cancel_aware<T>(result: crate::Result<T>) -> Result<T> {
    if let Err(Error::Aborted) = &result {
        cliclack::outro_cancel("Aborted")?;
    }
    Ok(result?)
}

fn ask_file_name(console: &mut TermConsole) -> Result<String> {
    let mut prompt = InputPrompt::text().question("Enter the file name:");
    match prompt.run(console)? {
        Completion::Done(value) => Ok(value.as_text().unwrap_or_default().trim().to_string()),
        Completion::Cancelled => Ok(String::new()),
    }
}

/// Split `widget.h` into `("widget", Some("h"))`; dot files have no extension
pub(crate) fn split_extension(name: &str) -> (&str, Option<&str>) {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => {
            let base = &name[..name.len() - ext.len() - 1];
            (base, Some(ext))
        }
        _ => (name, None),
    }
}

fn generate<C: ProductConfig>(
    config: &C,
    catalog: &TemplateCatalog,
    template: &TemplateRef,
    name: &str,
    target_dir: &Path,
    dry_run: bool,
) -> Result<()> {
    let generator = Generator::new(name, catalog.root()).target_root(target_dir);

    if dry_run {
        let result = generator.plan(template).map_err(Error::from)?;
        cliclack::log::info(format!(
            "{} would create {} file(s):\n{}",
            template.name(),
            result.len(),
            result.summary()
        ))?;
        cliclack::outro("Dry run, nothing written")?;
        return Ok(());
    }

    let spinner = cliclack::spinner();
    spinner.start("Generating files...");

    let result = match generator.render(template) {
        Ok(result) => result,
        Err(e) => {
            spinner.stop("Generation failed");
            return Err(Error::from(e).into());
        }
    };

    spinner.stop(format!("Created {} file(s) from {}", result.len(), template.name()));
    tracing::info!(product = config.name(), summary = %result.summary(), "generation finished");

    let output = match template.kind() {
        TargetKind::Project => target_dir.join(name),
        TargetKind::File => target_dir.to_path_buf(),
    };
    print_next_steps(config, &output, template.kind())
}

fn print_next_steps<C: ProductConfig>(config: &C, output: &Path, kind: TargetKind) -> Result<()> {
    let steps = config.next_steps(output, kind);

    if !steps.is_empty() {
        println!();
        println!("  Next steps");
        println!();

        for (i, step) in steps.iter().enumerate() {
            println!("  {}.  {}", i + 1, step);
        }
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("widget.h"), ("widget", Some("h")));
        assert_eq!(split_extension("main.cpp"), ("main", Some("cpp")));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", Some("gz")));
        assert_eq!(split_extension("widget"), ("widget", None));
        assert_eq!(split_extension(".gitignore"), (".gitignore", None));
    }
}
