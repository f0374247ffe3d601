//! Non-generating subcommands: preset management and template introspection

use anyhow::{Context, Result};
use colored::Colorize;
use stencil_core::prompt::{run_questions, Completion, InputPrompt, Prompt, TermConsole};
use stencil_core::{
    AnswerSet, BuiltinTemplate, Error, Evaluator, PresetResolver, PresetStore, Settings,
    TemplateCatalog, TemplateRef, UserPreset,
};

struct Workspace {
    catalog: TemplateCatalog,
    store: PresetStore,
    evaluator: Evaluator,
}

impl Workspace {
    fn load(settings: &Settings) -> Result<Self> {
        let store = PresetStore::open(&settings.preset_path)
            .map_err(Error::from)
            .with_context(|| format!("Failed to open {}", settings.preset_path.display()))?;

        Ok(Self {
            catalog: TemplateCatalog::discover(&settings.template_root),
            store,
            evaluator: Evaluator::new(),
        })
    }

    fn resolver(&mut self) -> PresetResolver<'_> {
        PresetResolver::new(&self.catalog, &mut self.store, &self.evaluator)
    }
}

/// `preset ls [-a]`
pub fn list(settings: &Settings, all: bool) -> Result<()> {
    let ws = Workspace::load(settings)?;

    if ws.store.is_empty() {
        println!("{}", "<no custom preset>".dimmed());
    } else {
        for preset in ws.store.items() {
            println!("{} -> @{}", preset.name.bold(), preset.template);
        }
    }

    if all {
        for builtin in ws.catalog.all() {
            println!(
                "{} {}",
                builtin.display_name(),
                format!("({})", builtin.kind()).dimmed()
            );
        }
    }

    Ok(())
}

/// `preset cat <name|@dir>`
pub fn cat(settings: &Settings, name: &str) -> Result<()> {
    let mut ws = Workspace::load(settings)?;
    let preset = ws.resolver().lookup(name)?.to_preset().map_err(Error::from)?;
    print_preset(&preset)
}

/// `preset mv <from> <to>`
pub fn rename(settings: &Settings, from: &str, to: &str) -> Result<()> {
    let mut ws = Workspace::load(settings)?;
    ws.store.rename(from, to)?;
    ws.store.save().map_err(Error::from)?;
    println!("{} {} -> {}", "Renamed".green(), from, to);
    Ok(())
}

/// `preset rm <name>`
pub fn remove(settings: &Settings, name: &str) -> Result<()> {
    let mut ws = Workspace::load(settings)?;
    if !ws.store.contains(name) {
        return Err(Error::NotFound {
            what: "preset",
            name: name.to_string(),
        }
        .into());
    }

    if confirm("Are you sure you want to remove this preset?")? {
        ws.store.remove(name)?;
        ws.store.save().map_err(Error::from)?;
        println!("{} {}", "Removed".green(), name);
    }

    Ok(())
}

/// `preset clear`
pub fn clear(settings: &Settings) -> Result<()> {
    let mut ws = Workspace::load(settings)?;
    if ws.store.is_empty() {
        return Ok(());
    }

    if confirm("Are you sure you want to remove all presets?")? {
        let count = ws.store.len();
        ws.store.remove_all();
        ws.store.save().map_err(Error::from)?;
        println!("{} {} preset(s)", "Removed".green(), count);
    }

    Ok(())
}

/// `test prompt @dir`: run a built-in's questions and print the result
pub fn test_prompt(settings: &Settings, name: &str) -> Result<()> {
    let ws = Workspace::load(settings)?;
    let builtin = find_builtin(&ws, name)?;

    let manifest = builtin.questions().map_err(Error::from)?;
    let mut console = TermConsole::new();
    let base = sample_base(&builtin);
    let options = run_questions(&manifest, &base, &ws.evaluator, &mut console)?;

    let mut preset = TemplateRef::Builtin(builtin)
        .to_preset()
        .map_err(Error::from)?;
    preset.options = options;
    print_preset(&preset)
}

/// `test default @dir`: print a built-in's default answers
pub fn test_default(settings: &Settings, name: &str) -> Result<()> {
    let ws = Workspace::load(settings)?;
    let preset = TemplateRef::Builtin(find_builtin(&ws, name)?)
        .to_preset()
        .map_err(Error::from)?;
    print_preset(&preset)
}

/// Stand-in output name for a dry question run: the template's last directory
fn sample_base(builtin: &BuiltinTemplate) -> AnswerSet {
    let name = builtin.dir().rsplit('/').next().unwrap_or_default();
    [("name".to_string(), name.into())].into_iter().collect()
}

/// Built-in named `@dir`, of any kind
fn find_builtin(ws: &Workspace, name: &str) -> Result<BuiltinTemplate> {
    name.strip_prefix('@')
        .and_then(|dir| ws.catalog.find_any(dir))
        .cloned()
        .ok_or_else(|| {
            Error::NotFound {
                what: "default preset",
                name: name.to_string(),
            }
            .into()
        })
}

fn print_preset(preset: &UserPreset) -> Result<()> {
    let yaml = serde_yaml::to_string(preset).context("Failed to format preset")?;
    println!("{}", "-".repeat(40).dimmed());
    print!("{}", yaml);
    Ok(())
}

/// Yes/no question defaulting to no
fn confirm(question: &str) -> Result<bool> {
    let mut prompt = InputPrompt::confirm()
        .question(question)
        .description("y/N")
        .default_value("n");

    let mut console = TermConsole::new();
    Ok(match prompt.run(&mut console)? {
        Completion::Done(value) => value.as_bool().unwrap_or(false),
        Completion::Cancelled => false,
    })
}
