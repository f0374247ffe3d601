use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use stencil_core::prompt::{Key, ScriptedConsole};
use stencil_core::{
    AnswerSet, Error, Evaluator, Generator, PresetResolver, PresetStore, RenderError, TargetKind,
    TemplateCatalog, UserPreset,
};
use tempfile::TempDir;

fn template_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("templates")
}

struct Scaffold {
    catalog: TemplateCatalog,
    store: PresetStore,
    evaluator: Evaluator,
    home: TempDir,
    target: TempDir,
}

impl Scaffold {
    fn new() -> Self {
        let home = tempfile::tempdir().unwrap();
        let store = PresetStore::open(home.path().join(".stencil.preset")).unwrap();

        Self {
            catalog: TemplateCatalog::discover(template_root()),
            store,
            evaluator: Evaluator::new(),
            home,
            target: tempfile::tempdir().unwrap(),
        }
    }

    fn resolver(&mut self) -> PresetResolver<'_> {
        PresetResolver::new(&self.catalog, &mut self.store, &self.evaluator)
    }

    fn generator(&self, name: &str) -> Generator {
        Generator::new(name, self.catalog.root()).target_root(self.target.path())
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.target.path().join(relative)).unwrap()
    }
}

#[test]
fn test_builtin_catalog() {
    let catalog = TemplateCatalog::discover(template_root());
    let dirs: Vec<&str> = catalog.all().iter().map(|t| t.dir()).collect();
    assert_eq!(
        dirs,
        vec!["files/cpp/class", "projects/cpp/console", "types/cpp", "types/h"]
    );

    let projects: Vec<&str> = catalog.of_kind(TargetKind::Project).map(|t| t.dir()).collect();
    assert_eq!(projects, vec!["projects/cpp/console"]);
}

#[test]
fn test_console_project_with_defaults() {
    let mut sc = Scaffold::new();
    let mut console = ScriptedConsole::default();
    let template = sc
        .resolver()
        .resolve(TargetKind::Project, Some("@projects/cpp/console"), &mut console)
        .unwrap();
    assert!(console.frames.is_empty());

    let result = sc.generator("demo").render(&template).unwrap();
    assert_eq!(
        result.outputs(),
        vec![
            PathBuf::from("demo/CMakeLists.txt"),
            PathBuf::from("demo/main.cpp"),
            PathBuf::from("demo/.gitignore"),
            PathBuf::from("demo/README.md"),
        ]
    );

    let cmake = sc.read("demo/CMakeLists.txt");
    assert!(cmake.starts_with("cmake_minimum_required(VERSION 3.16)"));
    assert!(cmake.contains("project(demo LANGUAGES CXX)"));
    assert!(cmake.contains("set(CMAKE_CXX_STANDARD 17)"));

    assert!(sc.read("demo/main.cpp").contains("Hello from demo!"));
    assert!(sc.read("demo/.gitignore").contains("build/"));
    assert!(sc.read("demo/README.md").contains("A C++17 console application."));
}

#[test]
fn test_saved_preset_drives_render() {
    let mut sc = Scaffold::new();

    let mut options = AnswerSet::new();
    options.insert("cxxStandard".into(), json!("20"));
    options.insert("cmakeMinimum".into(), json!("3.21"));
    options.insert("projectDescription".into(), json!(""));
    options.insert("useReadme".into(), json!(false));
    sc.store
        .add(UserPreset {
            name: "modern".into(),
            kind: TargetKind::Project,
            template: "projects/cpp/console".into(),
            options,
        })
        .unwrap();
    sc.store.save().unwrap();

    // reopen from disk
    sc.store = PresetStore::open(sc.home.path().join(".stencil.preset")).unwrap();
    let template = sc
        .resolver()
        .find(TargetKind::Project, "modern")
        .unwrap();

    let result = sc.generator("app").render(&template).unwrap();
    assert_eq!(result.len(), 3);

    let cmake = sc.read("app/CMakeLists.txt");
    assert!(cmake.starts_with("cmake_minimum_required(VERSION 3.21)"));
    assert!(cmake.contains("set(CMAKE_CXX_STANDARD 20)"));
    assert!(!sc.target.path().join("app/README.md").exists());
}

#[test]
fn test_preset_kind_must_match() {
    let mut sc = Scaffold::new();
    let err = sc
        .resolver()
        .find(TargetKind::Project, "@files/cpp/class")
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { what: "default preset", .. }));
}

#[test]
fn test_class_file_template() {
    let mut sc = Scaffold::new();
    let template = sc
        .resolver()
        .find(TargetKind::File, "@files/cpp/class")
        .unwrap();

    sc.generator("ignored").render(&template).unwrap();

    let header = sc.read("myclass.h");
    assert!(header.starts_with("#ifndef MYCLASS_H"));
    assert!(header.contains("class MyClass\n{"));
    assert!(header.contains("#endif // MYCLASS_H"));

    let source = sc.read("myclass.cpp");
    assert!(source.starts_with("#include \"myclass.h\""));
    assert!(source.contains("MyClass::MyClass() = default;"));
}

#[test]
fn test_header_by_extension() {
    let mut sc = Scaffold::new();
    let mut console = ScriptedConsole::new([Key::Char('y')]);
    let template = sc
        .resolver()
        .resolve_by_extension("h", &mut console)
        .unwrap();
    assert_eq!(template.template_dir(), "types/h");

    sc.generator("widget").render(&template).unwrap();
    let header = sc.read("widget.h");
    assert!(header.starts_with("#pragma once"));
    assert!(!header.contains("WIDGET_H"));
}

#[test]
fn test_second_render_conflicts() {
    let mut sc = Scaffold::new();
    let template = sc
        .resolver()
        .find(TargetKind::File, "@types/cpp")
        .unwrap();

    sc.generator("widget").render(&template).unwrap();
    assert!(sc.read("widget.cpp").contains("#include \"widget.h\""));
    assert!(sc.read("widget.cpp").contains("// widget.cpp"));

    let err = sc.generator("widget").render(&template).unwrap_err();
    assert!(matches!(err, RenderError::OutputConflict(_)));
}

#[test]
fn test_file_question_shows_output_name() {
    let mut sc = Scaffold::new();
    let mut console = ScriptedConsole::new([Key::Char('n')]);
    let template = sc
        .resolver()
        .output_name("widget")
        .resolve_by_extension("cpp", &mut console)
        .unwrap();
    assert!(console.frames[0].contains("Include widget.h?"));
    assert!(!template.answers().unwrap().contains_key("name"));

    sc.generator("widget").render(&template).unwrap();
    assert!(!sc.read("widget.cpp").contains("#include \"widget.h\""));
}
