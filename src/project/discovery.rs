// src/project/discovery.rs

//! Module discovery from `settings.gradle(.kts)`.
//!
//! This is a text scan, not a Gradle evaluation: it understands `include`
//! statements with quoted module paths and
//! `project(":x").projectDir = file("path")` relocations, which covers the
//! vast majority of real settings scripts. Anything more exotic can be
//! declared in `[[project.module]]`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::ModuleDecl;
use crate::fs::FileSystem;
use crate::project::{normalize_gradle_path, Module, PATH_SEPARATOR};

pub const SETTINGS_SCRIPTS: [&str; 2] = ["settings.gradle.kts", "settings.gradle"];

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//[^\n]*$").expect("valid regex"));

static INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\binclude\b\s*(?:\(([^)]*)\)|([^\n]*))").expect("valid regex")
});

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"'\s]+)["']"#).expect("valid regex"));

static PROJECT_DIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"project\(\s*["']([^"']+)["']\s*\)\.projectDir\s*=\s*(?:file|File)\(\s*["']([^"']+)["']\s*\)"#,
    )
    .expect("valid regex")
});

/// Discover the modules of the project rooted at `root`.
///
/// The result always contains the root project (id `""`), then every
/// included module sorted by id. Explicit declarations override discovered
/// modules with the same id.
pub fn discover_modules(fs: &dyn FileSystem, root: &Path, explicit: &[ModuleDecl]) -> Vec<Module> {
    let mut dirs: BTreeMap<String, PathBuf> = BTreeMap::new();
    dirs.insert(String::new(), root.to_path_buf());

    if let Some(script) = find_settings_script(fs, root) {
        match fs.read_to_string(&script) {
            Ok(contents) => {
                let parsed = parse_settings(&contents);
                for id in parsed.includes {
                    let dir = parsed
                        .project_dirs
                        .get(&id)
                        .map(|rel| root.join(rel))
                        .unwrap_or_else(|| default_module_dir(root, &id));
                    dirs.insert(id, dir);
                }
            }
            Err(err) => {
                warn!(script = ?script, error = %err, "failed to read settings script; only the root module is known");
            }
        }
    } else {
        debug!(?root, "no settings script; treating project as single-module");
    }

    for decl in explicit {
        let id = canonical_id(&decl.id);
        dirs.insert(id, root.join(&decl.dir));
    }

    dirs.into_iter()
        .map(|(id, base_dir)| {
            let source_sets = fs.child_dir_names(&base_dir.join("src")).unwrap_or_default();
            Module {
                id,
                base_dir,
                source_sets,
            }
        })
        .collect()
}

pub fn find_settings_script(fs: &dyn FileSystem, root: &Path) -> Option<PathBuf> {
    SETTINGS_SCRIPTS
        .iter()
        .map(|name| root.join(name))
        .find(|p| fs.is_file(p))
}

/// Module paths and relocations found in a settings script.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedSettings {
    pub includes: Vec<String>,
    pub project_dirs: BTreeMap<String, PathBuf>,
}

pub fn parse_settings(contents: &str) -> ParsedSettings {
    let stripped = LINE_COMMENT.replace_all(contents, "");
    let mut parsed = ParsedSettings::default();

    for caps in INCLUDE.captures_iter(&stripped) {
        let args = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or("");
        for quoted in QUOTED.captures_iter(args) {
            let id = canonical_id(&quoted[1]);
            if !id.is_empty() && !parsed.includes.contains(&id) {
                parsed.includes.push(id);
            }
        }
    }

    for caps in PROJECT_DIR.captures_iter(&stripped) {
        parsed
            .project_dirs
            .insert(canonical_id(&caps[1]), PathBuf::from(&caps[2]));
    }

    parsed
}

/// `"app"` and `":app:"` both become `":app"`; the root stays `""`.
fn canonical_id(raw: &str) -> String {
    let normalized = normalize_gradle_path(raw);
    if normalized.is_empty() || normalized.starts_with(PATH_SEPARATOR) {
        normalized
    } else {
        format!("{PATH_SEPARATOR}{normalized}")
    }
}

/// Gradle's default location for `:a:b` is `<root>/a/b`.
fn default_module_dir(root: &Path, id: &str) -> PathBuf {
    id.split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment))
}
