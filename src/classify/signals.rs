// src/classify/signals.rs

//! Individual classification signals, in priority order.
//!
//! Each signal answers with a [`Classification`]; `Unknown` means "this
//! signal has nothing to say" and the classifier falls through to the next
//! one.

use std::path::Path;

use tracing::debug;

use crate::fs::FileSystem;
use crate::project::{MetadataProvider, Module};
use crate::route::CANONICAL_RESOURCE_DIR;
use crate::types::Classification;

/// Prefix of the accessor generation tasks registered by the resources plugin.
pub const GENERATOR_TASK_PREFIX: &str = "generateResourceAccessorsFor";

/// Extension type registered by the resources plugin.
pub const RESOURCES_EXTENSION_TYPE: &str = "org.jetbrains.compose.resources.ResourcesExtension";

/// Namespace of the resources plugin; any extension inside it counts.
pub const RESOURCES_EXTENSION_NAMESPACE: &str = "org.jetbrains.compose.resources";

/// Plugin identifiers that pull the resources plugin into a build script.
pub const PLUGIN_IDS: [&str; 2] = ["org.jetbrains.compose", "org.jetbrains.kotlin.plugin.compose"];

/// Build scripts probed, in order.
pub const BUILD_SCRIPTS: [&str; 2] = ["build.gradle.kts", "build.gradle"];

/// Everything a signal may consult.
#[derive(Debug, Clone, Copy)]
pub struct SignalContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub metadata: &'a dyn MetadataProvider,
}

pub type Signal = fn(&SignalContext<'_>, &Module) -> Classification;

/// The signals in the order they are consulted.
pub const SIGNALS: [(&str, Signal); 4] = [
    ("declared-task", declared_task_signal),
    ("declared-extension", declared_extension_signal),
    ("build-script", build_script_signal),
    ("directory", directory_signal),
];

/// Decisive whenever the module's task list is known: the absence of a
/// generator task is a "no".
pub fn declared_task_signal(ctx: &SignalContext<'_>, module: &Module) -> Classification {
    match ctx.metadata.tasks(module) {
        Some(tasks) if !tasks.is_empty() => Classification::from_bool(
            tasks.iter().any(|t| is_generator_task(t)),
        ),
        _ => Classification::Unknown,
    }
}

/// Decisive only when extension data exists for the module.
pub fn declared_extension_signal(ctx: &SignalContext<'_>, module: &Module) -> Classification {
    match ctx.metadata.extensions(module) {
        Some(extensions) if !extensions.is_empty() => Classification::from_bool(
            extensions.iter().any(|e| is_resources_extension(e)),
        ),
        _ => Classification::Unknown,
    }
}

/// Decisive only when a build script exists and can be read.
pub fn build_script_signal(ctx: &SignalContext<'_>, module: &Module) -> Classification {
    let Some(script) = BUILD_SCRIPTS
        .iter()
        .map(|name| module.base_dir.join(name))
        .find(|p| ctx.fs.exists(p))
    else {
        return Classification::Unknown;
    };

    match ctx.fs.read_to_string(&script) {
        Ok(content) => {
            Classification::from_bool(PLUGIN_IDS.iter().any(|id| content.contains(id)))
        }
        Err(err) => {
            debug!(script = ?script, error = %err, "build script unreadable; signal inconclusive");
            Classification::Unknown
        }
    }
}

/// Decisive only when `<base>/src` can be enumerated.
pub fn directory_signal(ctx: &SignalContext<'_>, module: &Module) -> Classification {
    let src = module.base_dir.join("src");
    if !ctx.fs.is_dir(&src) {
        return Classification::Unknown;
    }
    match ctx.fs.child_dir_names(&src) {
        Ok(source_sets) => Classification::from_bool(
            source_sets
                .iter()
                .any(|set| has_resource_dir(ctx.fs, &src.join(set))),
        ),
        Err(err) => {
            debug!(dir = ?src, error = %err, "source tree not enumerable; signal inconclusive");
            Classification::Unknown
        }
    }
}

pub fn is_generator_task(name: &str) -> bool {
    // Tasks may be listed with their module path (":app:generate...").
    let simple = name.rsplit(':').next().unwrap_or(name);
    simple.starts_with(GENERATOR_TASK_PREFIX)
}

pub fn is_resources_extension(name: &str) -> bool {
    name == RESOURCES_EXTENSION_TYPE
        || name
            .strip_prefix(RESOURCES_EXTENSION_NAMESPACE)
            .is_some_and(|rest| rest.starts_with('.'))
}

fn has_resource_dir(fs: &dyn FileSystem, source_set_dir: &Path) -> bool {
    fs.is_dir(&source_set_dir.join(CANONICAL_RESOURCE_DIR))
}
