use std::path::PathBuf;
use std::sync::Arc;

use proptest::prelude::*;
use reswatch::classify::ModuleClassifier;
use reswatch::fs::mock::MockFileSystem;
use reswatch::project::{Module, ProjectModel};
use reswatch::route::{outermost_per_base_dir, resource_anchor, source_set_of, ChangeRouter};
use reswatch::types::{ChangeEvent, ChangeKind, ResourceMatch};
use reswatch_test_utils::builders::ModuleBuilder;

fn router(fs: &MockFileSystem) -> ChangeRouter {
    ChangeRouter::new(Arc::new(ModuleClassifier::without_metadata(Arc::new(fs.clone()))))
}

fn modified(path: &str) -> ChangeEvent {
    ChangeEvent::new(path, ChangeKind::Modified)
}

fn matched(owner: &str, source_set: &str) -> Option<ResourceMatch> {
    Some(ResourceMatch {
        owner_module_id: owner.to_string(),
        source_set: source_set.to_string(),
    })
}

#[test]
fn routes_to_module_and_source_set() {
    let fs = MockFileSystem::new();
    let app = ModuleBuilder::new("app", "/root/app").compose().build(&fs);
    let project = ProjectModel::new("/root", vec![app]);

    let extra = vec!["resources".to_string()];
    let r = router(&fs);
    assert_eq!(
        r.route(&modified("/root/app/src/commonMain/resources/strings.xml"), &project, &extra),
        matched("app", "commonMain")
    );
    assert_eq!(
        r.route(
            &modified("/root/app/src/androidMain/composeResources/drawable/logo.png"),
            &project,
            &[]
        ),
        matched("app", "androidMain")
    );
}

#[test]
fn resource_dir_outside_src_defaults_to_common_main() {
    let fs = MockFileSystem::new();
    let app = ModuleBuilder::new(":app", "/root/app").compose().build(&fs);
    let project = ProjectModel::new("/root", vec![app]);

    assert_eq!(
        router(&fs).route(&modified("/root/app/composeResources/values/strings.xml"), &project, &[]),
        matched(":app", "commonMain")
    );
}

#[test]
fn resource_directory_itself_is_relevant() {
    let fs = MockFileSystem::new();
    let app = ModuleBuilder::new(":app", "/root/app").compose().build(&fs);
    let project = ProjectModel::new("/root", vec![app]);

    let created = ChangeEvent::new("/root/app/src/iosMain/composeResources", ChangeKind::Created);
    assert_eq!(router(&fs).route(&created, &project, &[]), matched(":app", "iosMain"));
}

#[test]
fn build_outputs_are_never_routed() {
    let fs = MockFileSystem::new();
    let app = ModuleBuilder::new(":app", "/root/app").compose().build(&fs);
    let project = ProjectModel::new("/root", vec![app]);
    let r = router(&fs);

    let event = modified("/root/app/build/generated/compose/resourceGenerator/composeResources/x.xml");
    assert!(!r.is_relevant(&event, &[]));
    assert_eq!(r.route(&event, &project, &[]), None);
}

#[test]
fn resource_dir_must_be_a_whole_segment() {
    let fs = MockFileSystem::new();
    let r = router(&fs);
    assert!(!r.is_relevant(&modified("/root/app/src/commonMain/composeResourcesOld/a.xml"), &[]));
    assert!(!r.is_relevant(&modified("/root/app/src/commonMain/mycomposeResources/a.xml"), &[]));
    assert!(r.is_relevant(&modified("/root/app/src/commonMain/composeResources/a.xml"), &[]));
}

#[test]
fn extra_resource_dirs_use_segment_semantics() {
    let fs = MockFileSystem::new();
    let r = router(&fs);
    let extra = vec!["sharedAssets".to_string()];
    assert!(r.is_relevant(&modified("/root/app/src/commonMain/sharedAssets/a.png"), &extra));
    assert!(!r.is_relevant(&modified("/root/app/src/commonMain/sharedAssetsBak/a.png"), &extra));
    assert!(!r.is_relevant(&modified("/root/app/src/commonMain/sharedAssets/a.png"), &[]));
}

#[test]
fn non_content_events_are_ignored() {
    let fs = MockFileSystem::new();
    let app = ModuleBuilder::new(":app", "/root/app").compose().build(&fs);
    let project = ProjectModel::new("/root", vec![app]);
    let event = ChangeEvent::new("/root/app/src/commonMain/composeResources/a.xml", ChangeKind::Other);

    assert_eq!(router(&fs).route(&event, &project, &[]), None);
}

#[test]
fn every_content_kind_is_routed() {
    let fs = MockFileSystem::new();
    let app = ModuleBuilder::new(":app", "/root/app").compose().build(&fs);
    let project = ProjectModel::new("/root", vec![app]);
    let r = router(&fs);

    for kind in [
        ChangeKind::Created,
        ChangeKind::Modified,
        ChangeKind::Deleted,
        ChangeKind::Moved,
        ChangeKind::Renamed,
    ] {
        let event = ChangeEvent::new("/root/app/src/commonMain/composeResources/a.xml", kind);
        assert_eq!(r.route(&event, &project, &[]), matched(":app", "commonMain"), "{kind:?}");
    }
}

#[test]
fn shadow_source_set_module_loses_tie_break() {
    let fs = MockFileSystem::new();
    let lib = ModuleBuilder::new(":lib", "/root/lib").compose().build(&fs);
    let shadow = Module::new(":lib:commonMain", "/root/lib");
    let project = ProjectModel::new("/root", vec![shadow, lib]);

    assert_eq!(
        router(&fs).route(&modified("/root/lib/src/commonMain/composeResources/a.xml"), &project, &[]),
        matched(":lib", "commonMain")
    );
}

#[test]
fn deepest_participating_base_dir_wins() {
    let fs = MockFileSystem::new();
    let root = ModuleBuilder::new("", "/root").compose().build(&fs);
    let feature = ModuleBuilder::new(":feature:home", "/root/feature/home").compose().build(&fs);
    let project = ProjectModel::new("/root", vec![root, feature]);
    let r = router(&fs);

    assert_eq!(
        r.route(&modified("/root/feature/home/src/commonMain/composeResources/a.xml"), &project, &[]),
        matched(":feature:home", "commonMain")
    );
    assert_eq!(
        r.route(&modified("/root/src/commonMain/composeResources/a.xml"), &project, &[]),
        matched("", "commonMain")
    );
}

#[test]
fn non_participating_module_is_skipped_for_its_parent() {
    let fs = MockFileSystem::new();
    let root = ModuleBuilder::new("", "/root").compose().build(&fs);
    let plain = ModuleBuilder::new(":plain", "/root/plain").plain().build(&fs);
    let project = ProjectModel::new("/root", vec![root, plain]);

    assert_eq!(
        router(&fs).route(&modified("/root/plain/src/commonMain/composeResources/a.xml"), &project, &[]),
        matched("", "commonMain")
    );
}

#[test]
fn base_dir_prefix_is_component_wise() {
    let fs = MockFileSystem::new();
    let app = ModuleBuilder::new(":app", "/root/app").compose().build(&fs);
    let project = ProjectModel::new("/root", vec![app]);

    assert_eq!(
        router(&fs).route(&modified("/root/app2/src/commonMain/composeResources/a.xml"), &project, &[]),
        None
    );
}

#[test]
fn unowned_change_is_dropped() {
    let fs = MockFileSystem::new();
    let plain = ModuleBuilder::new(":plain", "/root/plain").plain().build(&fs);
    let project = ProjectModel::new("/root", vec![plain]);

    assert_eq!(
        router(&fs).route(&modified("/root/plain/src/commonMain/composeResources/a.xml"), &project, &[]),
        None
    );
}

#[test]
fn outermost_module_is_kept_per_base_dir() {
    let fs = MockFileSystem::new();
    let lib = ModuleBuilder::new(":lib", "/root/lib").compose().build(&fs);
    let shadow = Module::new(":lib:commonMain", "/root/lib");
    let app = ModuleBuilder::new(":app", "/root/app").compose().build(&fs);
    let plain = ModuleBuilder::new(":plain", "/root/plain").plain().build(&fs);
    let modules = vec![shadow, lib, app, plain];

    let classifier = ModuleClassifier::without_metadata(Arc::new(fs.clone()));
    let ids: Vec<&str> = outermost_per_base_dir(&classifier, &modules)
        .into_iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(ids, vec![":lib", ":app"]);
}

#[test]
fn anchor_and_source_set_helpers() {
    let path = "/root/app/src/jvmMain/composeResources/values/strings.xml";
    let anchor = resource_anchor(path, &[]);
    assert_eq!(anchor, Some("/root/app/src/jvmMain"));
    assert_eq!(source_set_of("/root/app/src/jvmMain"), "jvmMain");
    assert_eq!(source_set_of("/root/app"), "commonMain");
    assert_eq!(source_set_of("/root/app/src"), "commonMain");
}

proptest! {
    #[test]
    fn build_output_paths_never_route(
        before in proptest::collection::vec("[a-z]{1,6}", 0..3),
        after in proptest::collection::vec("[a-z]{1,6}", 0..3),
    ) {
        let fs = MockFileSystem::new();
        let app = ModuleBuilder::new(":app", "/root/app").compose().build(&fs);
        let project = ProjectModel::new("/root", vec![app]);

        let mut path = PathBuf::from("/root/app");
        for seg in before.iter() {
            path.push(seg);
        }
        path.push("build");
        for seg in after.iter() {
            path.push(seg);
        }
        path.push("composeResources");
        path.push("strings.xml");

        let event = ChangeEvent::new(path, ChangeKind::Modified);
        prop_assert_eq!(router(&fs).route(&event, &project, &[]), None);
    }
}
