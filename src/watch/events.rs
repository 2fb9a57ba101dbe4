// src/watch/events.rs

//! Mapping from `notify` events to [`ChangeEvent`]s.

use std::path::Path;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

use crate::types::{ChangeEvent, ChangeKind};

/// Turn one raw notify event into zero or more change events.
///
/// A rename that reports both ends becomes a single event on the new path,
/// tagged `Renamed` when the parent directory is unchanged and `Moved`
/// otherwise.
pub fn change_events(event: &Event) -> Vec<ChangeEvent> {
    match event.kind {
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() >= 2 => {
            let from = &event.paths[0];
            let to = &event.paths[1];
            vec![ChangeEvent::new(to.clone(), rename_kind(from, to))]
        }
        kind => {
            let kind = change_kind(kind);
            event
                .paths
                .iter()
                .map(|p| ChangeEvent::new(p.clone(), kind))
                .collect()
        }
    }
}

/// Kind for a single-path notify event.
pub fn change_kind(kind: EventKind) -> ChangeKind {
    match kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Remove(_) => ChangeKind::Deleted,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            ChangeKind::Modified
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => ChangeKind::Deleted,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => ChangeKind::Created,
        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
        _ => ChangeKind::Other,
    }
}

fn rename_kind(from: &Path, to: &Path) -> ChangeKind {
    if from.parent() == to.parent() {
        ChangeKind::Renamed
    } else {
        ChangeKind::Moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut e = Event::new(kind);
        for p in paths {
            e = e.add_path(PathBuf::from(p));
        }
        e
    }

    #[test]
    fn maps_basic_kinds() {
        let created = change_events(&event(EventKind::Create(CreateKind::File), &["/a/x.xml"]));
        assert_eq!(created, vec![ChangeEvent::new("/a/x.xml", ChangeKind::Created)]);

        let modified = change_events(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/a/x.xml"],
        ));
        assert_eq!(modified[0].kind, ChangeKind::Modified);

        let removed = change_events(&event(EventKind::Remove(RemoveKind::File), &["/a/x.xml"]));
        assert_eq!(removed[0].kind, ChangeKind::Deleted);
    }

    #[test]
    fn metadata_and_access_are_other() {
        let meta = change_events(&event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)),
            &["/a/x.xml"],
        ));
        assert_eq!(meta[0].kind, ChangeKind::Other);

        let access = change_events(&event(EventKind::Access(AccessKind::Any), &["/a/x.xml"]));
        assert_eq!(access[0].kind, ChangeKind::Other);
    }

    #[test]
    fn rename_in_place_vs_move() {
        let renamed = change_events(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/a/old.xml", "/a/new.xml"],
        ));
        assert_eq!(renamed, vec![ChangeEvent::new("/a/new.xml", ChangeKind::Renamed)]);

        let moved = change_events(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/a/old.xml", "/b/old.xml"],
        ));
        assert_eq!(moved, vec![ChangeEvent::new("/b/old.xml", ChangeKind::Moved)]);
    }
}
