use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use derive_more::Display;
use snafu::Snafu;

use crate::fs::file::File;

/// The character separating path segments; child names must never contain it.
pub const SEPARATOR: char = '/';

/// Tag prefixed to each `list()` line to mark the entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    #[display("[d]")]
    Dir,
    #[display("[f]")]
    File,
}

struct DirNode {
    name: String,
    // `None` marks the root; everything else points at the owning parent.
    parent: Option<Weak<RefCell<DirNode>>>,
    files: Vec<File>,
    dirs: Vec<Dir>,
}

/// Cheaply clonable handle to a directory node.
///
/// The parent owns its children through the `files`/`dirs` collections; the
/// back-reference a child keeps is weak, so the tree has a single ownership
/// direction. Two handles compare equal when they designate the same node.
#[derive(Clone)]
pub struct Dir(Rc<RefCell<DirNode>>);

impl Dir {
    /// Creates the distinguished root directory.
    pub fn root() -> Self {
        Dir(Rc::new(RefCell::new(DirNode {
            name: String::from("/"),
            parent: None,
            files: Vec::new(),
            dirs: Vec::new(),
        })))
    }

    /// Creates a directory under `parent` and registers it there. Fails
    /// without touching `parent` when the name is invalid or already taken.
    pub fn new(name: impl Into<String>, parent: &Dir) -> Result<Self, FsError> {
        let name = name.into();
        validate_name(&name)?;
        let dir = Dir(Rc::new(RefCell::new(DirNode {
            name,
            parent: Some(Rc::downgrade(&parent.0)),
            files: Vec::new(),
            dirs: Vec::new(),
        })));
        parent.add_dir(dir.clone())?;
        Ok(dir)
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn is_root(&self) -> bool {
        self.0.borrow().parent.is_none()
    }

    /// The owning parent. The root yields itself, as does the top of a
    /// detached subtree whose former parent has been freed.
    pub fn parent(&self) -> Dir {
        let node = self.0.borrow();
        node.parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Dir)
            .unwrap_or_else(|| self.clone())
    }

    /// True when any immediate child, file or directory, has exactly `name`.
    pub fn exists(&self, name: &str) -> bool {
        let node = self.0.borrow();
        node.dirs.iter().any(|d| d.0.borrow().name == name)
            || node.files.iter().any(|f| f.name() == name)
    }

    /// Registers a file. The collision check here is the single enforcement
    /// point of the sibling-uniqueness invariant; every creation path goes
    /// through it or through `add_dir`.
    pub fn add_file(&self, file: File) -> Result<(), FsError> {
        let name = file.name();
        if self.exists(&name) {
            return AlreadyExistsSnafu { name }.fail();
        }
        self.0.borrow_mut().files.push(file);
        Ok(())
    }

    /// Registers a directory. This only appends to the child collection; the
    /// child's back-reference is managed by `Dir::new` and `move_to`, which
    /// are the normal entry points.
    pub fn add_dir(&self, dir: Dir) -> Result<(), FsError> {
        let name = dir.name();
        if self.exists(&name) {
            return AlreadyExistsSnafu { name }.fail();
        }
        self.0.borrow_mut().dirs.push(dir);
        Ok(())
    }

    /// Removes the single child named `name`, files searched before
    /// directories. Removing a non-empty directory detaches its subtree; the
    /// descendants stay consistent among themselves but become unreachable
    /// from the root once the caller drops its handles.
    pub fn remove(&self, name: &str) -> Result<(), FsError> {
        let mut node = self.0.borrow_mut();
        if let Some(at) = node.files.iter().position(|f| f.name() == name) {
            node.files.swap_remove(at);
            return Ok(());
        }
        if let Some(at) = node.dirs.iter().position(|d| d.0.borrow().name == name) {
            node.dirs.swap_remove(at);
            return Ok(());
        }
        NotFoundSnafu { name }.fail()
    }

    /// Renames this directory in place. Collision is checked against the
    /// parent's other children, never against this directory's own; the
    /// parent looks children up by live name, so nothing is re-indexed.
    pub fn rename(&self, new_name: &str) -> Result<(), FsError> {
        if new_name == self.0.borrow().name {
            return Ok(());
        }
        validate_name(new_name)?;
        if self.is_root() {
            return RootForbiddenSnafu { operation: "renamed" }.fail();
        }
        if self.parent().exists(new_name) {
            return AlreadyExistsSnafu { name: new_name }.fail();
        }
        self.0.borrow_mut().name = new_name.to_owned();
        Ok(())
    }

    /// Moves this directory under `new_parent` as one operation: destination
    /// collision, root move, and moves into this directory's own subtree are
    /// rejected before anything is touched, so an error leaves the tree
    /// exactly as it was. Moving to the current parent is a no-op.
    pub fn move_to(&self, new_parent: &Dir) -> Result<(), FsError> {
        if self.is_root() {
            return RootForbiddenSnafu { operation: "moved" }.fail();
        }
        let mut cursor = new_parent.clone();
        loop {
            if cursor == *self {
                return MoveIntoSelfSnafu { name: self.name() }.fail();
            }
            let above = cursor.parent();
            if above == cursor {
                break;
            }
            cursor = above;
        }
        let old_parent = self.parent();
        if old_parent == *new_parent {
            return Ok(());
        }
        let name = self.name();
        if new_parent.exists(&name) {
            return AlreadyExistsSnafu { name }.fail();
        }
        old_parent.detach_child(self);
        self.set_parent(new_parent);
        new_parent.0.borrow_mut().dirs.push(self.clone());
        Ok(())
    }

    /// Resolves a child directory; `.` is this directory and `..` its
    /// parent, which at the root resolves to the root itself.
    pub fn find_dir(&self, name: &str) -> Result<Dir, FsError> {
        if name == "." {
            return Ok(self.clone());
        }
        if name == ".." {
            return Ok(self.parent());
        }
        let node = self.0.borrow();
        node.dirs
            .iter()
            .find(|d| d.0.borrow().name == name)
            .cloned()
            .ok_or_else(|| FsError::NotFound {
                name: name.to_owned(),
            })
    }

    pub fn find_file(&self, name: &str) -> Result<File, FsError> {
        let node = self.0.borrow();
        node.files
            .iter()
            .find(|f| f.name() == name)
            .cloned()
            .ok_or_else(|| FsError::NotFound {
                name: name.to_owned(),
            })
    }

    /// Renders the children one tagged line each, directories first, in
    /// insertion order. No sorting.
    pub fn list(&self) -> String {
        let node = self.0.borrow();
        let mut out = String::new();
        for d in &node.dirs {
            out.push_str(&format!("{} {}\n", EntryKind::Dir, d.0.borrow().name));
        }
        for f in &node.files {
            out.push_str(&format!("{} {}\n", EntryKind::File, f.name()));
        }
        out
    }

    fn detach_child(&self, child: &Dir) {
        let mut node = self.0.borrow_mut();
        if let Some(at) = node.dirs.iter().position(|d| d == child) {
            node.dirs.swap_remove(at);
        }
    }

    fn set_parent(&self, to: &Dir) {
        self.0.borrow_mut().parent = Some(Rc::downgrade(&to.0));
    }
}

impl PartialEq for Dir {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Dir {}

impl fmt::Debug for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("Dir")
            .field("name", &node.name)
            .field("dirs", &node.dirs.len())
            .field("files", &node.files.len())
            .finish()
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), FsError> {
    if name.is_empty() {
        return EmptyNameSnafu.fail();
    }
    if name.contains(SEPARATOR) {
        return InvalidNameSnafu { name }.fail();
    }
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum FsError {
    #[snafu(display("'{}': already exists", name))]
    AlreadyExists { name: String },
    #[snafu(display("'{}': no such file or directory", name))]
    NotFound { name: String },
    #[snafu(display("name cannot be empty"))]
    EmptyName,
    #[snafu(display("'{}': name cannot contain '{}'", name, SEPARATOR))]
    InvalidName { name: String },
    #[snafu(display("'{}': cannot move a directory into its own subtree", name))]
    MoveIntoSelf { name: String },
    #[snafu(display("the root directory cannot be {}", operation))]
    RootForbidden { operation: &'static str },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn add_file_makes_name_visible_to_exists() {
        let root = Dir::root();
        File::new("foo.txt", &root).unwrap();
        assert!(root.exists("foo.txt"));
    }

    #[test]
    fn add_file_rejects_name_taken_by_sibling_file() {
        let root = Dir::root();
        File::new("a", &root).unwrap();
        let err = File::new("a", &root).unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists { .. }));
    }

    #[test]
    fn add_dir_rejects_name_taken_by_sibling_file() {
        let root = Dir::root();
        File::new("a", &root).unwrap();
        let err = Dir::new("a", &root).unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists { .. }));
    }

    #[test]
    fn add_file_rejects_name_taken_by_sibling_dir() {
        let root = Dir::root();
        Dir::new("a", &root).unwrap();
        let err = File::new("a", &root).unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists { .. }));
    }

    #[test]
    fn names_compare_case_sensitively() {
        let root = Dir::root();
        File::new("Readme", &root).unwrap();
        assert!(!root.exists("readme"));
        File::new("readme", &root).unwrap();
    }

    #[test]
    fn new_dir_with_invalid_name_leaves_parent_untouched() {
        let root = Dir::root();
        assert!(matches!(
            Dir::new("a/b", &root).unwrap_err(),
            FsError::InvalidName { .. }
        ));
        assert!(matches!(
            Dir::new("", &root).unwrap_err(),
            FsError::EmptyName
        ));
        assert_eq!(root.list(), "");
    }

    #[test]
    fn remove_clears_name_and_second_remove_fails() {
        let root = Dir::root();
        File::new("a", &root).unwrap();
        root.remove("a").unwrap();
        assert!(!root.exists("a"));
        assert!(matches!(
            root.remove("a").unwrap_err(),
            FsError::NotFound { .. }
        ));
    }

    #[test]
    fn remove_keeps_every_other_child_exactly_once() {
        let root = Dir::root();
        for name in ["d1", "d2", "d3"] {
            Dir::new(name, &root).unwrap();
        }
        for name in ["f1", "f2"] {
            File::new(name, &root).unwrap();
        }
        root.remove("d2").unwrap();
        root.remove("f1").unwrap();

        let listing = root.list();
        for kept in ["[d] d1", "[d] d3", "[f] f2"] {
            assert_eq!(listing.matches(kept).count(), 1, "missing {kept}");
        }
        assert_eq!(listing.lines().count(), 3);
    }

    #[test]
    fn remove_detaches_subtree_without_destroying_it() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        let b = Dir::new("b", &a).unwrap();
        File::new("c", &b).unwrap();

        root.remove("a").unwrap();

        assert!(matches!(
            root.find_dir("a").unwrap_err(),
            FsError::NotFound { .. }
        ));
        // The detached subtree stays consistent for whoever still holds it.
        assert_eq!(a.find_dir("b").unwrap(), b);
        assert!(b.exists("c"));
    }

    #[test]
    fn rename_to_current_name_is_a_noop() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        a.rename("a").unwrap();
        assert_eq!(a.name(), "a");
    }

    #[test]
    fn rename_rejects_empty_name() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        assert!(matches!(a.rename("").unwrap_err(), FsError::EmptyName));
    }

    #[rstest]
    #[case("a/b")]
    #[case("/")]
    #[case("trailing/")]
    fn rename_rejects_names_with_separator(#[case] new_name: &str) {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        assert!(matches!(
            a.rename(new_name).unwrap_err(),
            FsError::InvalidName { .. }
        ));
        assert_eq!(a.name(), "a");
    }

    #[test]
    fn rename_rejects_sibling_collision() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        File::new("b", &root).unwrap();
        assert!(matches!(
            a.rename("b").unwrap_err(),
            FsError::AlreadyExists { .. }
        ));
        assert_eq!(a.name(), "a");
    }

    #[test]
    fn rename_ignores_own_children() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        Dir::new("x", &a).unwrap();
        // Collision is checked among siblings only.
        a.rename("x").unwrap();
        assert_eq!(a.name(), "x");
    }

    #[test]
    fn rename_is_visible_through_parent_lookup() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        a.rename("z").unwrap();
        assert_eq!(root.find_dir("z").unwrap(), a);
        assert!(!root.exists("a"));
    }

    #[test]
    fn rename_of_root_is_rejected() {
        let root = Dir::root();
        assert!(matches!(
            root.rename("other").unwrap_err(),
            FsError::RootForbidden { .. }
        ));
    }

    #[test]
    fn root_is_self_referential_under_dot_and_dotdot() {
        let root = Dir::root();
        assert!(root.is_root());
        assert_eq!(root.find_dir(".").unwrap(), root);
        assert_eq!(root.find_dir("..").unwrap(), root);
        assert_eq!(root.parent(), root);
    }

    #[test]
    fn parent_of_child_is_the_owning_directory() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        let b = Dir::new("b", &a).unwrap();
        assert!(!b.is_root());
        assert_eq!(b.parent(), a);
        assert_eq!(b.find_dir("..").unwrap(), a);
        assert_eq!(b.find_dir(".").unwrap(), b);
    }

    #[test]
    fn find_dir_does_not_see_files() {
        let root = Dir::root();
        File::new("foo.txt", &root).unwrap();
        assert!(root.find_file("foo.txt").is_ok());
        assert!(matches!(
            root.find_dir("foo.txt").unwrap_err(),
            FsError::NotFound { .. }
        ));
    }

    #[test]
    fn find_file_does_not_see_dirs() {
        let root = Dir::root();
        Dir::new("a", &root).unwrap();
        assert!(matches!(
            root.find_file("a").unwrap_err(),
            FsError::NotFound { .. }
        ));
    }

    #[test]
    fn list_tags_dirs_before_files_in_insertion_order() {
        let root = Dir::root();
        File::new("f1", &root).unwrap();
        Dir::new("d1", &root).unwrap();
        Dir::new("d2", &root).unwrap();
        File::new("f2", &root).unwrap();
        assert_eq!(root.list(), "[d] d1\n[d] d2\n[f] f1\n[f] f2\n");
    }

    #[test]
    fn list_of_empty_dir_is_empty() {
        assert_eq!(Dir::root().list(), "");
    }

    #[test]
    fn list_is_stable_across_read_only_calls() {
        let root = Dir::root();
        Dir::new("a", &root).unwrap();
        File::new("b", &root).unwrap();
        let first = root.list();
        root.exists("a");
        root.find_dir("a").unwrap();
        assert_eq!(root.list(), first);
    }

    #[test]
    fn move_to_reattaches_under_new_parent() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        let b = Dir::new("b", &root).unwrap();
        b.move_to(&a).unwrap();

        assert!(!root.exists("b"));
        assert_eq!(a.find_dir("b").unwrap(), b);
        assert_eq!(b.parent(), a);
    }

    #[test]
    fn move_to_rejects_destination_collision_and_changes_nothing() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        let b = Dir::new("b", &root).unwrap();
        File::new("b", &a).unwrap();

        assert!(matches!(
            b.move_to(&a).unwrap_err(),
            FsError::AlreadyExists { .. }
        ));
        assert_eq!(root.find_dir("b").unwrap(), b);
        assert_eq!(b.parent(), root);
    }

    #[test]
    fn move_to_rejects_own_subtree() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        let b = Dir::new("b", &a).unwrap();

        assert!(matches!(
            a.move_to(&b).unwrap_err(),
            FsError::MoveIntoSelf { .. }
        ));
        assert!(matches!(
            a.move_to(&a).unwrap_err(),
            FsError::MoveIntoSelf { .. }
        ));
        assert_eq!(a.parent(), root);
        assert_eq!(b.parent(), a);
    }

    #[test]
    fn move_to_current_parent_is_a_noop() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        a.move_to(&root).unwrap();
        assert_eq!(root.find_dir("a").unwrap(), a);
        assert_eq!(root.list().lines().count(), 1);
    }

    #[test]
    fn move_of_root_is_rejected() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        assert!(matches!(
            root.move_to(&a).unwrap_err(),
            FsError::RootForbidden { .. }
        ));
    }
}
