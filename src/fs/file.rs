use std::rc::Rc;

use crate::fs::dir::{Dir, FsError, validate_name};

#[derive(Debug)]
struct FileNode {
    name: String,
}

/// Named leaf entry with no content payload. Handles compare equal when
/// they designate the same node.
#[derive(Debug, Clone)]
pub struct File(Rc<FileNode>);

impl File {
    /// Creates a file and registers it in `dir`. The directory's collision
    /// check is the enforcement point; its error propagates verbatim.
    pub fn new(name: impl Into<String>, dir: &Dir) -> Result<Self, FsError> {
        let name = name.into();
        validate_name(&name)?;
        let file = File(Rc::new(FileNode { name }));
        dir.add_file(file.clone())?;
        Ok(file)
    }

    pub fn name(&self) -> String {
        self.0.name.clone()
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for File {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file_is_live_and_owned_by_the_directory() {
        let root = Dir::root();
        let file = File::new("note.txt", &root).unwrap();
        assert_eq!(file.name(), "note.txt");
        assert_eq!(root.find_file("note.txt").unwrap(), file);
    }

    #[test]
    fn collision_error_propagates_from_the_directory() {
        let root = Dir::root();
        Dir::new("taken", &root).unwrap();
        let err = File::new("taken", &root).unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists { .. }));
    }

    #[test]
    fn invalid_names_are_rejected_before_registration() {
        let root = Dir::root();
        assert!(matches!(
            File::new("", &root).unwrap_err(),
            FsError::EmptyName
        ));
        assert!(matches!(
            File::new("a/b", &root).unwrap_err(),
            FsError::InvalidName { .. }
        ));
        assert_eq!(root.list(), "");
    }
}
