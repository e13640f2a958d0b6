use snafu::ResultExt;

use crate::commands::command::{BadUsageSnafu, CommandError, FsSnafu};
use crate::fs::path;
use crate::shell::Session;

const VERB: &str = "rename";

pub(super) fn run(session: &mut Session, args: &[&str]) -> Result<Option<String>, CommandError> {
    let &[path_arg, new_name] = args else {
        return BadUsageSnafu {
            usage: "rename PATH NEW_NAME",
        }
        .fail();
    };
    let dir = path::resolve(path_arg, session.cwd(), session.root())
        .context(FsSnafu { verb: VERB })?;
    dir.rename(new_name).context(FsSnafu { verb: VERB })?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use crate::fs::{Dir, FsError};

    use super::*;

    #[test]
    fn rename_requires_exactly_two_operands() {
        let mut session = Session::new(Dir::root());
        assert!(matches!(
            run(&mut session, &["only-one"]).unwrap_err(),
            CommandError::BadUsage { .. }
        ));
    }

    #[test]
    fn rename_changes_a_directory_name_in_place() {
        let root = Dir::root();
        let a = Dir::new("a", &root).unwrap();
        let mut session = Session::new(root);
        run(&mut session, &["a", "z"]).unwrap();
        assert_eq!(a.name(), "z");
        assert!(session.root().find_dir("z").is_ok());
    }

    #[test]
    fn rename_propagates_invalid_names() {
        let root = Dir::root();
        Dir::new("a", &root).unwrap();
        let mut session = Session::new(root);
        let err = run(&mut session, &["a", "x/y"]).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Fs {
                source: FsError::InvalidName { .. },
                ..
            }
        ));
    }

    #[test]
    fn rename_does_not_apply_to_files() {
        let root = Dir::root();
        crate::fs::File::new("f", &root).unwrap();
        let mut session = Session::new(root);
        let err = run(&mut session, &["f", "g"]).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Fs {
                source: FsError::NotFound { .. },
                ..
            }
        ));
    }
}
