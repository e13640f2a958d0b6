use crate::commands::command::CommandError;
use crate::shell::Session;

pub(super) fn run(session: &mut Session, _args: &[&str]) -> Result<Option<String>, CommandError> {
    let verbs: Vec<&str> = session.verbs().collect();
    Ok(Some(verbs.join("\n")))
}

#[cfg(test)]
mod tests {
    use crate::fs::Dir;

    use super::*;

    #[test]
    fn help_lists_every_verb_in_registration_order() {
        let mut session = Session::new(Dir::root());
        let out = run(&mut session, &[]).unwrap().unwrap();
        assert_eq!(
            out,
            "touch\nmkdir\nls\ncd\npwd\nrm\nrename\nmv\nhelp"
        );
    }
}
