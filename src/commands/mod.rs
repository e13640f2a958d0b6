//! The shell's verb layer: thin glue that validates operands, resolves
//! paths, and calls into the tree, propagating its errors unchanged.

mod cd;
mod command;
mod help;
mod ls;
mod mkdir;
mod mv;
mod pwd;
mod rename;
mod rm;
mod touch;

pub use command::{Command, CommandError};
