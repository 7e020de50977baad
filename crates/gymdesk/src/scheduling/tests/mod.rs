mod common;

mod directory;
mod validation;
