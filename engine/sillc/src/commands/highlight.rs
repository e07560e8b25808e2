//! The `highlight` command: print the classified token table for a file.

use super::read_file;
use crate::CliError;
use sill_syntax::classify;

pub fn highlight_file(path: &str) -> Result<(), CliError> {
    let source = read_file(path)?;
    for highlight in classify(&source) {
        let Some(class) = highlight.kind.css_class() else {
            continue;
        };
        let lexeme = &source[highlight.span.start as usize..highlight.span.end as usize];
        println!(
            "{:>6}..{:<6} {:<10} {:?}",
            highlight.span.start, highlight.span.end, class, lexeme
        );
    }
    Ok(())
}
