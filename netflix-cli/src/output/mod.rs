//! Output formatting for CLI.

mod json;
mod text;

pub use json::{HistoryOutput, JsonFormatter, ProfileOutput, RatingOutput};
pub use text::TextFormatter;

use crate::{Cli, OutputFormat};

/// Prints a list either as text lines or as JSON, per the global flags.
pub fn print_list<T, O>(
    cli: &Cli,
    items: &[T],
    to_output: impl Fn(&T) -> O,
    to_text: impl Fn(&TextFormatter, &[T]) -> String,
) -> anyhow::Result<()>
where
    O: serde::Serialize,
{
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", to_text(&formatter, items));
        }
        OutputFormat::Json => {
            let outputs: Vec<O> = items.iter().map(to_output).collect();
            println!("{}", JsonFormatter::new(cli.pretty).format(&outputs)?);
        }
    }
    Ok(())
}
