//! Binary that emits command-line options markdown to stdout.
//!
//! Pipe into the command-line options reference page.

fn main() {
    print!("{}", chartslot_cli::render_options_markdown());
}
