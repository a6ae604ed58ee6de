//! keybed - a one-octave piano you play from the terminal.
//!
//! Top row of the keyboard maps to the octave around middle C
//! (Q W E R T Y U white keys, 2 3 5 6 7 black keys); the mouse plays the
//! drawn keys directly. Esc quits.

mod app;
mod ui;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    app::run()
}
