use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, Write};

pub fn setup_terminal(out: &mut impl Write) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, Hide)
}

pub fn restore_terminal(out: &mut impl Write) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, Show, LeaveAlternateScreen)
}

pub fn size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}

/// Repaints the whole screen, clipping the frame to the terminal height.
pub fn paint(out: &mut impl Write, frame: &str, height: u16) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in frame.lines().take(height as usize).enumerate() {
        queue!(out, MoveTo(0, row as u16), Print(line))?;
    }
    out.flush()
}
