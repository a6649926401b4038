//! Line-based terminal front-end.

use anyhow::{Context, Result};
use noughts_core::{GameSession, SessionObserver, SessionState, Table, WinningLine};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument};

const HIGHLIGHT: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Terminal mirror of the board, fed by the session callbacks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TerminalView {
    cells: [String; 9],
    highlight: Option<WinningLine>,
}

impl TerminalView {
    /// Creates a blank view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell symbols as last rendered.
    pub fn cells(&self) -> &[String; 9] {
        &self.cells
    }

    /// Line currently highlighted.
    pub fn highlight(&self) -> Option<WinningLine> {
        self.highlight
    }

    /// Draws the grid; empty cells show the key that claims them.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = &self.cells[index];
                if symbol.is_empty() {
                    out.push_str(&(index + 1).to_string());
                } else if self.highlight.is_some_and(|line| line.contains(index)) {
                    out.push_str(&format!("{}{}{}", HIGHLIGHT, symbol, RESET));
                } else {
                    out.push_str(symbol);
                }
                if col < 2 {
                    out.push('|');
                }
            }
            out.push('\n');
            if row < 2 {
                out.push_str("-+-+-\n");
            }
        }
        out
    }
}

impl SessionObserver for TerminalView {
    fn on_cell_changed(&mut self, index: usize, symbol: &str, _disabled: bool) {
        // A win is re-announced after its cells, so any change drops the old line.
        self.highlight = None;
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = symbol.to_string();
        }
    }

    fn on_game_won(&mut self, line: WinningLine) {
        self.highlight = Some(line);
    }
}

/// A line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Claim cell 0-8.
    Click(usize),
    /// Start a game, or clear the running one.
    StartOrClear,
    /// Write the save file.
    Save,
    /// Replace the game with the save file.
    Load,
    /// Print the commands.
    Help,
    /// Leave.
    Quit,
}

impl Input {
    /// Parses a command; cells are typed 1-9.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim().to_lowercase();
        if let Ok(n) = line.parse::<usize>() {
            return (1..=9).contains(&n).then(|| Input::Click(n - 1));
        }
        match line.as_str() {
            "s" | "start" | "clear" => Some(Input::StartOrClear),
            "save" => Some(Input::Save),
            "load" => Some(Input::Load),
            "h" | "help" | "?" => Some(Input::Help),
            "q" | "quit" | "exit" => Some(Input::Quit),
            _ => None,
        }
    }
}

const HELP: &str = "1-9: place a mark  s: start/clear  save  load  q: quit";

/// One-line summary of the session.
pub fn status_line(session: &GameSession) -> String {
    match session.state() {
        SessionState::NotStarted => format!("{} - press s to start", session.mode()),
        SessionState::InProgress => match session.human_to_move() {
            Some(player) => format!("{} to move", player.symbol()),
            None => "Waiting".to_string(),
        },
        SessionState::Won(player, line) => format!("{} wins on {}", player.symbol(), line),
        SessionState::Drawn => "Draw".to_string(),
    }
}

/// Reads commands from `input` until quit or end of input.
#[instrument(skip_all)]
pub async fn run<R, W>(table: &Table<TerminalView>, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    draw(table, output).await?;
    writeln!(output, "{}", HELP)?;

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let Some(command) = Input::parse(&line) else {
            writeln!(output, "Unknown command {:?}. {}", line.trim(), HELP)?;
            continue;
        };
        debug!(?command, "Command");

        let result = match command {
            Input::Click(index) => table.on_human_click(index).await,
            Input::StartOrClear => table.on_start_or_clear().await,
            Input::Save => table.save().await,
            Input::Load => table.load().await,
            Input::Help => {
                writeln!(output, "{}", HELP)?;
                continue;
            }
            Input::Quit => break,
        };

        if let Err(e) = result {
            writeln!(output, "! {}", e)?;
        }
        draw(table, output).await?;
    }

    info!("Leaving game");
    Ok(())
}

async fn draw<W: Write>(table: &Table<TerminalView>, output: &mut W) -> Result<()> {
    let frame = table
        .view(|session, view| format!("{}{}", view.render(), status_line(session)))
        .await;
    writeln!(output, "\n{}", frame)?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_core::{GameMode, Player};

    #[test]
    fn test_parse_commands() {
        assert_eq!(Input::parse("5"), Some(Input::Click(4)));
        assert_eq!(Input::parse(" 1 \n"), Some(Input::Click(0)));
        assert_eq!(Input::parse("0"), None);
        assert_eq!(Input::parse("10"), None);
        assert_eq!(Input::parse("S"), Some(Input::StartOrClear));
        assert_eq!(Input::parse("save"), Some(Input::Save));
        assert_eq!(Input::parse("quit"), Some(Input::Quit));
        assert_eq!(Input::parse("minimax"), None);
    }

    #[test]
    fn test_view_tracks_callbacks() {
        let mut view = TerminalView::new();
        view.on_cell_changed(4, "X", true);
        assert_eq!(view.render(), "1|2|3\n-+-+-\n4|X|6\n-+-+-\n7|8|9\n");

        view.on_game_won(WinningLine::new([0, 4, 8]));
        assert!(view.render().contains("\x1b[31mX\x1b[0m"));

        view.on_cell_changed(4, "", false);
        assert_eq!(view.highlight(), None);
        assert_eq!(view.cells()[4], "");
    }

    #[test]
    fn test_status_line() {
        let mut session = GameSession::new();
        assert_eq!(status_line(&session), "human-vs-human - press s to start");

        session.start(GameMode::HumanVsHuman).unwrap();
        session.apply_human_move(0).unwrap();
        assert_eq!(session.human_to_move(), Some(Player::O));
        assert_eq!(status_line(&session), "O to move");
    }
}
