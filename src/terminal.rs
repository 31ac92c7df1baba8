//! Raw-mode terminal front end built on crossterm.
//!
//! Arrow keys slide a tile into the blank, a left click on a tile slides that
//! tile, F2 (or `n`) deals a new game, `r` replays the best stored game and
//! `q`/Esc quits.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use log::{debug, warn};

use crate::controller::{BoardView, Controller, Frontend, MoveRequest, NewGame};
use crate::game::{Clock, GameState};
use crate::permutation::SIDE;
use crate::puzzle::Direction;
use crate::scores::ScoreRecord;

const LEFT: u16 = 2;
const TOP: u16 = 2;
const CELL_WIDTH: u16 = 5;

/// Input mapped to what the game should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(MoveRequest),
    NewGame,
    Replay,
    Quit,
}

pub fn action_for(event: &Event) -> Option<Action> {
    match event {
        Event::Key(KeyEvent { code, .. }) => match code {
            KeyCode::Left => Some(Action::Move(MoveRequest::Toward(Direction::Left))),
            KeyCode::Right => Some(Action::Move(MoveRequest::Toward(Direction::Right))),
            KeyCode::Up => Some(Action::Move(MoveRequest::Toward(Direction::Up))),
            KeyCode::Down => Some(Action::Move(MoveRequest::Toward(Direction::Down))),
            KeyCode::F(2) | KeyCode::Char('n') => Some(Action::NewGame),
            KeyCode::Char('r') => Some(Action::Replay),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => cell_at(*column, *row).map(|(row, column)| {
            Action::Move(MoveRequest::At {
                row: row as isize,
                column: column as isize,
            })
        }),
        _ => None,
    }
}

/// Board cell under a screen position, if any. Borders do not count.
pub fn cell_at(x: u16, y: u16) -> Option<(usize, usize)> {
    let dx = x.checked_sub(LEFT + 1)?;
    let dy = y.checked_sub(TOP + 1)?;
    if dx % CELL_WIDTH == CELL_WIDTH - 1 || dy % 2 == 1 {
        return None;
    }
    let (row, column) = ((dy / 2) as usize, (dx / CELL_WIDTH) as usize);
    (row < SIDE && column < SIDE).then_some((row, column))
}

/// `mm:ss`, minutes growing past two digits if needed.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn header(view: &BoardView) -> String {
    format!(
        "Fifteen   moves: {}   time: {}",
        view.moves,
        format_elapsed(view.elapsed_secs)
    )
}

/// Screen lines for `view`, header first, starting at row 0.
pub fn layout(view: &BoardView) -> Vec<String> {
    let border = format!("+{}", "----+".repeat(SIDE));
    let mut lines = vec![header(view), String::new(), border.clone()];
    for row in &view.grid {
        let mut line = String::from("|");
        for cell in row {
            line.push_str(&format!(" {:>2} |", cell.to_string()));
        }
        lines.push(line);
        lines.push(border.clone());
    }
    lines
}

pub struct TerminalFrontend<W: Write> {
    out: W,
    status: String,
    replay: bool,
}

impl<W: Write> TerminalFrontend<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            status: String::new(),
            replay: true,
        }
    }

    /// Leaves the replay key out of the help line.
    pub fn without_replay(mut self) -> Self {
        self.replay = false;
        self
    }

    fn draw(&mut self, view: &BoardView) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, 0), terminal::Clear(ClearType::FromCursorDown))?;
        for (i, line) in layout(view).iter().enumerate() {
            // header is flush left, the grid is indented
            let x = if i < TOP as usize { 0 } else { LEFT };
            queue!(self.out, cursor::MoveTo(x, i as u16), Print(line))?;
        }
        let help = if self.replay {
            "arrows/click: move   F2/n: new game   r: replay best   q: quit"
        } else {
            "arrows/click: move   F2/n: new game   q: quit"
        };
        let footer = TOP + 2 * SIDE as u16 + 2;
        queue!(
            self.out,
            cursor::MoveTo(0, footer),
            Print(&self.status),
            cursor::MoveTo(0, footer + 2),
            Print(help),
        )?;
        self.out.flush()
    }

    /// Rewrites the header line only.
    fn draw_header(&mut self, view: &BoardView) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            Print(header(view)),
        )?;
        self.out.flush()
    }

    fn prompt(&mut self, question: &str) -> io::Result<bool> {
        let footer = TOP + 2 * SIDE as u16 + 2;
        queue!(
            self.out,
            cursor::MoveTo(0, footer),
            terminal::Clear(ClearType::CurrentLine),
            Print(question),
        )?;
        self.out.flush()?;

        loop {
            if let Event::Key(KeyEvent { code, .. }) = event::read()? {
                match code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return Ok(true),
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Ok(false),
                    _ => {}
                }
            }
        }
    }
}

impl<W: Write> Frontend for TerminalFrontend<W> {
    fn render(&mut self, view: &BoardView) {
        if let Err(e) = self.draw(view) {
            warn!("redraw failed: {}", e);
        }
    }

    fn tick(&mut self, view: &BoardView) {
        if let Err(e) = self.draw_header(view) {
            warn!("clock redraw failed: {}", e);
        }
    }

    fn solved(&mut self, record: &ScoreRecord, rank: Option<usize>) {
        self.status = format!(
            "Done! :)  {} in {} moves",
            format_elapsed(record.elapsed_secs),
            record.moves
        );
        if let Some(rank) = rank {
            self.status.push_str(&format!("  (place {})", rank + 1));
        }
    }

    fn confirm_restart(&mut self) -> bool {
        self.prompt("A game is already started. Start a new one? (y/n)")
            .unwrap_or_else(|e| {
                warn!("prompt failed: {}", e);
                false
            })
    }
}

/// Raw mode, alternate screen and mouse capture for as long as it lives.
pub struct RawSession;

impl RawSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for RawSession {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Event loop. Polls with `tick` as timeout so the clock keeps moving while
/// the player thinks.
pub fn run<W: Write, C: Clock>(
    ctl: &mut Controller<TerminalFrontend<W>, C>,
    tick: Duration,
) -> io::Result<()> {
    loop {
        if !event::poll(tick)? {
            if ctl.game().state() == GameState::InProgress {
                ctl.tick();
            }
            continue;
        }

        let event = event::read()?;
        match action_for(&event) {
            Some(Action::Quit) => return Ok(()),
            Some(Action::NewGame) => {
                ctl.frontend_mut().status.clear();
                ctl.request_new_game(false, NewGame::Shuffle);
            }
            Some(Action::Replay) if !ctl.replay_enabled() => debug!("replay is disabled"),
            Some(Action::Replay) => {
                ctl.frontend_mut().status.clear();
                ctl.request_new_game(false, NewGame::Replay(0));
            }
            Some(Action::Move(request)) => match ctl.request_move(request) {
                // redraw so the solved notice shows up
                Ok(outcome) if outcome.solved => ctl.refresh(),
                Ok(_) => {}
                Err(e) => debug!("ignored: {}", e),
            },
            None => {
                if let Event::Resize(..) = event {
                    ctl.refresh();
                }
            }
        }
    }
}
