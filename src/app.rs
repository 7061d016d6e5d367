use crate::command::Command;
use crate::consts;
use crate::game::{Game, RunState};
use crate::host::{HostEvent, HostShell};
use crate::leaderboard::{Entry, Leaderboard};
use crate::persistence::ScoreStore;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event};
use log::error;
use rand::{rngs::ThreadRng, Rng};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Rect, Size},
    text::Line,
    widgets::{Block, Clear, Widget},
    Frame, Terminal,
};
use std::io;
use std::time::Instant;

/// The collaborators that hear about the game's lifecycle.  Their failures
/// are logged and otherwise ignored.
#[derive(Debug)]
pub(crate) struct Services {
    /// Name under which totals are submitted to the leaderboard
    pub(crate) player: String,
    pub(crate) store: Box<dyn ScoreStore>,
    pub(crate) leaderboard: Option<Box<dyn Leaderboard>>,
    pub(crate) host: Option<Box<dyn HostShell>>,
}

impl Services {
    fn notify(&mut self, event: HostEvent) {
        if let Some(host) = self.host.as_mut() {
            if let Err(e) = host.send(event) {
                log_failure("Failed to notify host", e);
            }
        }
    }

    /// Return the current leaderboard standings, or nothing if there is no
    /// leaderboard or it could not be read
    fn standings(&mut self) -> Vec<Entry> {
        let Some(leaderboard) = self.leaderboard.as_mut() else {
            return Vec::new();
        };
        leaderboard.fetch().unwrap_or_else(|e| {
            log_failure("Failed to fetch leaderboard", e);
            Vec::new()
        })
    }

    /// Report a finished run and return the updated leaderboard standings
    fn finish_run(&mut self, score: u32, total: u64) -> Vec<Entry> {
        if let Err(e) = self.store.save_total(total) {
            log_failure("Failed to save total score", e);
        }
        self.notify(HostEvent::GameOver {
            score,
            total_score: total,
        });
        let Some(leaderboard) = self.leaderboard.as_mut() else {
            return Vec::new();
        };
        match leaderboard.submit(&self.player, total) {
            Ok(entries) => entries,
            Err(e) => {
                log_failure("Failed to update leaderboard", e);
                Vec::new()
            }
        }
    }
}

/// Log an error along with its chain of causes
pub(crate) fn log_failure<E: Into<anyhow::Error>>(what: &str, e: E) {
    let e = e.into();
    error!("{what}: {e:#}");
}

#[derive(Debug)]
pub(crate) struct App<R = ThreadRng> {
    game: Game<R>,
    services: Services,
    /// Leaderboard as of start-up or the end of the last run, shown whenever
    /// no run is in progress
    standings: Vec<Entry>,
    quitting: bool,
}

impl<R: Rng> App<R> {
    pub(crate) fn new(game: Game<R>, services: Services) -> App<R> {
        App {
            game,
            services,
            standings: Vec::new(),
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        self.greet();
        while !self.quitting {
            terminal.draw(|frame| self.draw(frame))?;
            self.process_input()?;
        }
        Ok(())
    }

    /// Tell the host we are ready and load the standings to show before the
    /// first run
    fn greet(&mut self) {
        self.services.notify(HostEvent::Ready);
        self.standings = self.services.standings();
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(&self.game, frame.area());
        if !self.game.running() && !self.standings.is_empty() {
            frame.render_widget(
                Standings {
                    entries: &self.standings,
                    player: &self.services.player,
                },
                frame.area(),
            );
        }
    }

    /// Wait for input until the next tick is due, handle whatever arrived,
    /// and then run the tick if its time has come
    fn process_input(&mut self) -> io::Result<()> {
        let ready = match self.game.time_until_tick(Instant::now()) {
            Some(wait) => poll(wait)?,
            None => true,
        };
        if ready {
            let event = read()?;
            self.handle_event(&event, Instant::now());
        }
        self.tick(Instant::now());
        Ok(())
    }

    fn handle_event(&mut self, event: &Event, now: Instant) {
        if let Event::Resize(..) = event {
            self.services.notify(HostEvent::Expand);
        } else if let Some(cmd) = event
            .as_key_press_event()
            .and_then(Command::from_key_event)
        {
            self.handle_command(cmd, now);
        }
    }

    fn handle_command(&mut self, cmd: Command, now: Instant) {
        match (cmd, self.game.state()) {
            (Command::Quit | Command::Q, _) => self.quitting = true,
            (Command::N | Command::Enter, RunState::Idle) | (Command::R, RunState::GameOver) => {
                self.start_run(now);
            }
            (Command::Enter, RunState::GameOver) => self.game.acknowledge(),
            (cmd, RunState::Running) => {
                if let Some((dx, dy)) = cmd.delta() {
                    self.game.set_pending_direction(dx, dy);
                }
            }
            _ => (),
        }
    }

    fn start_run(&mut self, now: Instant) {
        self.standings.clear();
        if let Err(e) = self.game.start(now) {
            log_failure("Could not start a new run", e);
        }
    }

    /// Run a tick if one is due and, if it ended the run, report the result
    /// to the collaborators
    fn tick(&mut self, now: Instant) {
        let was_running = self.game.running();
        if let Err(e) = self.game.poll(now) {
            log_failure("Run aborted", e);
        }
        if was_running && self.game.state() == RunState::GameOver {
            self.standings = self
                .services
                .finish_run(self.game.score(), self.game.total_score());
        }
    }
}

/// Panel listing the leaderboard, drawn over the middle of the game screen
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Standings<'a> {
    entries: &'a [Entry],
    /// The entry with this name is highlighted
    player: &'a str,
}

impl Widget for Standings<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(self.entries.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let panel = center_rect(
            get_display_area(area),
            Size {
                width: consts::LEADERBOARD_PANEL_WIDTH,
                height,
            },
        );
        Clear.render(panel, buf);
        let block = Block::bordered().title(" Leaderboard ");
        let inner = block.inner(panel);
        block.render(panel, buf);
        for ((i, entry), row) in self.entries.iter().enumerate().zip(inner.rows()) {
            let text = format!(" {:>2}. {:<16.16} {:>8}", i + 1, entry.name, entry.score);
            if entry.name == self.player {
                Line::styled(text, consts::KEY_STYLE).render(row, buf);
            } else {
                Line::raw(text).render(row, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Grid;
    use crate::host::EventFile;
    use crate::leaderboard::LocalLeaderboard;
    use crate::persistence::{MemoryStore, TotalScoreFile};
    use crossterm::event::{KeyCode, KeyEvent};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::style::Style;
    use std::path::Path;
    use tempfile::tempdir;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn services(dir: &Path) -> Services {
        Services {
            player: String::from("tester"),
            store: Box::new(TotalScoreFile::new(dir.join("total.json"))),
            leaderboard: Some(Box::new(LocalLeaderboard::new(
                dir.join("leaderboard.json"),
            ))),
            host: Some(Box::new(EventFile::new(dir.join("events.jsonl")))),
        }
    }

    fn app(dir: &Path) -> App<ChaCha12Rng> {
        App::new(
            Game::new_with_rng(Grid::new(30, 20), 100, ChaCha12Rng::seed_from_u64(RNG_SEED)),
            services(dir),
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::from(code))
    }

    #[test]
    fn finish_run_reports_everywhere() {
        let tmpdir = tempdir().unwrap();
        let mut services = services(tmpdir.path());
        let standings = services.finish_run(40, 140);
        assert_eq!(
            standings,
            [Entry {
                name: String::from("tester"),
                score: 140
            }]
        );
        assert_eq!(services.store.load_total().unwrap(), 140);
        assert_eq!(
            fs_err::read_to_string(tmpdir.path().join("events.jsonl")).unwrap(),
            "{\"action\":\"gameOver\",\"score\":40,\"totalScore\":140}\n"
        );
    }

    #[test]
    fn failing_leaderboard_is_ignored() {
        let tmpdir = tempdir().unwrap();
        let mut services = services(tmpdir.path());
        // A directory where the leaderboard file should be cannot be read
        fs_err::create_dir(tmpdir.path().join("leaderboard.json")).unwrap();
        assert_eq!(services.finish_run(5, 5), []);
        assert_eq!(services.store.load_total().unwrap(), 5);
    }

    #[test]
    fn no_collaborators() {
        let mut services = Services {
            player: String::from("tester"),
            store: Box::new(MemoryStore::default()),
            leaderboard: None,
            host: None,
        };
        assert_eq!(services.finish_run(5, 10), []);
        services.notify(HostEvent::Ready);
        assert_eq!(services.store.load_total().unwrap(), 10);
    }

    #[test]
    fn greet_loads_standings() {
        let tmpdir = tempdir().unwrap();
        LocalLeaderboard::new(tmpdir.path().join("leaderboard.json"))
            .submit("alice", 2500)
            .unwrap();
        let mut app = app(tmpdir.path());
        app.greet();
        assert_eq!(
            app.standings,
            [Entry {
                name: String::from("alice"),
                score: 2500
            }]
        );
        assert_eq!(
            fs_err::read_to_string(tmpdir.path().join("events.jsonl")).unwrap(),
            "{\"action\":\"ready\"}\n"
        );
        app.handle_event(&key(KeyCode::Char('n')), Instant::now());
        assert_eq!(app.game.state(), RunState::Running);
        assert!(app.standings.is_empty(), "standings hidden during a run");
    }

    #[test]
    fn greet_without_leaderboard_file() {
        let tmpdir = tempdir().unwrap();
        let mut app = app(tmpdir.path());
        app.greet();
        assert!(app.standings.is_empty(), "no standings yet");
    }

    #[test]
    fn start_and_steer() {
        let tmpdir = tempdir().unwrap();
        let mut app = app(tmpdir.path());
        let t0 = Instant::now();
        app.handle_event(&key(KeyCode::Up), t0);
        assert_eq!(app.game.state(), RunState::Idle, "steering does not start");
        app.handle_event(&key(KeyCode::Char('r')), t0);
        assert_eq!(app.game.state(), RunState::Idle, "r only restarts after a run");
        app.handle_event(&key(KeyCode::Char('n')), t0);
        assert_eq!(app.game.state(), RunState::Running);
        app.handle_event(&key(KeyCode::Enter), t0);
        assert_eq!(app.game.state(), RunState::Running);
        app.handle_event(&key(KeyCode::Char('j')), t0);
        app.tick(t0);
        assert_eq!(app.game.time_until_tick(t0), Some(consts::INITIAL_INTERVAL));
        assert!(!app.quitting, "not quitting yet");
        app.handle_event(&key(KeyCode::Char('q')), t0);
        assert!(app.quitting, "q quits");
    }

    #[test]
    fn resize_notifies_host() {
        let tmpdir = tempdir().unwrap();
        let mut app = app(tmpdir.path());
        app.handle_event(&Event::Resize(100, 40), Instant::now());
        assert_eq!(
            fs_err::read_to_string(tmpdir.path().join("events.jsonl")).unwrap(),
            "{\"action\":\"expand\"}\n"
        );
        assert_eq!(app.game.state(), RunState::Idle);
    }

    #[test]
    fn render_standings() {
        let entries = [
            Entry {
                name: String::from("alice"),
                score: 2500,
            },
            Entry {
                name: String::from("tester"),
                score: 140,
            },
            Entry {
                name: String::from("bob"),
                score: 90,
            },
        ];
        let area = Rect::new(0, 0, 80, 25);
        let mut buffer = Buffer::empty(area);
        Standings {
            entries: &entries,
            player: "tester",
        }
        .render(area, &mut buffer);
        let mut expected = Buffer::empty(area);
        expected.set_string(24, 10, "┌ Leaderboard ─────────────────┐", Style::new());
        expected.set_string(24, 11, "│  1. alice                2500│", Style::new());
        expected.set_string(24, 12, "│  2. tester                140│", Style::new());
        expected.set_string(24, 13, "│  3. bob                    90│", Style::new());
        expected.set_string(24, 14, "└──────────────────────────────┘", Style::new());
        expected.set_style(Rect::new(25, 12, 30, 1), consts::KEY_STYLE);
        pretty_assertions::assert_eq!(buffer, expected);
    }
}
