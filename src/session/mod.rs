//! Session state: range, filter texts and draw history, updated through a command queue.
//!
//! Changes are enqueued as [`Command`]s and applied together before candidates
//! are recomputed, so derived state never observes a half-applied update.

use std::collections::VecDeque;

use crate::candidates::{CandidateCache, FilterMode};
use crate::draw::{self, DrawError, RandomSource};

/// Initial values and tunables for a session.
#[derive(Clone, Debug)]
pub struct Settings {
    pub default_start: u64,
    pub default_end: u64,
    pub cache_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_start: 1,
            default_end: 10,
            cache_capacity: 32,
        }
    }
}

impl Settings {
    /// Check the default range the same way a `SetRange` command would.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.default_start < 1 || self.default_end < self.default_start {
            return Err(SessionError::InvalidRange {
                start: self.default_start,
                end: self.default_end,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid range {start}-{end}: start must be at least 1 and not above end")]
    InvalidRange { start: u64, end: u64 },
    #[error("filter mode is none; switch to include or exclude before entering a filter")]
    FilterInactive,
    #[error(transparent)]
    Draw(#[from] DrawError),
}

/// One state change requested by the front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SetRange { start: u64, end: u64 },
    /// Raises `end` to match when it would fall below the new start.
    SetStart(u64),
    SetEnd(u64),
    SetMode(FilterMode),
    /// Replaces the filter text of the current mode.
    SetFilter(String),
    /// Back to the configured default range.
    ClearRange,
    /// Clears the filter text of the current mode only.
    ClearFilter,
    ClearHistory,
}

#[derive(Clone, Debug)]
struct State {
    start: u64,
    end: u64,
    mode: FilterMode,
    include_raw: String,
    exclude_raw: String,
    history: Vec<u64>,
}

impl State {
    fn filter_text(&self) -> &str {
        match self.mode {
            FilterMode::None => "",
            FilterMode::IncludeOnly => &self.include_raw,
            FilterMode::Exclude => &self.exclude_raw,
        }
    }

    fn apply(&mut self, cmd: Command, settings: &Settings) -> Result<(), SessionError> {
        match cmd {
            Command::SetRange { start, end } => {
                if start < 1 || end < start {
                    return Err(SessionError::InvalidRange { start, end });
                }
                self.start = start;
                self.end = end;
            }
            Command::SetStart(start) => {
                if start < 1 {
                    return Err(SessionError::InvalidRange { start, end: self.end });
                }
                self.start = start;
                self.end = self.end.max(start);
            }
            Command::SetEnd(end) => {
                if end < self.start {
                    return Err(SessionError::InvalidRange { start: self.start, end });
                }
                self.end = end;
            }
            Command::SetMode(mode) => self.mode = mode,
            Command::SetFilter(text) => match self.mode {
                FilterMode::None => return Err(SessionError::FilterInactive),
                FilterMode::IncludeOnly => self.include_raw = text,
                FilterMode::Exclude => self.exclude_raw = text,
            },
            Command::ClearRange => {
                self.start = settings.default_start;
                self.end = settings.default_end;
            }
            Command::ClearFilter => match self.mode {
                FilterMode::None => {}
                FilterMode::IncludeOnly => self.include_raw.clear(),
                FilterMode::Exclude => self.exclude_raw.clear(),
            },
            Command::ClearHistory => self.history.clear(),
        }
        Ok(())
    }
}

/// Summary of a session, serialized for `--json` output.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawReport {
    pub start: u64,
    pub end: u64,
    pub mode: FilterMode,
    pub filter: String,
    pub candidate_count: usize,
    pub drawn: Vec<u64>,
    pub history: Vec<u64>,
}

/// Caller-owned session. The core functions it calls hold no state of their own.
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    state: State,
    pending: VecDeque<Command>,
    cache: CandidateCache,
}

impl Session {
    /// Invalid defaults are clamped so the session always starts from a usable range.
    pub fn new(settings: Settings) -> Self {
        let mut settings = settings;
        if let Err(e) = settings.validate() {
            settings.default_start = settings.default_start.max(1);
            settings.default_end = settings.default_end.max(settings.default_start);
            tracing::warn!(
                error = %e,
                start = settings.default_start,
                end = settings.default_end,
                "default range clamped"
            );
        }
        let state = State {
            start: settings.default_start,
            end: settings.default_end,
            mode: FilterMode::None,
            include_raw: String::new(),
            exclude_raw: String::new(),
            history: Vec::new(),
        };
        let cache = CandidateCache::new(settings.cache_capacity);
        Self {
            settings,
            state,
            pending: VecDeque::new(),
            cache,
        }
    }

    pub fn enqueue(&mut self, cmd: Command) {
        self.pending.push_back(cmd);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply every queued command in order. Either all of them take effect or,
    /// on the first error, none do and the queue is dropped.
    pub fn apply_pending(&mut self) -> Result<usize, SessionError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let mut next = self.state.clone();
        let mut applied = 0;
        while let Some(cmd) = self.pending.pop_front() {
            tracing::debug!(?cmd, "applying command");
            if let Err(e) = next.apply(cmd, &self.settings) {
                self.pending.clear();
                tracing::warn!(error = %e, "command batch rejected");
                return Err(e);
            }
            applied += 1;
        }
        self.state = next;
        Ok(applied)
    }

    /// Candidates for the currently applied state. Pending commands are not applied.
    pub fn candidates(&mut self) -> Vec<u64> {
        let State { start, end, mode, .. } = self.state;
        let filter = self.state.filter_text().to_string();
        self.cache.get_or_build(start, end, mode, &filter)
    }

    /// Apply pending commands, then recompute candidates.
    pub fn refresh(&mut self) -> Result<Vec<u64>, SessionError> {
        self.apply_pending()?;
        Ok(self.candidates())
    }

    /// Enqueue a single command and refresh.
    pub fn execute(&mut self, cmd: Command) -> Result<Vec<u64>, SessionError> {
        self.enqueue(cmd);
        self.refresh()
    }

    /// Draw one number and append it to history. On failure history is untouched.
    pub fn draw(&mut self, rng: &dyn RandomSource) -> Result<u64, SessionError> {
        let candidates = self.refresh()?;
        match draw::draw(&candidates, rng) {
            Ok(n) => {
                self.state.history.push(n);
                tracing::info!(value = n, candidates = candidates.len(), "drew number");
                Ok(n)
            }
            Err(e) => {
                tracing::warn!(
                    start = self.state.start,
                    end = self.state.end,
                    mode = %self.state.mode,
                    "draw with no candidates"
                );
                Err(e.into())
            }
        }
    }

    pub fn start(&self) -> u64 {
        self.state.start
    }

    pub fn end(&self) -> u64 {
        self.state.end
    }

    pub fn mode(&self) -> FilterMode {
        self.state.mode
    }

    /// Filter text of the current mode; empty in [`FilterMode::None`].
    pub fn filter_text(&self) -> &str {
        self.state.filter_text()
    }

    pub fn history(&self) -> &[u64] {
        &self.state.history
    }

    pub fn cache_stats(&self) -> (u64, u64) {
        self.cache.stats()
    }

    pub fn report(&mut self, drawn: Vec<u64>) -> DrawReport {
        let candidate_count = self.candidates().len();
        DrawReport {
            start: self.state.start,
            end: self.state.end,
            mode: self.state.mode,
            filter: self.state.filter_text().to_string(),
            candidate_count,
            drawn,
            history: self.state.history.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::SequenceSource;

    fn session() -> Session {
        Session::new(Settings::default())
    }

    #[test]
    fn test_defaults() {
        let mut s = session();
        assert_eq!((s.start(), s.end()), (1, 10));
        assert_eq!(s.mode(), FilterMode::None);
        assert_eq!(s.candidates(), (1..=10).collect::<Vec<_>>());
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_invalid_defaults_are_clamped() {
        let s = Session::new(Settings {
            default_start: 0,
            default_end: 0,
            cache_capacity: 0,
        });
        assert_eq!((s.start(), s.end()), (1, 1));
    }

    #[test]
    fn test_settings_validate() {
        assert_eq!(Settings::default().validate(), Ok(()));
        let reversed = Settings {
            default_start: 9,
            default_end: 2,
            cache_capacity: 0,
        };
        assert_eq!(reversed.validate(), Err(SessionError::InvalidRange { start: 9, end: 2 }));
        let zero = Settings {
            default_start: 0,
            default_end: 3,
            cache_capacity: 0,
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_pending_not_visible_until_applied() {
        let mut s = session();
        s.enqueue(Command::SetRange { start: 3, end: 4 });
        assert!(s.has_pending());
        assert_eq!(s.candidates().len(), 10);
        assert_eq!(s.apply_pending(), Ok(1));
        assert_eq!(s.candidates(), vec![3, 4]);
        assert!(!s.has_pending());
    }

    #[test]
    fn test_batch_is_atomic() {
        let mut s = session();
        s.enqueue(Command::SetMode(FilterMode::Exclude));
        s.enqueue(Command::SetRange { start: 9, end: 2 });
        let err = s.apply_pending().unwrap_err();
        assert_eq!(err, SessionError::InvalidRange { start: 9, end: 2 });
        assert_eq!(s.mode(), FilterMode::None);
        assert_eq!((s.start(), s.end()), (1, 10));
        assert!(!s.has_pending());
    }

    #[test]
    fn test_set_start_raises_end() {
        let mut s = session();
        s.execute(Command::SetStart(15)).unwrap();
        assert_eq!((s.start(), s.end()), (15, 15));
        assert_eq!(
            s.execute(Command::SetStart(0)),
            Err(SessionError::InvalidRange { start: 0, end: 15 })
        );
    }

    #[test]
    fn test_set_end_below_start_rejected() {
        let mut s = session();
        s.execute(Command::SetStart(5)).unwrap();
        assert!(s.execute(Command::SetEnd(4)).is_err());
        assert_eq!(s.end(), 10);
        assert_eq!(s.execute(Command::SetEnd(6)).unwrap(), vec![5, 6]);
    }

    #[test]
    fn test_filter_text_is_kept_per_mode() {
        let mut s = session();
        assert_eq!(s.execute(Command::SetFilter("3".into())), Err(SessionError::FilterInactive));

        s.execute(Command::SetMode(FilterMode::IncludeOnly)).unwrap();
        assert!(s.candidates().is_empty());
        assert_eq!(s.execute(Command::SetFilter("3,5,100".into())).unwrap(), vec![3, 5]);

        s.execute(Command::SetMode(FilterMode::Exclude)).unwrap();
        assert_eq!(s.filter_text(), "");
        assert_eq!(s.execute(Command::SetFilter("1-8".into())).unwrap(), vec![9, 10]);

        s.execute(Command::SetMode(FilterMode::IncludeOnly)).unwrap();
        assert_eq!(s.filter_text(), "3,5,100");
    }

    #[test]
    fn test_clear_filter_only_touches_current_mode() {
        let mut s = session();
        s.enqueue(Command::SetMode(FilterMode::IncludeOnly));
        s.enqueue(Command::SetFilter("2".into()));
        s.enqueue(Command::SetMode(FilterMode::Exclude));
        s.enqueue(Command::SetFilter("4".into()));
        s.enqueue(Command::ClearFilter);
        s.enqueue(Command::SetMode(FilterMode::IncludeOnly));
        assert_eq!(s.refresh().unwrap(), vec![2]);
    }

    #[test]
    fn test_clear_range_restores_defaults() {
        let mut s = Session::new(Settings {
            default_start: 5,
            default_end: 8,
            cache_capacity: 4,
        });
        s.execute(Command::SetRange { start: 100, end: 200 }).unwrap();
        assert_eq!(s.execute(Command::ClearRange).unwrap(), vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_draw_appends_history_in_order() {
        let mut s = session();
        let rng = SequenceSource::new(vec![4, 0, 9]);
        assert_eq!(s.draw(&rng), Ok(5));
        assert_eq!(s.draw(&rng), Ok(1));
        assert_eq!(s.draw(&rng), Ok(10));
        assert_eq!(s.history(), &[5, 1, 10]);
    }

    #[test]
    fn test_draw_single_candidate() {
        let mut s = session();
        s.execute(Command::SetRange { start: 5, end: 5 }).unwrap();
        assert_eq!(s.draw(&crate::draw::ThreadRngSource), Ok(5));
    }

    #[test]
    fn test_failed_draw_leaves_history() {
        let mut s = session();
        let rng = SequenceSource::new(vec![0]);
        s.draw(&rng).unwrap();
        s.execute(Command::SetMode(FilterMode::IncludeOnly)).unwrap();
        assert_eq!(s.draw(&rng), Err(SessionError::Draw(DrawError::NoCandidates)));
        assert_eq!(s.history(), &[1]);
    }

    #[test]
    fn test_draw_applies_pending_first() {
        let mut s = session();
        s.enqueue(Command::SetRange { start: 7, end: 7 });
        assert_eq!(s.draw(&SequenceSource::new(vec![0])), Ok(7));
    }

    #[test]
    fn test_clear_history() {
        let mut s = session();
        let rng = SequenceSource::new(vec![1]);
        s.draw(&rng).unwrap();
        s.draw(&rng).unwrap();
        s.execute(Command::ClearHistory).unwrap();
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_repeated_refresh_uses_cache() {
        let mut s = session();
        s.refresh().unwrap();
        s.refresh().unwrap();
        assert_eq!(s.cache_stats(), (1, 1));
    }

    #[test]
    fn test_report_serializes() {
        let mut s = session();
        s.execute(Command::SetMode(FilterMode::Exclude)).unwrap();
        s.execute(Command::SetFilter("1-9".into())).unwrap();
        let n = s.draw(&SequenceSource::new(vec![0])).unwrap();
        let json = serde_json::to_value(s.report(vec![n])).unwrap();
        assert_eq!(json["mode"], "exclude");
        assert_eq!(json["filter"], "1-9");
        assert_eq!(json["candidateCount"], 1);
        assert_eq!(json["drawn"], serde_json::json!([10]));
        assert_eq!(json["history"], serde_json::json!([10]));
    }
}
