//! View-state model: `App`, `View` and `Prompt`.
//!
//! Everything here is about what the terminal shows: which list is on
//! screen, which row is highlighted, the filter text and any modal prompt.
//! The navigator is the single owner of playback and navigation state; the
//! runtime translates between the two.

/// Which list the main pane shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Library,
    Favorites,
    /// Playlist names.
    Playlists,
    /// Songs of the playlist being browsed.
    PlaylistSongs,
}

/// What a playlist pick prompt does with the chosen name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PickAction {
    AddCurrent,
    RemoveCurrent,
}

/// A modal prompt layered over the main view. While one is open, all input
/// goes to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// Free-text input for a new playlist name.
    NewPlaylist { input: String },
    /// Pick one of the existing playlists.
    PickPlaylist {
        action: PickAction,
        names: Vec<String>,
        selected: usize,
    },
    /// y/n confirmation before deleting a playlist.
    ConfirmDelete { name: String },
}

/// The view-state model.
pub struct App {
    pub view: View,
    /// Row index into the current view's visible rows.
    pub selected: usize,
    pub filter_mode: bool,
    pub filter_query: String,
    pub prompt: Option<Prompt>,
    status: Option<String>,
    status_ticks: u8,
    pub should_quit: bool,
}

/// How many ~1 s ticks a status message stays on screen.
const STATUS_TICKS: u8 = 4;

impl Default for App {
    fn default() -> Self {
        Self {
            view: View::default(),
            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            prompt: None,
            status: None,
            status_ticks: 0,
            should_quit: false,
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- views and selection ---------------------------------------------

    /// Switch to `view`, resetting selection and any active filter.
    pub fn enter_view(&mut self, view: View) {
        self.view = view;
        self.selected = 0;
        self.clear_filter();
    }

    /// Move the highlight down one row, wrapping.
    pub fn move_down(&mut self, rows: usize) {
        if rows > 0 {
            self.selected = (self.selected + 1) % rows;
        }
    }

    /// Move the highlight up one row, wrapping.
    pub fn move_up(&mut self, rows: usize) {
        if rows > 0 {
            self.selected = (self.selected + rows - 1) % rows;
        }
    }

    /// Pull the highlight back in range after the row count changed
    /// (rescan, filter edit, playlist mutation).
    pub fn clamp_selection(&mut self, rows: usize) {
        if rows == 0 {
            self.selected = 0;
        } else if self.selected >= rows {
            self.selected = rows - 1;
        }
    }

    // ---- filtering -------------------------------------------------------

    /// Case-insensitive substring match against a display name. An empty
    /// or all-whitespace query matches everything.
    pub fn filter_matches(&self, display: &str) -> bool {
        let query = self.filter_query.trim();
        query.is_empty() || display.to_lowercase().contains(&query.to_lowercase())
    }

    /// Indices of `names` that pass the active filter, in order.
    pub fn visible_rows(&self, names: &[String]) -> Vec<usize> {
        (0..names.len())
            .filter(|&i| self.filter_matches(&names[i]))
            .collect()
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.selected = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.selected = 0;
    }

    // ---- prompts ---------------------------------------------------------

    pub fn open_new_playlist_prompt(&mut self) {
        self.prompt = Some(Prompt::NewPlaylist {
            input: String::new(),
        });
    }

    /// Open a pick list over `names`; a no-op when there is nothing to pick.
    pub fn open_pick_prompt(&mut self, action: PickAction, names: Vec<String>) {
        if names.is_empty() {
            self.set_status("no playlists yet");
            return;
        }
        self.prompt = Some(Prompt::PickPlaylist {
            action,
            names,
            selected: 0,
        });
    }

    pub fn open_delete_prompt(&mut self, name: String) {
        self.prompt = Some(Prompt::ConfirmDelete { name });
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn prompt_push_char(&mut self, c: char) {
        if let Some(Prompt::NewPlaylist { input }) = &mut self.prompt {
            input.push(c);
        }
    }

    pub fn prompt_pop_char(&mut self) {
        if let Some(Prompt::NewPlaylist { input }) = &mut self.prompt {
            input.pop();
        }
    }

    pub fn pick_next(&mut self) {
        if let Some(Prompt::PickPlaylist {
            names, selected, ..
        }) = &mut self.prompt
        {
            *selected = (*selected + 1) % names.len();
        }
    }

    pub fn pick_prev(&mut self) {
        if let Some(Prompt::PickPlaylist {
            names, selected, ..
        }) = &mut self.prompt
        {
            *selected = (*selected + names.len() - 1) % names.len();
        }
    }

    // ---- status line -----------------------------------------------------

    /// Show a transient one-line message; replaced by newer messages and
    /// expired after a few ticks.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
        self.status_ticks = STATUS_TICKS;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Advance the status clock by one tick.
    pub fn tick(&mut self) {
        if self.status_ticks > 0 {
            self.status_ticks -= 1;
            if self.status_ticks == 0 {
                self.status = None;
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
