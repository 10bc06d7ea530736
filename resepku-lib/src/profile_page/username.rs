/// Whether the username is being displayed or edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Viewing,
    Editing,
}

/// The username edit box: its state and the text typed into it.
#[derive(Debug, Clone, Default)]
pub struct UsernameEditor {
    state: EditState,
    buffer: String,
}

impl UsernameEditor {
    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == EditState::Editing
    }

    /// Text currently in the edit box
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer with the committed username without touching the state.
    pub(crate) fn sync(&mut self, committed: &str) {
        self.buffer = committed.to_string();
    }

    pub(crate) fn begin(&mut self, committed: &str) {
        self.sync(committed);
        self.state = EditState::Editing;
    }

    pub(crate) fn input(&mut self, text: String) {
        self.buffer = text;
    }

    /// Whether the buffer holds anything besides whitespace
    pub(crate) fn has_content(&self) -> bool {
        !self.buffer.trim().is_empty()
    }

    pub(crate) fn finish(&mut self) {
        self.state = EditState::Viewing;
    }

    pub(crate) fn cancel(&mut self, committed: &str) {
        self.sync(committed);
        self.finish();
    }
}
