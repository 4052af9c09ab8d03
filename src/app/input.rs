use zeroize::Zeroize;

/// Single-line editable text with a character cursor.
#[derive(Default, Clone)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
    masked: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer whose contents are hidden on screen and wiped on drop.
    pub fn masked() -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            masked: true,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn display(&self, mask_char: char) -> String {
        if self.masked {
            std::iter::repeat_n(mask_char, self.len()).collect()
        } else {
            self.content.clone()
        }
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Removes the character before the cursor. Returns false at the start.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.remove_at_cursor();
        true
    }

    /// Removes the character under the cursor. Returns false at the end.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.remove_at_cursor();
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.content.zeroize();
        self.cursor = 0;
    }

    /// Replaces the contents and puts the cursor at the end.
    pub fn set(&mut self, value: &str) {
        self.content.zeroize();
        self.content.push_str(value);
        self.cursor = self.len();
    }

    fn remove_at_cursor(&mut self) {
        let start = self.byte_index(self.cursor);
        let end = self.byte_index(self.cursor + 1);
        self.content.drain(start..end);
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }
}

impl Drop for InputBuffer {
    fn drop(&mut self) {
        if self.masked {
            self.content.zeroize();
        }
    }
}
