use ratatui::layout::Rect;

/// Multi-line text editor state for form fields and the scratchpad.
/// Cursor positions are character indices, not byte indices.
#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize, // Vertical scroll (line offset)
    pub scroll_col: usize,    // Horizontal scroll (column offset)
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll_offset: 0,
            scroll_col: 0,
        }
    }

    pub fn from_string(content: String) -> Self {
        let lines: Vec<String> = if content.is_empty() {
            vec![String::new()]
        } else {
            content.lines().map(|l| l.to_string()).collect()
        };
        let cursor_line = lines.len().saturating_sub(1);
        let cursor_col = lines.last().map(|l| l.chars().count()).unwrap_or(0);
        Self {
            lines,
            cursor_line,
            cursor_col,
            scroll_offset: 0,
            scroll_col: 0,
        }
    }

    pub fn to_string(&self) -> String {
        self.lines.join("\n")
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    /// Byte offset for the cursor's character position within the line
    fn byte_index(line: &str, char_col: usize) -> usize {
        line.char_indices()
            .nth(char_col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, ch: char) {
        if self.cursor_line >= self.lines.len() {
            self.lines.push(String::new());
            self.cursor_line = self.lines.len() - 1;
        }
        let line = &mut self.lines[self.cursor_line];
        let idx = Self::byte_index(line, self.cursor_col);
        line.insert(idx, ch);
        self.cursor_col += 1;
    }

    pub fn insert_newline(&mut self) {
        if self.cursor_line >= self.lines.len() {
            self.lines.push(String::new());
            self.cursor_line = self.lines.len() - 1;
            self.cursor_col = 0;
            return;
        }
        let line = &mut self.lines[self.cursor_line];
        let idx = Self::byte_index(line, self.cursor_col);
        let rest = line.split_off(idx);
        self.lines.insert(self.cursor_line + 1, rest);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    /// Backspace: delete the character before the cursor, joining lines
    /// when at the start of a line
    pub fn delete_char(&mut self) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_line];
            let idx = Self::byte_index(line, self.cursor_col - 1);
            line.remove(idx);
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            let removed = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.lines[self.cursor_line].chars().count();
            self.lines[self.cursor_line].push_str(&removed);
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.cursor_col.min(self.current_line_len());
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = self.cursor_col.min(self.current_line_len());
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.current_line_len();
    }

    /// Keep the cursor line inside the vertical viewport
    pub fn update_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor_line + 1 - viewport_height;
        }
    }

    /// Keep the cursor column inside the horizontal viewport
    pub fn update_horizontal_scroll(&mut self, viewport_width: usize) {
        if viewport_width == 0 {
            return;
        }
        if self.cursor_col < self.scroll_col {
            self.scroll_col = self.cursor_col;
        } else if self.cursor_col >= self.scroll_col + viewport_width {
            self.scroll_col = self.cursor_col + 1 - viewport_width;
        }
    }

    /// Lines currently visible, clipped to the scroll window
    pub fn visible_lines(&self, viewport_height: usize, viewport_width: usize) -> Vec<String> {
        self.lines
            .iter()
            .skip(self.scroll_offset)
            .take(viewport_height)
            .map(|line| {
                line.chars()
                    .skip(self.scroll_col)
                    .take(viewport_width)
                    .collect()
            })
            .collect()
    }

    /// Screen coordinates for the cursor inside a bordered area, or None
    /// if the cursor has scrolled out of view
    pub fn cursor_screen_pos(&self, area: Rect, viewport_height: usize) -> Option<(u16, u16)> {
        if self.cursor_line < self.scroll_offset
            || self.cursor_line >= self.scroll_offset + viewport_height
        {
            return None;
        }
        let row = (self.cursor_line - self.scroll_offset) as u16;
        let col = self.cursor_col.saturating_sub(self.scroll_col) as u16;
        Some((area.x + 1 + col, area.y + 1 + row))
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_round_trip() {
        let mut editor = Editor::new();
        for ch in "hello".chars() {
            editor.insert_char(ch);
        }
        editor.insert_newline();
        for ch in "world".chars() {
            editor.insert_char(ch);
        }
        assert_eq!(editor.to_string(), "hello\nworld");
        assert_eq!(editor.cursor_line, 1);
        assert_eq!(editor.cursor_col, 5);
    }

    #[test]
    fn backspace_joins_lines() {
        let mut editor = Editor::from_string("ab\ncd".to_string());
        editor.cursor_line = 1;
        editor.cursor_col = 0;
        editor.delete_char();
        assert_eq!(editor.to_string(), "abcd");
        assert_eq!(editor.cursor_line, 0);
        assert_eq!(editor.cursor_col, 2);
    }

    #[test]
    fn multibyte_characters_use_char_columns() {
        let mut editor = Editor::from_string("héllo".to_string());
        editor.cursor_col = 2;
        editor.delete_char();
        assert_eq!(editor.to_string(), "hllo");
    }

    #[test]
    fn cursor_clamps_when_moving_between_lines() {
        let mut editor = Editor::from_string("long line\nab".to_string());
        editor.cursor_line = 0;
        editor.cursor_col = 9;
        editor.move_cursor_down();
        assert_eq!(editor.cursor_line, 1);
        assert_eq!(editor.cursor_col, 2);
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut editor = Editor::from_string("a\nb\nc\nd\ne".to_string());
        editor.cursor_line = 4;
        editor.update_scroll(3);
        assert_eq!(editor.scroll_offset, 2);
        editor.cursor_line = 0;
        editor.update_scroll(3);
        assert_eq!(editor.scroll_offset, 0);
    }
}
