use super::parse::{display_text, parse_cell_input, LabelOption};
use crate::domain::{CellValue, ColumnType};

#[derive(Debug, Clone, PartialEq)]
pub struct EditorColumn {
    pub name: String,
    pub column_type: ColumnType,
    pub label_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Tab,
    /// Shift+Tab
    BackTab,
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Backspace,
    Char(char),
}

/// 表格编辑器状态。rows 中每行的长度始终等于列数。
#[derive(Debug, Clone)]
pub struct GridEditor {
    columns: Vec<EditorColumn>,
    rows: Vec<Vec<CellValue>>,
    labels: Vec<LabelOption>,
    cursor: CellPos,
    buffer: Option<String>,
    error: Option<String>,
}

impl GridEditor {
    pub fn new(
        columns: Vec<EditorColumn>,
        mut rows: Vec<Vec<CellValue>>,
        labels: Vec<LabelOption>,
    ) -> Self {
        let width = columns.len();
        for row in rows.iter_mut() {
            row.resize(width, CellValue::Empty);
        }
        Self {
            columns,
            rows,
            labels,
            cursor: CellPos::default(),
            buffer: None,
            error: None,
        }
    }

    pub fn cursor(&self) -> CellPos {
        self.cursor
    }

    pub fn is_editing(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn buffer(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    pub fn value(&self, pos: CellPos) -> Option<&CellValue> {
        self.rows.get(pos.row).and_then(|r| r.get(pos.col))
    }

    pub fn text_at(&self, pos: CellPos) -> String {
        self.value(pos)
            .map(|v| display_text(v, &self.labels))
            .unwrap_or_default()
    }

    fn has_cells(&self) -> bool {
        !self.rows.is_empty() && !self.columns.is_empty()
    }

    /// 鼠标点击：先提交当前编辑，失败则停留
    pub fn select(&mut self, pos: CellPos) -> bool {
        if !self.commit() {
            return false;
        }
        if pos.row < self.rows.len() && pos.col < self.columns.len() {
            self.cursor = pos;
        }
        true
    }

    pub fn begin_edit(&mut self) {
        if self.has_cells() && self.buffer.is_none() {
            self.buffer = Some(self.text_at(self.cursor));
        }
    }

    /// 提交编辑缓冲区。解析失败时保持编辑状态并记录错误，返回 false。
    pub fn commit(&mut self) -> bool {
        let Some(text) = self.buffer.as_deref() else {
            return true;
        };
        let column = &self.columns[self.cursor.col];
        match parse_cell_input(
            text,
            column.column_type,
            column.label_type.as_deref(),
            &self.labels,
        ) {
            Ok(value) => {
                self.rows[self.cursor.row][self.cursor.col] = value;
                self.buffer = None;
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// 输入框失焦
    pub fn blur(&mut self) -> bool {
        self.commit()
    }

    pub fn handle_key(&mut self, key: EditorKey) {
        if !self.has_cells() {
            return;
        }
        match key {
            EditorKey::Tab => {
                if self.commit() {
                    self.step_forward();
                }
            }
            EditorKey::BackTab => {
                if self.commit() {
                    self.step_back();
                }
            }
            EditorKey::Enter => {
                if self.is_editing() {
                    if self.commit() && self.cursor.row + 1 < self.rows.len() {
                        self.cursor.row += 1;
                    }
                } else {
                    self.begin_edit();
                }
            }
            EditorKey::Escape => {
                self.commit();
            }
            EditorKey::Up | EditorKey::Down | EditorKey::Left | EditorKey::Right => {
                if !self.is_editing() {
                    self.move_cursor(key);
                }
            }
            EditorKey::Backspace => match self.buffer.as_mut() {
                Some(buf) => {
                    buf.pop();
                }
                None => self.buffer = Some(String::new()),
            },
            EditorKey::Char(c) => match self.buffer.as_mut() {
                Some(buf) => buf.push(c),
                // 直接打字覆盖原值
                None => self.buffer = Some(c.to_string()),
            },
        }
    }

    fn step_forward(&mut self) {
        let last_col = self.columns.len() - 1;
        if self.cursor.col < last_col {
            self.cursor.col += 1;
        } else if self.cursor.row + 1 < self.rows.len() {
            self.cursor = CellPos::new(self.cursor.row + 1, 0);
        }
    }

    fn step_back(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor = CellPos::new(self.cursor.row - 1, self.columns.len() - 1);
        }
    }

    fn move_cursor(&mut self, key: EditorKey) {
        let CellPos { row, col } = self.cursor;
        self.cursor = match key {
            EditorKey::Up => CellPos::new(row.saturating_sub(1), col),
            EditorKey::Down => CellPos::new((row + 1).min(self.rows.len() - 1), col),
            EditorKey::Left => CellPos::new(row, col.saturating_sub(1)),
            EditorKey::Right => CellPos::new(row, (col + 1).min(self.columns.len() - 1)),
            _ => self.cursor,
        };
    }

    pub fn add_row(&mut self) -> usize {
        self.rows.push(vec![CellValue::Empty; self.columns.len()]);
        self.rows.len() - 1
    }

    pub fn remove_row(&mut self, index: usize) -> Option<Vec<CellValue>> {
        if index >= self.rows.len() {
            return None;
        }
        if self.cursor.row == index {
            self.buffer = None;
            self.error = None;
        }
        let removed = self.rows.remove(index);
        // 上方的行被删掉时光标跟着原来那一行走
        if index < self.cursor.row {
            self.cursor.row -= 1;
        }
        if self.cursor.row >= self.rows.len() {
            self.cursor.row = self.rows.len().saturating_sub(1);
        }
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> GridEditor {
        let columns = vec![
            EditorColumn {
                name: "Size".into(),
                column_type: ColumnType::SizeLabel,
                label_type: Some("ALPHA".into()),
            },
            EditorColumn {
                name: "Chest".into(),
                column_type: ColumnType::Measurement,
                label_type: None,
            },
        ];
        let labels = vec![LabelOption {
            id: 7,
            key: "SIZE_MD".into(),
            display_value: "MD".into(),
            label_type: "ALPHA".into(),
        }];
        GridEditor::new(columns, vec![vec![], vec![]], labels)
    }

    fn type_text(ed: &mut GridEditor, text: &str) {
        for c in text.chars() {
            ed.handle_key(EditorKey::Char(c));
        }
    }

    #[test]
    fn tab_wraps_to_next_row_and_back() {
        let mut ed = editor();
        ed.handle_key(EditorKey::Tab);
        assert_eq!(ed.cursor(), CellPos::new(0, 1));
        ed.handle_key(EditorKey::Tab);
        assert_eq!(ed.cursor(), CellPos::new(1, 0));
        ed.handle_key(EditorKey::BackTab);
        assert_eq!(ed.cursor(), CellPos::new(0, 1));
    }

    #[test]
    fn typing_then_enter_commits_and_moves_down() {
        let mut ed = editor();
        type_text(&mut ed, "md");
        assert!(ed.is_editing());
        ed.handle_key(EditorKey::Enter);
        assert!(!ed.is_editing());
        assert_eq!(ed.value(CellPos::new(0, 0)), Some(&CellValue::Label(7)));
        assert_eq!(ed.cursor(), CellPos::new(1, 0));
    }

    #[test]
    fn invalid_measurement_keeps_editor_open() {
        let mut ed = editor();
        ed.select(CellPos::new(0, 1));
        type_text(&mut ed, "abc");
        ed.handle_key(EditorKey::Tab);
        assert!(ed.is_editing());
        assert!(ed.error().is_some());
        assert_eq!(ed.cursor(), CellPos::new(0, 1));

        for _ in 0..3 {
            ed.handle_key(EditorKey::Backspace);
        }
        type_text(&mut ed, "38-40");
        ed.handle_key(EditorKey::Escape);
        assert!(!ed.is_editing());
        assert_eq!(ed.error(), None);
        assert_eq!(ed.cursor(), CellPos::new(0, 1));
        assert_eq!(
            ed.value(CellPos::new(0, 1)),
            Some(&CellValue::Range { min: 38.0, max: 40.0 })
        );
    }

    #[test]
    fn arrows_only_move_outside_edit_mode() {
        let mut ed = editor();
        ed.handle_key(EditorKey::Down);
        assert_eq!(ed.cursor(), CellPos::new(1, 0));
        ed.handle_key(EditorKey::Down);
        assert_eq!(ed.cursor(), CellPos::new(1, 0));
        ed.handle_key(EditorKey::Enter);
        assert!(ed.is_editing());
        ed.handle_key(EditorKey::Up);
        assert_eq!(ed.cursor(), CellPos::new(1, 0));
        assert!(ed.blur());
    }

    #[test]
    fn unknown_label_text_falls_back_to_text() {
        let mut ed = editor();
        type_text(&mut ed, "Petite");
        assert!(ed.blur());
        assert_eq!(
            ed.value(CellPos::new(0, 0)),
            Some(&CellValue::Text("Petite".into()))
        );
    }

    #[test]
    fn rows_are_added_and_removed() {
        let mut ed = editor();
        let idx = ed.add_row();
        assert_eq!(idx, 2);
        ed.select(CellPos::new(2, 1));
        assert!(ed.remove_row(2).is_some());
        assert_eq!(ed.cursor(), CellPos::new(1, 1));
        assert_eq!(ed.into_rows().len(), 2);
    }

    #[test]
    fn pending_edit_follows_its_row_when_a_row_above_is_removed() {
        let columns = vec![EditorColumn {
            name: "Note".into(),
            column_type: ColumnType::Text,
            label_type: None,
        }];
        let rows = ["r0", "r1", "r2", "r3"]
            .iter()
            .map(|t| vec![CellValue::text(*t)])
            .collect();
        let mut ed = GridEditor::new(columns, rows, Vec::new());
        ed.select(CellPos::new(2, 0));
        type_text(&mut ed, "X");
        assert!(ed.remove_row(0).is_some());
        assert_eq!(ed.cursor(), CellPos::new(1, 0));
        assert!(ed.blur());
        let texts: Vec<CellValue> = ed.into_rows().into_iter().map(|mut r| r.remove(0)).collect();
        assert_eq!(
            texts,
            vec![CellValue::text("r1"), CellValue::text("X"), CellValue::text("r3")]
        );
    }
}
