//! 无界面的表格编辑器状态：光标、编辑缓冲区、键盘导航与提交。
//!
//! 管理端页面的单元格编辑逻辑集中在这里，前端只负责渲染。

pub mod grid;
pub mod parse;

pub use grid::{CellPos, EditorColumn, EditorKey, GridEditor};
pub use parse::{display_text, parse_cell_input, LabelOption};
