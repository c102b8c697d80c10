//! 编辑器撤销/重做：保存整份状态快照

use crate::models::{EditorAction, EditorState, Effect};
use crate::service::editor::reduce;

/// 默认历史深度
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// 带撤销栈的编辑器会话
#[derive(Debug, Clone)]
pub struct EditorHistory {
    present: EditorState,
    undo_stack: Vec<EditorState>,
    redo_stack: Vec<EditorState>,
    max_depth: usize,
}

impl EditorHistory {
    pub fn new(initial: EditorState, max_depth: usize) -> Self {
        Self {
            present: initial,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.present
    }

    /// 执行动作；仅当状态确实变化时记录历史
    pub fn dispatch(&mut self, action: EditorAction) -> Vec<Effect> {
        let transition = reduce(&self.present, action);
        if transition.state != self.present {
            let previous = std::mem::replace(&mut self.present, transition.state);
            self.undo_stack.push(previous);
            if self.undo_stack.len() > self.max_depth {
                self.undo_stack.remove(0);
            }
            self.redo_stack.clear();
        }
        transition.effects
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.present, previous);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.present, next);
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
