use std::ops::{Deref, DerefMut};

use super::Notebook;
use crate::document::Tool;
use crate::transform::TransformStack;

/// Active tool override; the previous tool comes back on drop.
pub struct ToolScope<'a> {
    notebook: &'a mut Notebook,
    previous: Tool,
}

impl<'a> ToolScope<'a> {
    pub(super) fn new(notebook: &'a mut Notebook, tool: Tool) -> Self {
        let previous = notebook.tool;
        notebook.tool = tool;
        Self { notebook, previous }
    }
}

impl Deref for ToolScope<'_> {
    type Target = Notebook;

    fn deref(&self) -> &Notebook {
        self.notebook
    }
}

impl DerefMut for ToolScope<'_> {
    fn deref_mut(&mut self) -> &mut Notebook {
        self.notebook
    }
}

impl Drop for ToolScope<'_> {
    fn drop(&mut self) {
        self.notebook.tool = self.previous;
    }
}

/// Saved transform state; on drop the whole stack is put back as it was
/// before the scope opened, whatever was pushed or popped inside it.
pub struct TransformScope<'a> {
    notebook: &'a mut Notebook,
    entry: TransformStack,
}

impl<'a> TransformScope<'a> {
    pub(super) fn new(notebook: &'a mut Notebook) -> Self {
        let entry = notebook.transforms.clone();
        notebook.transforms.push();
        Self { notebook, entry }
    }
}

impl Deref for TransformScope<'_> {
    type Target = Notebook;

    fn deref(&self) -> &Notebook {
        self.notebook
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut Notebook {
        self.notebook
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.notebook.transforms = std::mem::take(&mut self.entry);
    }
}
