use super::model::ParseError;
use super::value::{Document, List, Value};

/// Default bound on simultaneously open documents and lists.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Largest configurable `max_depth`; every nesting level recurses on the
/// calling thread's stack.
pub const MAX_DEPTH_CEILING: usize = 1024;

/// Stack-based builder for nested documents and lists.
///
/// Grammar rules drive it as they match: `{` opens a document, a field name
/// and a value are pushed as pending items, and a completed `name: value`
/// pair is stored with [`Accumulator::set_map_value`]. One accumulator is
/// created per parse call and dropped with it.
///
/// Popping an empty stack is a grammar defect and is reported as
/// [`ParseError::StackUnderflow`] instead of being papered over.
#[derive(Debug)]
pub struct Accumulator {
    documents: Vec<Document>,
    lists: Vec<List>,
    names: Vec<String>,
    values: Vec<Value>,
    max_depth: usize,
}

/// Stack heights captured before a grammar alternative is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    documents: usize,
    lists: usize,
    names: usize,
    values: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            documents: Vec::new(),
            lists: Vec::new(),
            names: Vec::new(),
            values: Vec::new(),
            max_depth,
        }
    }

    /// Number of currently open containers.
    pub fn depth(&self) -> usize {
        self.documents.len() + self.lists.len()
    }

    pub fn open_document(&mut self) -> Result<(), ParseError> {
        self.check_depth()?;
        self.documents.push(Document::new());
        Ok(())
    }

    /// Pop the innermost open document and push it as a pending value.
    pub fn close_document(&mut self) -> Result<(), ParseError> {
        let doc = self
            .documents
            .pop()
            .ok_or(ParseError::StackUnderflow { stack: "documents" })?;
        self.values.push(Value::Document(doc));
        Ok(())
    }

    /// Pop the innermost open document without turning it into a value.
    pub fn take_document(&mut self) -> Result<Document, ParseError> {
        self.documents
            .pop()
            .ok_or(ParseError::StackUnderflow { stack: "documents" })
    }

    pub fn open_list(&mut self) -> Result<(), ParseError> {
        self.check_depth()?;
        self.lists.push(List::new());
        Ok(())
    }

    pub fn close_list(&mut self) -> Result<(), ParseError> {
        let list = self
            .lists
            .pop()
            .ok_or(ParseError::StackUnderflow { stack: "lists" })?;
        self.values.push(Value::List(list));
        Ok(())
    }

    pub fn push_field_name(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    pub fn push_value(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Pop one field name and one value into the innermost open document.
    pub fn set_map_value(&mut self) -> Result<(), ParseError> {
        if self.names.is_empty() {
            return Err(ParseError::StackUnderflow { stack: "field names" });
        }
        if self.values.is_empty() {
            return Err(ParseError::StackUnderflow { stack: "values" });
        }
        let doc = self
            .documents
            .last_mut()
            .ok_or(ParseError::StackUnderflow { stack: "documents" })?;

        if let (Some(name), Some(value)) = (self.names.pop(), self.values.pop()) {
            doc.insert(name, value);
        }
        Ok(())
    }

    /// Pop one value onto the end of the innermost open list.
    pub fn set_list_value(&mut self) -> Result<(), ParseError> {
        if self.values.is_empty() {
            return Err(ParseError::StackUnderflow { stack: "values" });
        }
        let list = self
            .lists
            .last_mut()
            .ok_or(ParseError::StackUnderflow { stack: "lists" })?;

        if let Some(value) = self.values.pop() {
            list.push(value);
        }
        Ok(())
    }

    /// Store a field directly in the innermost open document, bypassing the
    /// pending stacks. Used for the fixed log-line fields.
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), ParseError> {
        let doc = self
            .documents
            .last_mut()
            .ok_or(ParseError::StackUnderflow { stack: "documents" })?;
        doc.insert(name, value);
        Ok(())
    }

    /// Take the single finished value of a document-style parse.
    pub fn finish_value(&mut self) -> Result<Value, ParseError> {
        self.values.pop().ok_or(ParseError::IncompleteValue)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            documents: self.documents.len(),
            lists: self.lists.len(),
            names: self.names.len(),
            values: self.values.len(),
        }
    }

    /// Drop everything pushed since `checkpoint`.
    ///
    /// Containers that were already open at the checkpoint are not rolled
    /// back, so rules only write into them once they can no longer fail.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.documents.truncate(checkpoint.documents);
        self.lists.truncate(checkpoint.lists);
        self.names.truncate(checkpoint.names);
        self.values.truncate(checkpoint.values);
    }

    fn check_depth(&self) -> Result<(), ParseError> {
        let depth = self.depth() + 1;
        if depth > self.max_depth {
            return Err(ParseError::TooDeep { depth, max: self.max_depth });
        }
        Ok(())
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}
