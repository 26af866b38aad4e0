//! Table structure - rows of cells holding nested block content
//!
//! Revision markup inside a cell behaves exactly as it does at the top
//! level; cells hold full blocks, so tables nest.

use crate::{Block, NodeId};
use serde::{Deserialize, Serialize};

/// A table in the document body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    id: NodeId,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(rows: Vec<TableRow>) -> Self {
        Self {
            id: NodeId::new(),
            rows,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// A table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    id: NodeId,
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            id: NodeId::new(),
            cells,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

/// A table cell holding nested blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    id: NodeId,
    pub blocks: Vec<Block>,
}

impl TableCell {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            id: NodeId::new(),
            blocks,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}
