//! Argument vectors for dstask invocations

use super::item::ItemId;
use std::fmt;

/// The dstask sub-commands the grocery list uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstaskVerb {
    /// Query next actionable items
    Next,
    /// Create a task
    Add,
    /// Resolve a task
    Done,
    /// Delete a task
    Remove,
    /// Query resolved tasks
    ShowResolved,
}

impl DstaskVerb {
    /// The verb as dstask expects it on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Add => "add",
            Self::Done => "done",
            Self::Remove => "remove",
            Self::ShowResolved => "show-resolved",
        }
    }
}

impl fmt::Display for DstaskVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dstask verb plus its arguments, independent of how dstask is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DstaskCommand {
    verb: DstaskVerb,
    args: Vec<String>,
}

impl DstaskCommand {
    fn new(verb: DstaskVerb, args: Vec<String>) -> Self {
        Self { verb, args }
    }

    /// `next <marker>`
    pub fn next(marker_tag: &str) -> Self {
        Self::new(DstaskVerb::Next, vec![marker_tag.to_string()])
    }

    /// `add <description> <marker>`
    pub fn add(description: &str, marker_tag: &str) -> Self {
        Self::new(
            DstaskVerb::Add,
            vec![description.to_string(), marker_tag.to_string()],
        )
    }

    /// `done <id>`
    pub fn done(id: &ItemId) -> Self {
        Self::new(DstaskVerb::Done, vec![id.to_string()])
    }

    /// `remove <id>`
    pub fn remove(id: &ItemId) -> Self {
        Self::new(DstaskVerb::Remove, vec![id.to_string()])
    }

    /// `show-resolved <marker>`
    pub fn show_resolved(marker_tag: &str) -> Self {
        Self::new(DstaskVerb::ShowResolved, vec![marker_tag.to_string()])
    }

    /// The verb this command runs
    pub fn verb(&self) -> DstaskVerb {
        self.verb
    }

    /// The verb followed by its arguments
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.verb.as_str().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}
