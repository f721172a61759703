//! Grocery list operations
//!
//! [`GroceryList`] is the single operation interface every caller adapter
//! consumes. It owns the resolved [`ToolLauncher`] and a [`CommandRunner`],
//! composes dstask commands scoped to the marker tag, and shapes the results.

use crate::config::Config;
use crate::dstask::{
    parse_output, CommandRunner, DstaskCommand, GroceryItem, ItemId, ProcessRunner, ToolLauncher,
};
use crate::{GroceryError, Result};
use std::fmt;
use std::sync::Arc;

/// The grocery list, backed by dstask
#[derive(Clone)]
pub struct GroceryList {
    config: Config,
    launcher: ToolLauncher,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for GroceryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroceryList")
            .field("config", &self.config)
            .field("launcher", &self.launcher)
            .finish_non_exhaustive()
    }
}

impl GroceryList {
    /// Create a grocery list that runs dstask as a real subprocess
    ///
    /// The version manager is probed here, once, and the result is kept for
    /// the lifetime of the list.
    pub fn new(config: Config) -> Self {
        let launcher = ToolLauncher::resolve(&config);
        Self::with_runner(config, launcher, Arc::new(ProcessRunner::new()))
    }

    /// Create a grocery list with an explicit launcher and runner
    pub fn with_runner(
        config: Config,
        launcher: ToolLauncher,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            launcher,
            runner,
        }
    }

    /// The configuration this list was built from
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The resolved launcher
    pub fn launcher(&self) -> &ToolLauncher {
        &self.launcher
    }

    fn run(&self, command: &DstaskCommand) -> Result<String> {
        let invocation = self.launcher.invocation(command);
        self.runner.run(&invocation)
    }

    fn query(&self, command: &DstaskCommand) -> Result<Vec<GroceryItem>> {
        let output = self.run(command)?;
        let items = parse_output(&output, self.config.output_format);
        tracing::debug!("dstask {} returned {} item(s)", command.verb(), items.len());
        Ok(items)
    }

    /// Pending items carrying the marker tag
    pub fn list_pending(&self) -> Result<Vec<GroceryItem>> {
        self.query(&DstaskCommand::next(&self.config.marker_tag))
    }

    /// Resolved (bought) items carrying the marker tag
    pub fn list_resolved(&self) -> Result<Vec<GroceryItem>> {
        self.query(&DstaskCommand::show_resolved(&self.config.marker_tag))
    }

    /// Add an item; the description is passed to dstask as one argument
    pub fn add_item(&self, description: &str) -> Result<String> {
        if description.trim().is_empty() {
            return Err(GroceryError::missing_field("item", "add"));
        }

        self.run(&DstaskCommand::add(description, &self.config.marker_tag))?;
        Ok(format!("Added \"{description}\" to grocery list"))
    }

    /// Mark an item as bought
    pub fn mark_done(&self, id: &ItemId) -> Result<String> {
        if id.is_blank() {
            return Err(GroceryError::missing_field("id", "done"));
        }

        self.run(&DstaskCommand::done(id))?;
        Ok(format!("Marked item {id} as bought"))
    }

    /// Delete an item
    pub fn remove_item(&self, id: &ItemId) -> Result<String> {
        if id.is_blank() {
            return Err(GroceryError::missing_field("id", "remove"));
        }

        self.run(&DstaskCommand::remove(id))?;
        Ok(format!("Removed item {id} from grocery list"))
    }

    /// Remove every resolved item, one at a time, in the order dstask reports them
    ///
    /// Stops at the first failed removal. When earlier removals succeeded the
    /// failure is wrapped in [`GroceryError::PartialClear`].
    pub fn clear_resolved(&self) -> Result<String> {
        let resolved = self.list_resolved()?;
        if resolved.is_empty() {
            return Ok("No bought items to clear".to_string());
        }

        let total = resolved.len();
        for (cleared, item) in resolved.iter().enumerate() {
            if let Err(e) = self.run(&DstaskCommand::remove(&item.id)) {
                tracing::error!("Failed to remove bought item {}: {}", item.id, e);
                if cleared == 0 {
                    return Err(e);
                }
                return Err(GroceryError::PartialClear {
                    cleared,
                    total,
                    source: Box::new(e),
                });
            }
        }

        Ok(format!("Cleared {total} bought item(s)"))
    }

    /// Run a typed request
    pub fn execute(&self, action: &GroceryAction) -> Result<GroceryOutcome> {
        tracing::debug!("Executing grocery action {}", action.name());
        match action {
            GroceryAction::List => self.list_pending().map(GroceryOutcome::Items),
            GroceryAction::Add { item } => self.add_item(item).map(GroceryOutcome::Message),
            GroceryAction::Done { id } => self.mark_done(id).map(GroceryOutcome::Message),
            GroceryAction::Remove { id } => self.remove_item(id).map(GroceryOutcome::Message),
            GroceryAction::Clear => self.clear_resolved().map(GroceryOutcome::Message),
        }
    }

    /// Run a typed request on the blocking thread pool
    pub async fn execute_blocking(
        self: Arc<Self>,
        action: GroceryAction,
    ) -> Result<GroceryOutcome> {
        tokio::task::spawn_blocking(move || self.execute(&action)).await?
    }
}

/// A typed grocery request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroceryAction {
    /// Show pending items
    List,
    /// Add a new item
    Add {
        /// Item description
        item: String,
    },
    /// Mark an item as bought
    Done {
        /// Item to resolve
        id: ItemId,
    },
    /// Delete an item
    Remove {
        /// Item to delete
        id: ItemId,
    },
    /// Remove every bought item
    Clear,
}

impl GroceryAction {
    /// All action names, in the order they are documented
    pub const NAMES: [&'static str; 5] = ["list", "add", "done", "remove", "clear"];

    /// Decode a loosely typed request
    ///
    /// `item` and `id` are only consulted by the actions that need them;
    /// empty or whitespace-only values count as missing.
    pub fn from_request(action: &str, item: Option<&str>, id: Option<&str>) -> Result<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        match action {
            "list" => Ok(Self::List),
            "add" => present(item)
                .map(|item| Self::Add {
                    item: item.to_string(),
                })
                .ok_or_else(|| GroceryError::missing_field("item", action)),
            "done" => present(id)
                .map(|id| Self::Done { id: id.into() })
                .ok_or_else(|| GroceryError::missing_field("id", action)),
            "remove" => present(id)
                .map(|id| Self::Remove { id: id.into() })
                .ok_or_else(|| GroceryError::missing_field("id", action)),
            "clear" => Ok(Self::Clear),
            other => Err(GroceryError::UnknownAction(other.to_string())),
        }
    }

    /// The action's wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add { .. } => "add",
            Self::Done { .. } => "done",
            Self::Remove { .. } => "remove",
            Self::Clear => "clear",
        }
    }
}

/// The result of a grocery request
#[derive(Debug, Clone, PartialEq)]
pub enum GroceryOutcome {
    /// Items returned by a listing
    Items(Vec<GroceryItem>),
    /// Confirmation text returned by a mutation
    Message(String),
}

impl GroceryOutcome {
    /// Render the outcome as plain text
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Items(items) => format_plain_list(items),
            Self::Message(message) => message.clone(),
        }
    }
}

/// `Grocery list is empty`, or a `Grocery list:` header and one line per item
pub fn format_plain_list(items: &[GroceryItem]) -> String {
    if items.is_empty() {
        return "Grocery list is empty".to_string();
    }

    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("{}. {}", item.id, item.summary))
        .collect();
    format!("Grocery list:\n{}", lines.join("\n"))
}

/// `<id>. [<priority>] <summary>`, with the priority only when not the default
pub fn format_item_line(item: &GroceryItem, default_priority: &str) -> String {
    format!("{}. {}", item.id, item.label(default_priority))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dstask::DstaskVerb;
    use crate::test_utils::{test_list, MockRunner};

    const RESOLVED_THREE: &str = r#"[
  {"id": 7, "summary": "milk", "status": "resolved", "tags": ["grocery"]},
  {"id": 8, "summary": "eggs", "status": "resolved", "tags": ["grocery"]},
  {"id": 9, "summary": "bread", "status": "resolved", "tags": ["grocery"]}
]"#;

    #[test]
    fn test_list_pending_queries_with_marker_tag() {
        let runner = Arc::new(MockRunner::new().respond(
            DstaskVerb::Next,
            "3 pending milk +grocery\n4 pending eggs +grocery +dairy",
        ));
        let list = test_list(runner.clone());

        let items = list.list_pending().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].summary, "milk");
        assert!(items.iter().all(|item| item.has_tag(&list.config().marker_tag)));
        assert_eq!(runner.calls(), vec![vec!["next", "+grocery"]]);
    }

    #[test]
    fn test_structured_listing_is_queried_with_marker_tag() {
        let runner = Arc::new(MockRunner::new().respond(DstaskVerb::Next, RESOLVED_THREE));
        let list = test_list(runner.clone());

        let items = list.list_pending().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|item| item.has_tag("+grocery")));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].contains(&"+grocery".to_string()));
    }

    #[test]
    fn test_list_pending_empty_output() {
        let runner = Arc::new(MockRunner::new());
        let items = test_list(runner).list_pending().unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_list_pending_propagates_tool_failure() {
        let runner = Arc::new(MockRunner::new().fail(DstaskVerb::Next, "dstask: not a repo"));
        let err = test_list(runner).list_pending().unwrap_err();
        assert!(err.is_external_tool());
    }

    #[test]
    fn test_add_item_message_and_argv() {
        let runner = Arc::new(MockRunner::new());
        let list = test_list(runner.clone());

        let message = list.add_item("oat milk").unwrap();
        assert_eq!(message, "Added \"oat milk\" to grocery list");
        assert_eq!(runner.calls(), vec![vec!["add", "oat milk", "+grocery"]]);
    }

    #[test]
    fn test_add_item_failure_is_external_tool_error() {
        let runner = Arc::new(MockRunner::new().fail(DstaskVerb::Add, "repository locked"));
        let err = test_list(runner).add_item("bread").unwrap_err();

        assert!(err.is_external_tool());
        assert_eq!(err.to_string(), "dstask command failed: repository locked");
    }

    #[test]
    fn test_add_blank_item_never_runs_the_tool() {
        let runner = Arc::new(MockRunner::new());
        let list = test_list(runner.clone());

        let err = list.add_item("   ").unwrap_err();
        assert!(matches!(err, GroceryError::Validation { .. }));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_mark_done_and_remove_messages() {
        let runner = Arc::new(MockRunner::new());
        let list = test_list(runner.clone());

        assert_eq!(
            list.mark_done(&ItemId::from("3")).unwrap(),
            "Marked item 3 as bought"
        );
        assert_eq!(
            list.remove_item(&ItemId::from("4")).unwrap(),
            "Removed item 4 from grocery list"
        );
        assert_eq!(
            runner.calls(),
            vec![vec!["done", "3"], vec!["remove", "4"]]
        );
    }

    #[test]
    fn test_mark_done_failure_is_external_tool_error() {
        let runner = Arc::new(MockRunner::new().fail(DstaskVerb::Done, "no task with id 99"));
        let err = test_list(runner)
            .mark_done(&ItemId::from("99"))
            .unwrap_err();
        assert_eq!(err.to_string(), "dstask command failed: no task with id 99");
    }

    #[test]
    fn test_clear_with_nothing_resolved() {
        let runner = Arc::new(MockRunner::new().respond(DstaskVerb::ShowResolved, "[]"));
        let list = test_list(runner.clone());

        assert_eq!(list.clear_resolved().unwrap(), "No bought items to clear");
        assert_eq!(runner.calls(), vec![vec!["show-resolved", "+grocery"]]);
    }

    #[test]
    fn test_clear_query_failure_removes_nothing() {
        let runner = Arc::new(MockRunner::new().fail(DstaskVerb::ShowResolved, "corrupt state"));
        let list = test_list(runner.clone());

        let err = list.clear_resolved().unwrap_err();
        assert!(err.is_external_tool());
        assert_eq!(runner.calls(), vec![vec!["show-resolved", "+grocery"]]);
        assert!(runner.calls().iter().all(|call| call[0] != "remove"));
    }

    #[test]
    fn test_clear_removes_each_resolved_item_in_order() {
        let runner = Arc::new(MockRunner::new().respond(DstaskVerb::ShowResolved, RESOLVED_THREE));
        let list = test_list(runner.clone());

        assert_eq!(list.clear_resolved().unwrap(), "Cleared 3 bought item(s)");
        assert_eq!(
            runner.calls(),
            vec![
                vec!["show-resolved", "+grocery"],
                vec!["remove", "7"],
                vec!["remove", "8"],
                vec!["remove", "9"],
            ]
        );
    }

    #[test]
    fn test_clear_stops_at_first_failure_with_partial_count() {
        let runner = Arc::new(
            MockRunner::new()
                .respond(DstaskVerb::ShowResolved, RESOLVED_THREE)
                .respond(DstaskVerb::Remove, "")
                .fail(DstaskVerb::Remove, "repository locked"),
        );
        let list = test_list(runner.clone());

        let err = list.clear_resolved().unwrap_err();
        assert!(err.is_external_tool());
        match err {
            GroceryError::PartialClear { cleared, total, .. } => {
                assert_eq!(cleared, 1);
                assert_eq!(total, 3);
            }
            other => panic!("expected partial clear, got {other:?}"),
        }
        // The third item is never attempted
        assert_eq!(runner.calls().len(), 3);
    }

    #[test]
    fn test_clear_first_removal_failure_propagates_unchanged() {
        let runner = Arc::new(
            MockRunner::new()
                .respond(DstaskVerb::ShowResolved, RESOLVED_THREE)
                .fail(DstaskVerb::Remove, "repository locked"),
        );
        let err = test_list(runner).clear_resolved().unwrap_err();
        assert!(matches!(err, GroceryError::ExternalTool { .. }));
    }

    #[test]
    fn test_from_request_decodes_actions() {
        assert_eq!(
            GroceryAction::from_request("list", None, None).unwrap(),
            GroceryAction::List
        );
        assert_eq!(
            GroceryAction::from_request("add", Some("milk"), None).unwrap(),
            GroceryAction::Add {
                item: "milk".to_string()
            }
        );
        assert_eq!(
            GroceryAction::from_request("remove", None, Some("5")).unwrap(),
            GroceryAction::Remove {
                id: ItemId::from("5")
            }
        );
        assert_eq!(
            GroceryAction::from_request("clear", Some("ignored"), Some("ignored")).unwrap(),
            GroceryAction::Clear
        );
    }

    #[test]
    fn test_from_request_validation_messages() {
        assert_eq!(
            GroceryAction::from_request("add", None, None)
                .unwrap_err()
                .to_string(),
            "Item description is required for 'add' action"
        );
        assert_eq!(
            GroceryAction::from_request("add", Some(""), None)
                .unwrap_err()
                .to_string(),
            "Item description is required for 'add' action"
        );
        assert_eq!(
            GroceryAction::from_request("done", None, None)
                .unwrap_err()
                .to_string(),
            "Item ID is required for 'done' action"
        );
        assert_eq!(
            GroceryAction::from_request("buy", None, None)
                .unwrap_err()
                .to_string(),
            "Unknown action: buy"
        );
    }

    #[test]
    fn test_execute_dispatches_to_operations() {
        let runner =
            Arc::new(MockRunner::new().respond(DstaskVerb::Next, "3 pending milk +grocery"));
        let list = test_list(runner.clone());

        let outcome = list.execute(&GroceryAction::List).unwrap();
        assert_eq!(outcome.to_plain_text(), "Grocery list:\n3. milk");

        let outcome = list
            .execute(&GroceryAction::Done {
                id: ItemId::from("3"),
            })
            .unwrap();
        assert_eq!(
            outcome,
            GroceryOutcome::Message("Marked item 3 as bought".to_string())
        );
    }

    #[test]
    fn test_format_plain_list() {
        assert_eq!(format_plain_list(&[]), "Grocery list is empty");

        let items = vec![
            GroceryItem::new("3", "pending", "milk", vec![]),
            GroceryItem::new("4", "pending", "eggs", vec![]),
        ];
        assert_eq!(format_plain_list(&items), "Grocery list:\n3. milk\n4. eggs");
    }

    #[test]
    fn test_format_item_line_shows_non_default_priority() {
        let mut item = GroceryItem::new("4", "pending", "eggs", vec![]);
        item.priority = Some("P1".to_string());
        assert_eq!(format_item_line(&item, "P2"), "4. [P1] eggs");

        item.priority = Some("P2".to_string());
        assert_eq!(format_item_line(&item, "P2"), "4. eggs");
    }
}
