use crate::cli::{GroceryCommands, ListFormat};
use crate::error::CliResult;
use colored::*;
use grocerylist::{format_item_line, GroceryItem, GroceryList, ItemId};
use std::io::{self, Write};

/// Run one `grocery` sub-command, printing its result to stdout
pub fn handle_grocery_command(command: GroceryCommands, list: &GroceryList) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        GroceryCommands::List { format } => {
            let items = list.list_pending()?;
            match format {
                ListFormat::Text => {
                    print_items(&mut out, &items, &list.config().default_priority)?
                }
                ListFormat::Json => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&items)?).map_err(io_error)?
                }
            }
        }
        GroceryCommands::Add { item } => {
            let message = list.add_item(&item.join(" "))?;
            writeln!(out, "{message}").map_err(io_error)?;
        }
        GroceryCommands::Done { id } => {
            let message = list.mark_done(&ItemId::from(id))?;
            writeln!(out, "{message}").map_err(io_error)?;
        }
        GroceryCommands::Remove { id } => {
            let message = list.remove_item(&ItemId::from(id))?;
            writeln!(out, "{message}").map_err(io_error)?;
        }
        GroceryCommands::Clear => {
            let message = list.clear_resolved()?;
            writeln!(out, "{message}").map_err(io_error)?;
        }
    }

    Ok(())
}

fn io_error(error: io::Error) -> crate::error::CliError {
    crate::error::CliError::general(error)
}

/// `🛒 Grocery list is empty`, or a header and one indented line per item
pub fn print_items<W: Write>(
    out: &mut W,
    items: &[GroceryItem],
    default_priority: &str,
) -> CliResult<()> {
    if items.is_empty() {
        writeln!(out, "🛒 Grocery list is empty").map_err(io_error)?;
        return Ok(());
    }

    writeln!(out, "🛒 {}", "Grocery List:".bold()).map_err(io_error)?;
    for item in items {
        writeln!(out, "  {}", format_item_line(item, default_priority)).map_err(io_error)?;
    }
    Ok(())
}
