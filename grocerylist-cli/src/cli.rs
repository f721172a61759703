use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::io;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "grocerylist")]
#[command(version)]
#[command(about = "A grocery shopping list kept in dstask")]
#[command(long_about = "
grocerylist keeps a grocery shopping list as dstask tasks tagged +grocery.
It can be used directly from the command line, served to AI assistants as
an MCP tool, or exposed as JSON-RPC methods over stdio.

Example usage:
  grocerylist grocery add oat milk   # Add an item
  grocerylist grocery list           # Show pending items
  grocerylist serve                  # Run as MCP server
  grocerylist completion bash > ~/.bashrc.d/grocerylist  # Generate bash completions
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the grocery shopping list
    Grocery {
        #[command(subcommand)]
        subcommand: GroceryCommands,
    },
    /// Run as MCP server over stdio
    #[command(long_about = "
Runs grocerylist as an MCP server on stdin/stdout, exposing the
grocery_list tool. Logs are written to ~/.grocerylist/mcp.log.

Example:
  grocerylist serve
  # Or configure in your assistant's MCP settings
")]
    Serve,
    /// Run the JSON-RPC gateway over stdio
    #[command(long_about = "
Serves grocery.list, grocery.add and grocery.done as line-delimited
JSON-RPC 2.0 methods on stdin/stdout. Logs are written to
~/.grocerylist/gateway.log.

Example:
  echo '{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"grocery.list\"}' | grocerylist gateway
")]
    Gateway,
    /// Generate shell completion scripts
    #[command(long_about = "
Generates shell completion scripts for various shells.

Examples:
  grocerylist completion bash > ~/.bashrc.d/grocerylist
  grocerylist completion zsh > ~/.zfunc/_grocerylist
  grocerylist completion fish > ~/.config/fish/completions/grocerylist.fish
")]
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum GroceryCommands {
    /// List pending grocery items
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ListFormat,
    },
    /// Add item(s) to grocery list
    Add {
        /// Item description; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        item: Vec<String>,
    },
    /// Mark item as bought
    Done {
        /// Item ID as shown by `grocery list`
        id: String,
    },
    /// Remove item from list
    Remove {
        /// Item ID as shown by `grocery list`
        id: String,
    },
    /// Clear all bought items
    Clear,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    #[allow(dead_code)]
    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    pub fn is_tty() -> bool {
        io::stdout().is_terminal()
    }

    pub fn should_use_color() -> bool {
        Self::is_tty() && std::env::var("NO_COLOR").is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_help_works() {
        let result = Cli::try_parse_from_args(["grocerylist", "--help"]);
        assert!(result.is_err());

        let error = result.unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_no_subcommand() {
        let cli = Cli::try_parse_from_args(["grocerylist"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_grocery_add_collects_words() {
        let cli =
            Cli::try_parse_from_args(["grocerylist", "grocery", "add", "oat", "milk"]).unwrap();
        match cli.command {
            Some(Commands::Grocery { subcommand }) => assert_eq!(
                subcommand,
                GroceryCommands::Add {
                    item: vec!["oat".to_string(), "milk".to_string()]
                }
            ),
            other => panic!("Expected grocery command, got {other:?}"),
        }
    }

    #[test]
    fn test_grocery_add_requires_item() {
        let result = Cli::try_parse_from_args(["grocerylist", "grocery", "add"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_grocery_done_takes_id() {
        let cli = Cli::try_parse_from_args(["grocerylist", "grocery", "done", "3"]).unwrap();
        match cli.command {
            Some(Commands::Grocery { subcommand }) => {
                assert_eq!(subcommand, GroceryCommands::Done { id: "3".to_string() })
            }
            other => panic!("Expected grocery command, got {other:?}"),
        }
    }

    #[test]
    fn test_grocery_list_format() {
        let cli = Cli::try_parse_from_args(["grocerylist", "grocery", "list", "--format", "json"])
            .unwrap();
        match cli.command {
            Some(Commands::Grocery { subcommand }) => assert_eq!(
                subcommand,
                GroceryCommands::List {
                    format: ListFormat::Json
                }
            ),
            other => panic!("Expected grocery command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from_args(["grocerylist", "grocery", "clear", "--debug"]).unwrap();
        assert!(cli.debug);
    }

    #[test]
    fn test_serve_and_gateway() {
        let cli = Cli::try_parse_from_args(["grocerylist", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));

        let cli = Cli::try_parse_from_args(["grocerylist", "gateway"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Gateway)));
    }

    #[test]
    fn test_completion_shell() {
        let cli = Cli::try_parse_from_args(["grocerylist", "completion", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completion {
                shell: clap_complete::Shell::Zsh
            })
        ));
    }
}
