use clap::CommandFactory;
use grocerylist::{Config, ConfigError, GroceryError, GroceryList};
use grocerylist_cli::cli::{Cli, Commands, GroceryCommands};
use grocerylist_cli::error::handle_cli_result;
use grocerylist_cli::exit_codes::{EXIT_ERROR, EXIT_SERVER_ERROR, EXIT_SUCCESS};
use grocerylist_cli::logging::{init_logging, log_level, LogTarget};
use grocerylist_cli::{completions, grocery};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Failed to print help: {e}");
        }
        process::exit(EXIT_SUCCESS);
    };

    let target = match &command {
        Commands::Serve => LogTarget::File("mcp.log"),
        Commands::Gateway => LogTarget::File("gateway.log"),
        _ => LogTarget::Console,
    };
    init_logging(log_level(cli.quiet, cli.debug, cli.verbose), target);

    if !Cli::should_use_color() {
        colored::control::set_override(false);
    }

    let exit_code = match command {
        Commands::Grocery { subcommand } => {
            tracing::debug!("Running grocery command");
            run_grocery(subcommand).await
        }
        Commands::Serve => {
            tracing::info!("Starting MCP server");
            run_server().await
        }
        Commands::Gateway => {
            tracing::info!("Starting gateway");
            run_gateway().await
        }
        Commands::Completion { shell } => {
            tracing::debug!("Generating completion for {:?}", shell);
            run_completions(shell)
        }
    };

    process::exit(exit_code);
}

fn grocery_list() -> Result<GroceryList, ConfigError> {
    Ok(GroceryList::new(Config::load()?))
}

/// The grocery list for a server mode, or the exit code to stop with
fn server_grocery_list() -> Result<GroceryList, i32> {
    grocery_list().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        eprintln!("Error: {e}");
        EXIT_SERVER_ERROR
    })
}

async fn run_grocery(subcommand: GroceryCommands) -> i32 {
    let result = tokio::task::spawn_blocking(move || {
        let list = grocery_list().map_err(GroceryError::from)?;
        grocery::handle_grocery_command(subcommand, &list)
    })
    .await;

    match result {
        Ok(result) => handle_cli_result(result),
        Err(e) => {
            tracing::error!("Grocery command task failed: {}", e);
            eprintln!("Error: {e}");
            EXIT_ERROR
        }
    }
}

async fn run_server() -> i32 {
    use grocerylist::mcp::McpServer;
    use rmcp::serve_server;
    use rmcp::transport::io::stdio;
    use tokio_util::sync::CancellationToken;

    let server = match server_grocery_list() {
        Ok(list) => McpServer::new(list),
        Err(code) => return code,
    };

    let ct = CancellationToken::new();
    let ct_clone = ct.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        ct_clone.cancel();
    });

    match serve_server(server, stdio()).await {
        Ok(running_service) => {
            tracing::info!("MCP server started successfully");

            tokio::select! {
                result = running_service.waiting() => match result {
                    Ok(reason) => tracing::info!("MCP server stopped: {:?}", reason),
                    Err(e) => {
                        tracing::error!("MCP server task failed: {}", e);
                        return EXIT_SERVER_ERROR;
                    }
                },
                _ = ct.cancelled() => {}
            }

            tracing::info!("MCP server exited successfully");
            EXIT_SUCCESS
        }
        Err(e) => {
            tracing::error!("MCP server error: {}", e);
            EXIT_SERVER_ERROR
        }
    }
}

async fn run_gateway() -> i32 {
    use grocerylist::gateway::{GatewayMethods, GatewayServer};
    use std::sync::Arc;

    let server = match server_grocery_list() {
        Ok(list) => GatewayServer::new(GatewayMethods::new(Arc::new(list))),
        Err(code) => return code,
    };

    tokio::select! {
        result = server.serve_stdio() => match result {
            Ok(()) => {
                tracing::info!("Gateway input closed");
                EXIT_SUCCESS
            }
            Err(e) => {
                tracing::error!("Gateway error: {}", e);
                EXIT_SERVER_ERROR
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            EXIT_SUCCESS
        }
    }
}

fn run_completions(shell: clap_complete::Shell) -> i32 {
    match completions::print_completion(shell) {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            tracing::error!("Completion error: {}", e);
            EXIT_ERROR
        }
    }
}
