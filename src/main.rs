use anyhow::Result;
use clap::Parser;

mod blueprint;
mod cmd;
mod mcp;
mod utils;

use cmd::ServeArgs;

const LONG_ABOUT: &str = "\
Run a single command as an MCP server over stdio.

The command starts at the first non-flag argument. Each following argument is
one shell word; it is passed literally unless it contains a template:

  {{name}}         required string         {{name#desc}}  with description
  {{name...}}      required array
  [name]           optional string         [name#desc]    with description
  [name...]        array of extra args     [name...#desc] with description
  [-f] [--flag]    boolean flag            [-f#desc]      with description

Templates may also sit inside a larger word, e.g.
  \"https://en.wikipedia.org/wiki/{{wiki_page_name}}\"

Example:
  studio-mcp say -v siri \"{{speech # a concise phrase to say outloud to the user}}\"";

/// Studio MCP - turn a command line template into a single-tool MCP server.
///
/// Usage:
///   studio-mcp [--debug] <command> [template words...]
///
/// Global flags / env:
///   -v / -vv          Increase verbosity (logs go to stderr)
///   -q / --quiet      Errors only
///   --debug           Log tool calls and command results (same as -v)
///   STUDIO_MCP_DEBUG  Environment fallback for --debug
///   RUST_LOG          Overrides the derived log filter
#[derive(Parser, Debug)]
#[command(
    name = "studio-mcp",
    version,
    about = "Run a single command as an MCP server over stdio",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long)]
    quiet: bool,

    /// Print debug logs to stderr to diagnose MCP server issues
    #[arg(long)]
    debug: bool,

    /// Command to run followed by its (templated) arguments
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine effective debug mode (CLI flag > STUDIO_MCP_DEBUG env)
    let debug = cli.debug || utils::debug_from_env();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet, debug);
    utils::init_logging(level);

    let args = ServeArgs {
        command: cli.command,
    };

    let blueprint = match cmd::load_blueprint(&args) {
        Ok(bp) => bp,
        Err(e) => {
            eprintln!("studio-mcp: {e:#}");
            std::process::exit(2);
        }
    };

    cmd::execute_serve(blueprint)
}
