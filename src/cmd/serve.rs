/*!
`serve.rs`

Builds the blueprint from the trailing command line and serves it as an
MCP tool over stdio.

Flow:
  1. Blueprint::from_args(command)   (construction errors are fatal)
  2. log tool name / command format / schema at debug level
  3. create Tokio runtime (main is sync) and run mcp::serve_stdio
*/

use anyhow::{Context, Result};

use crate::blueprint::Blueprint;
use crate::mcp;

/// Inputs for the serve command, collected from the top-level CLI.
#[derive(Debug, Clone)]
pub struct ServeArgs {
    /// Base command followed by template shell words.
    pub command: Vec<String>,
}

/// Parse the blueprint; kept separate so startup failures surface before
/// any runtime is created.
pub fn load_blueprint(args: &ServeArgs) -> Result<Blueprint> {
    let blueprint = Blueprint::from_args(&args.command)
        .with_context(|| format!("Invalid command: {}", shell_words::join(&args.command)))?;

    tracing::debug!("tool name: {}", blueprint.tool_name());
    tracing::debug!("command format: {}", blueprint.command_format());
    tracing::debug!(
        "input schema: {}",
        serde_json::Value::Object(blueprint.input_schema())
    );

    Ok(blueprint)
}

pub fn execute_serve(blueprint: Blueprint) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(mcp::serve_stdio(blueprint))
}
