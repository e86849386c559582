/*!
Command plumbing around the blueprint engine.

  src/cmd/
    mod.rs     (this file)
    serve.rs   (ServeArgs + load_blueprint + execute_serve)
    exec.rs    (run_command: subprocess spawn + output capture)

Conventions:
  - The entry point `execute_serve` returns `anyhow::Result<()>`.
  - `exec` never returns an error: every failure is a `CommandOutcome`
    so one bad tool call cannot stop the server.
*/

pub mod exec;
pub mod serve;

pub use serve::{ServeArgs, execute_serve, load_blueprint};
