// CLI command definitions

use super::runtime::{ApplyCommand, DeleteCommand, RenderCommand, StatusCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "trainjob-runtime",
    version,
    about = "Assemble the runtime pod template of a TrainJob",
    long_about = "Runs the registered component builders over a training runtime template \
                  for one TrainJob and renders or applies the result"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print the generated artifacts and the assembled runtime template as YAML
    Render(RenderCommand),

    /// Assemble and apply the generated artifacts to the cluster
    Apply(ApplyCommand),

    /// Show whether the generated artifacts exist in the cluster
    Status(StatusCommand),

    /// Delete the generated artifacts of a TrainJob
    Delete(DeleteCommand),
}
