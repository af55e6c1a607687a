pub mod build;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Build a FLAT file from a manifest
    Build(build::BuildArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Build(build) => build.handle(),
        }
    }
}
