use clap::Args;
use flat_archive::{write::FlatWriterOptions, FlatWriter, ManifestFile};
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::info;

#[derive(Args)]
pub struct BuildArgs {
    /// An input manifest file
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// The FLAT file to create
    #[arg(short, long, value_name = "FILE", default_value = "out.flat")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl BuildArgs {
    pub fn handle(&self) -> Result<()> {
        let manifest = ManifestFile::from_path(&self.manifest)
            .context(format!("reading manifest {}", &self.manifest.display()))?;

        // relative paths in the manifest are relative to the manifest itself
        let base_dir = self
            .manifest
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();

        let writer = FlatWriter::new(FlatWriterOptions::builder().base_dir(base_dir).build());
        let flat = writer
            .build(&manifest)
            .context(format!("building {}", &self.output.display()))?;

        info!("creating {}", &self.output.display());
        let mut out = if !self.overwrite {
            File::create_new(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        } else {
            File::create(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        };

        out.write_all(flat.data())
            .into_diagnostic()
            .context(format!("writing {}", &self.output.display()))?;

        info!("wrote {} bytes", flat.data_size());
        Ok(())
    }
}
