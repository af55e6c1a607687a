use clap::Parser;
use flat::commands::Commands;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

const MANIFEST: &str = r#"{
    "flat": "data/flat.bin",
    "mtlc": "data/mtlc.bin",
    "libl": {
        "columns": [
            { "name": "key", "type": "string" },
            { "name": "type", "type": "int" },
            { "name": "has_front", "type": "int" },
            { "name": "front", "type": "int" },
            { "name": "path", "type": "string" }
        ],
        "rows": [["0011", 0, 0, 0, "data/lib.bin"]]
    }
}"#;

fn write_fixture(dir: &Path, manifest: &str) -> Result<()> {
    std::fs::create_dir_all(dir.join("data")).into_diagnostic()?;
    std::fs::write(dir.join("data/flat.bin"), [0xF0, 0xF1, 0xF2, 0xF3]).into_diagnostic()?;
    std::fs::write(dir.join("data/mtlc.bin"), [0xC0]).into_diagnostic()?;
    std::fs::write(dir.join("data/lib.bin"), [0xD0, 0xD1, 0xD2]).into_diagnostic()?;
    std::fs::write(dir.join("archive.json"), manifest).into_diagnostic()?;
    Ok(())
}

fn run(args: &[&str]) -> Result<()> {
    let cli = Cli::try_parse_from(args).into_diagnostic()?;
    cli.command.handle()
}

#[test]
fn build_writes_output() -> Result<()> {
    let dir = tempfile::tempdir().into_diagnostic()?;
    write_fixture(dir.path(), MANIFEST)?;
    let manifest = dir.path().join("archive.json");
    let output = dir.path().join("out.flat");

    run(&[
        "flat",
        "build",
        manifest.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])?;

    let data = std::fs::read(&output).into_diagnostic()?;
    assert_eq!(data.len(), 40);
    assert_eq!(&data[0..4], &[0xF0, 0xF1, 0xF2, 0xF3]);
    assert_eq!(&data[8..12], b"LIBL");
    assert_eq!(&data[12..16], &[0x18, 0x00, 0x00, 0x00]);

    Ok(())
}

#[test]
fn existing_output_requires_overwrite() -> Result<()> {
    let dir = tempfile::tempdir().into_diagnostic()?;
    write_fixture(dir.path(), MANIFEST)?;
    let manifest = dir.path().join("archive.json");
    let output = dir.path().join("out.flat");
    std::fs::write(&output, b"old").into_diagnostic()?;

    let args = [
        "flat",
        "build",
        manifest.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ];
    assert!(run(&args).is_err());
    assert_eq!(std::fs::read(&output).into_diagnostic()?, b"old");

    let mut args = args.to_vec();
    args.push("--overwrite");
    run(&args)?;
    assert_eq!(std::fs::read(&output).into_diagnostic()?.len(), 40);

    Ok(())
}

#[test]
fn failed_build_creates_no_output() -> Result<()> {
    let dir = tempfile::tempdir().into_diagnostic()?;
    write_fixture(dir.path(), &MANIFEST.replace(r#""0011""#, r#""001""#))?;
    let manifest = dir.path().join("archive.json");
    let output = dir.path().join("out.flat");

    let result = run(&[
        "flat",
        "build",
        manifest.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);

    assert!(result.is_err());
    assert!(!output.exists());

    Ok(())
}
