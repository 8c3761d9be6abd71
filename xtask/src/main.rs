//! Build automation for trainjob-runtime
//!
//! Usage: cargo xtask <build|test|demo|dist|ci>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

const BIN: &str = "trainjob-runtime";
const DEMO_DIR: &str = "demos";

#[derive(Parser)]
#[command(name = "xtask", about = "Build automation for trainjob-runtime")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the binary
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run the test suites
    Test {
        /// Also run tests that need a live cluster
        #[arg(long)]
        cluster: bool,
    },
    /// Render the demo TrainJob against the demo runtime template
    Demo,
    /// Package the release binary with the demo config
    Dist {
        #[arg(long)]
        target: Option<String>,
    },
    /// Formatting, clippy and tests, as run in CI
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    let root = project_root()?;
    sh.change_dir(&root);

    match cli.command {
        Task::Build { release } => {
            let profile = if release { Some("--release") } else { None };
            cmd!(sh, "cargo build --bin {BIN} {profile...}").run()?;
        }
        Task::Test { cluster } => {
            let ignored = if cluster {
                Some("--include-ignored")
            } else {
                None
            };
            cmd!(sh, "cargo test -p {BIN} -- {ignored...}").run()?;
        }
        Task::Demo => demo(&sh)?,
        Task::Dist { target } => dist(&sh, &root, target.as_deref())?,
        Task::Ci => {
            step("fmt", cmd!(sh, "cargo fmt --all -- --check"))?;
            step(
                "clippy",
                cmd!(sh, "cargo clippy --all-targets --all-features -- -D warnings"),
            )?;
            step("test", cmd!(sh, "cargo test --all"))?;
        }
    }
    Ok(())
}

fn step(name: &str, command: xshell::Cmd<'_>) -> Result<()> {
    eprintln!("==> {}", name);
    command.run().with_context(|| format!("CI step '{}' failed", name))
}

fn demo(sh: &Shell) -> Result<()> {
    let job = format!("{}/trainjob.yaml", DEMO_DIR);
    let template = format!("{}/runtime-template.yaml", DEMO_DIR);
    let config = format!("{}/trainjob-runtime.toml", DEMO_DIR);

    cmd!(
        sh,
        "cargo run --quiet --bin {BIN} -- render --job {job} --template {template} --config-file {config} --summary"
    )
    .run()
    .context("Failed to render demo manifests")
}

fn dist(sh: &Shell, root: &Path, target: Option<&str>) -> Result<()> {
    let target_args: Vec<&str> = target.map(|t| vec!["--target", t]).unwrap_or_default();
    cmd!(sh, "cargo build --release --bin {BIN} {target_args...}").run()?;

    let release_dir = match target {
        Some(t) => root.join("target").join(t).join("release"),
        None => root.join("target/release"),
    };
    let dist_dir = root.join("dist");
    sh.create_dir(&dist_dir)?;
    sh.copy_file(release_dir.join(BIN), dist_dir.join(BIN))?;
    sh.copy_file(
        root.join(DEMO_DIR).join("trainjob-runtime.toml"),
        dist_dir.join("trainjob-runtime.toml"),
    )?;

    let archive = format!("{}-{}.tar.gz", BIN, env!("CARGO_PKG_VERSION"));
    cmd!(sh, "tar -czf {archive} -C dist {BIN} trainjob-runtime.toml")
        .run()
        .context("Failed to create tarball")?;
    eprintln!("wrote {}", archive);
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live one level below the workspace root")
}
