use anyhow::Result;
use clap::Parser;
use std::path::Path;
use wasmserve::manifest::{self, CORE_DEPENDENCIES, EXTENDED_DEPENDENCIES};

#[derive(Parser)]
#[command(name = "patch-deps")]
#[command(about = "Merge missing dependency pins into a package.json manifest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Path to the dependency manifest
    #[arg(short, long, default_value = "package.json")]
    manifest: String,

    /// Apply the comprehensive dependency set instead of the core set
    #[arg(long)]
    all: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let deps = if args.all {
        EXTENDED_DEPENDENCIES
    } else {
        CORE_DEPENDENCIES
    };

    let added = manifest::patch_file(Path::new(&args.manifest), deps)?;

    for (name, version) in &added {
        println!("Added {}: {}", name, version);
    }

    if added.is_empty() {
        println!("No new dependencies to add.");
    } else {
        println!("Added {} dependencies!", added.len());
    }

    Ok(())
}
