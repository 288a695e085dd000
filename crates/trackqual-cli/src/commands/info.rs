use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use trackqual_core::io::open_source;

#[derive(Args)]
pub struct InfoArgs {
    /// Input video (SER or GIF)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let source = open_source(&args.file)?;
    let info = source.info();

    println!("File:        {}", info.filename.display());
    println!("Container:   {}", info.kind);
    println!("Frames:      {}", info.total_frames);
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Bit depth:   {}", info.bit_depth);

    let stack_bytes = info.width as usize * info.height as usize * info.total_frames;
    let total_mb = stack_bytes as f64 / (1024.0 * 1024.0);
    println!("Stack size:  {:.1} MB", total_mb);

    Ok(())
}
