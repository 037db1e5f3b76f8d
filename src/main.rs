#![warn(clippy::pedantic)]

mod emitter;
mod memory;
mod rom;

use std::path::Path;
use std::process;

use flexi_logger::{default_format, Logger};
use log::{debug, error};

use crate::memory::MemoryImage;
use crate::rom::{Cartridge, RomError};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        println!("[Please specify the ROM as an argument]");
        process::exit(2);
    }

    Logger::with_env_or_str("info")
        .format(default_format)
        .start()
        .unwrap();

    if let Err(e) = run(Path::new(&args[1])) {
        error!("{}", e);
        println!("{}! Aborting...", e);
        process::exit(1);
    }
}

fn run(path: &Path) -> Result<(), RomError> {
    let cart = Cartridge::load(path)?;
    println!("Valid ROM file! Reading header...");
    cart.header.print_summary();

    let prg = MemoryImage::prg(&cart);
    let chr = MemoryImage::chr(&cart);
    debug!("prg image {} bytes, chr image {} bytes", prg.len(), chr.len());

    emitter::emit(
        Path::new("."),
        Path::new(emitter::PUBLISH_ROOT),
        &prg,
        &chr,
    )?;
    Ok(())
}
