use std::fs;
use std::io;
use std::path::Path;

use log::info;

use crate::memory::MemoryImage;

pub const PRG_FILE: &str = "prg_rom.mem";
pub const CHR_FILE: &str = "chr_rom.mem";
/// Hand-off directory for the simulation's memory preload ($readmemh).
pub const PUBLISH_ROOT: &str = "user/data";

/// Writes both listings under their fixed names, then publishes copies.
/// Fixed order: prg file, chr file, prg copy, chr copy. Any failure aborts;
/// files already written stay in place.
pub fn emit(
    dir: &Path,
    publish_root: &Path,
    prg: &MemoryImage,
    chr: &MemoryImage,
) -> io::Result<()> {
    write_mem_file(dir, PRG_FILE, prg)?;
    write_mem_file(dir, CHR_FILE, chr)?;
    publish(dir, publish_root, PRG_FILE)?;
    publish(dir, publish_root, CHR_FILE)?;
    Ok(())
}

/// One two-digit lowercase hex byte per line, buffer order.
fn write_mem_file(dir: &Path, name: &str, image: &MemoryImage) -> io::Result<()> {
    let path = dir.join(name);
    fs::write(&path, image.to_hex())?;
    info!("wrote {} ({} bytes)", path.display(), image.len());
    Ok(())
}

/// Plain file copy, so the published listing is byte-identical to the
/// original. The publish directory is created when missing.
fn publish(dir: &Path, publish_root: &Path, name: &str) -> io::Result<()> {
    fs::create_dir_all(publish_root)?;
    let dest = publish_root.join(name);
    fs::copy(dir.join(name), &dest)?;
    info!("published {}", dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryImage;
    use crate::rom::{make_test_rom, Cartridge};
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("nes2mem_tests")
            .join(format!("{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn images(rom: &[u8]) -> (MemoryImage, MemoryImage) {
        let cart = Cartridge::from_bytes(rom).unwrap();
        (MemoryImage::prg(&cart), MemoryImage::chr(&cart))
    }

    #[test]
    fn emits_both_listings() {
        let dir = scratch_dir("emits_both_listings");
        let (prg, chr) = images(&make_test_rom(1, 1, 0, 0));
        emit(&dir, &dir.join("user/data"), &prg, &chr).unwrap();

        let prg_out = fs::read_to_string(dir.join(PRG_FILE)).unwrap();
        assert_eq!(prg_out.lines().count(), 32768);
        assert!(prg_out.lines().all(|line| line == "ab"));

        let chr_out = fs::read_to_string(dir.join(CHR_FILE)).unwrap();
        assert_eq!(chr_out.lines().count(), 8192);
        assert!(chr_out.lines().all(|line| line == "cd"));
    }

    #[test]
    fn chr_ram_cart_gets_zero_listing() {
        let dir = scratch_dir("chr_ram_cart_gets_zero_listing");
        let (prg, chr) = images(&make_test_rom(1, 0, 0, 0));
        emit(&dir, &dir.join("user/data"), &prg, &chr).unwrap();

        let chr_out = fs::read_to_string(dir.join(CHR_FILE)).unwrap();
        assert_eq!(chr_out.lines().count(), 8192);
        assert!(chr_out.lines().all(|line| line == "00"));
    }

    #[test]
    fn published_copies_are_byte_identical() {
        let dir = scratch_dir("published_copies_are_byte_identical");
        let publish_root = dir.join("user/data");
        let (prg, chr) = images(&make_test_rom(1, 1, 0, 0));
        emit(&dir, &publish_root, &prg, &chr).unwrap();

        for name in &[PRG_FILE, CHR_FILE] {
            let original = fs::read(dir.join(name)).unwrap();
            let copy = fs::read(publish_root.join(name)).unwrap();
            assert_eq!(original, copy);
        }
    }

    #[test]
    fn emitting_twice_is_idempotent() {
        let dir = scratch_dir("emitting_twice_is_idempotent");
        let publish_root = dir.join("user/data");
        let (prg, chr) = images(&make_test_rom(2, 1, 0, 0));

        emit(&dir, &publish_root, &prg, &chr).unwrap();
        let first = fs::read(dir.join(PRG_FILE)).unwrap();
        emit(&dir, &publish_root, &prg, &chr).unwrap();
        let second = fs::read(dir.join(PRG_FILE)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn listing_has_no_trailing_newline() {
        let dir = scratch_dir("listing_has_no_trailing_newline");
        let (prg, chr) = images(&make_test_rom(1, 1, 0, 0));
        emit(&dir, &dir.join("user/data"), &prg, &chr).unwrap();

        let out = fs::read_to_string(dir.join(CHR_FILE)).unwrap();
        assert!(!out.ends_with('\n'));
    }
}
