use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use thiserror::Error;

/* ******************************************************************************************** */
// iNES HEADER INFORMATION
// The format of the header is as follows:
//  0-3: Constant $4E $45 $53 $1A ("NES" followed by MS-DOS end-of-file)
//  4: Size of PRG ROM in 16 KB units
//  5: Size of CHR ROM in 8 KB units (Value 0 means the board uses CHR RAM)
//  6: Flags 6 (bit 0 mirroring, bit 1 PRG RAM, bit 2 trainer, bits 4-7 mapper low nibble)
//  7: Flags 7 (bits 4-7 mapper high nibble)
//  8: Size of PRG RAM in 8 KB units (valid only when flags 6 bit 1 is set)
//  9-15: Ignored
/* ******************************************************************************************** */

pub const HEADER_LEN: usize = 16;
pub const PRG_ROM_BANK_SIZE: usize = 16384;
pub const CHR_ROM_BANK_SIZE: usize = 8192;
const PRG_RAM_BANK_SIZE: usize = 8192;

const MAGIC: [u8; 4] = [0x4e, 0x45, 0x53, 0x1a];

#[derive(Debug, Error)]
pub enum RomError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid iNES signature")]
    InvalidSignature,
    #[error("file is shorter than the 16 byte iNES header")]
    MalformedHeader,
    #[error("rom truncated: header declares {expected} payload bytes, file holds {actual}")]
    TruncatedRom { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
}

#[derive(Debug)]
pub struct RomHeader {
    pub prg_units: u8,
    pub chr_units: u8,
    pub flags_6: u8,
    pub flags_7: u8,
    pub prg_ram_units: u8,
}

impl RomHeader {
    pub fn decode(rom: &[u8]) -> Result<RomHeader, RomError> {
        if rom.len() < HEADER_LEN {
            return Err(RomError::MalformedHeader);
        }
        if rom[0..4] != MAGIC {
            return Err(RomError::InvalidSignature);
        }
        Ok(RomHeader {
            prg_units: rom[4],
            chr_units: rom[5],
            flags_6: rom[6],
            flags_7: rom[7],
            prg_ram_units: rom[8],
        })
    }

    pub fn prg_rom_bytes(&self) -> usize {
        self.prg_units as usize * PRG_ROM_BANK_SIZE
    }

    pub fn chr_rom_bytes(&self) -> usize {
        self.chr_units as usize * CHR_ROM_BANK_SIZE
    }

    pub fn mapper_id(&self) -> u8 {
        (self.flags_6 >> 4) | (self.flags_7 & 0xf0)
    }

    pub fn mirroring(&self) -> Mirroring {
        if self.flags_6 & 0b0000_0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }

    pub fn has_prg_ram(&self) -> bool {
        self.flags_6 & 0b0000_0010 != 0
    }

    pub fn has_trainer(&self) -> bool {
        self.flags_6 & 0b0000_0100 != 0
    }

    pub fn prg_ram_bytes(&self) -> usize {
        self.prg_ram_units as usize * PRG_RAM_BANK_SIZE
    }

    // Print bank sizes and flags
    pub fn print_summary(&self) {
        println!("PRG ROM is {}KB", self.prg_units as usize * 16);
        println!("CHR ROM is {}KB", self.chr_units as usize * 8);
        println!("Has PRG RAM: {}", self.has_prg_ram());
        if self.has_prg_ram() {
            println!("PRG RAM is {}KB", self.prg_ram_bytes() / 1024);
        }
        println!("Has trainer: {}", self.has_trainer());
        println!("Mapper: {}", self.mapper_id());
        println!("Mirroring: {:?}", self.mirroring());
    }
}

#[derive(Debug)]
pub struct Cartridge {
    pub header: RomHeader,
    pub prg: Vec<u8>,
    pub chr: Vec<u8>,
}

impl Cartridge {
    pub fn load(path: &Path) -> Result<Cartridge, RomError> {
        let mut f = File::open(path)?;
        let mut rom = Vec::new();
        f.read_to_end(&mut rom)?;
        debug!("loaded {} ({} bytes)", path.display(), rom.len());
        Cartridge::from_bytes(&rom)
    }

    // Payload offsets start right after the header. A trainer (flags 6 bit 2)
    // would shift PRG by 512 bytes but is not skipped here; the flag is only
    // reported. Known limitation.
    pub fn from_bytes(rom: &[u8]) -> Result<Cartridge, RomError> {
        let header = RomHeader::decode(rom)?;
        let prg_end = HEADER_LEN + header.prg_rom_bytes();
        let chr_end = prg_end + header.chr_rom_bytes();
        if rom.len() < chr_end {
            return Err(RomError::TruncatedRom {
                expected: chr_end - HEADER_LEN,
                actual: rom.len() - HEADER_LEN,
            });
        }
        let prg = rom[HEADER_LEN..prg_end].to_vec();
        let chr = rom[prg_end..chr_end].to_vec();
        Ok(Cartridge { header, prg, chr })
    }
}

/// Builds a minimal iNES image for tests: PRG banks filled with 0xab,
/// CHR banks filled with 0xcd.
#[cfg(test)]
pub fn make_test_rom(prg_units: u8, chr_units: u8, flags_6: u8, flags_7: u8) -> Vec<u8> {
    let mut rom = vec![
        0x4e, 0x45, 0x53, 0x1a, // "NES\x1A"
        prg_units, chr_units, flags_6, flags_7, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    rom.extend(vec![0xab; prg_units as usize * PRG_ROM_BANK_SIZE]);
    rom.extend(vec![0xcd; chr_units as usize * CHR_ROM_BANK_SIZE]);
    rom
}
