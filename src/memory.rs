use crate::rom::{Cartridge, CHR_ROM_BANK_SIZE, PRG_ROM_BANK_SIZE};

/// One normalized memory image, owned, index order preserved from the
/// extracted payload.
#[derive(Debug, PartialEq)]
pub struct MemoryImage {
    bytes: Vec<u8>,
}

impl MemoryImage {
    /// Program memory. A single 16KB bank is laid out twice so the image
    /// fills the 32KB address window (NROM-128 mirroring). Every other
    /// bank count passes through unchanged.
    pub fn prg(cart: &Cartridge) -> MemoryImage {
        let mut bytes = cart.prg.clone();
        if bytes.len() == PRG_ROM_BANK_SIZE {
            bytes.extend_from_within(..);
        }
        MemoryImage { bytes }
    }

    /// Character memory. No CHR ROM means the board uses CHR RAM; emit one
    /// zero-filled 8KB bank so the pattern table preload is still complete.
    pub fn chr(cart: &Cartridge) -> MemoryImage {
        let bytes = if cart.chr.is_empty() {
            vec![0; CHR_ROM_BANK_SIZE]
        } else {
            cart.chr.clone()
        };
        MemoryImage { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Two lowercase hex digits per byte, one byte per line, byte 0 first,
    /// no trailing newline.
    pub fn to_hex(&self) -> String {
        self.bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
