//! Two-way set-associative instruction cache.
//!
//! Geometry is fixed by the chip: 512 sets of two ways, sixteen
//! instructions per line (64 KiB total). The virtual address splits into
//! offset [5:2], index [14:6], and tag [47:15]. A probe distinguishes a
//! **miss** (a valid line is present at the index but its tag differs)
//! from a **way miss** (no valid line at the index at all); the driver
//! reacts differently to the two.
//!
//! Lines carry an 8-bit ASN, an address-space-match bit, a PAL bit, and
//! four per-mode read-enable bits. The packed 128-byte line image used on
//! the fill path is encoded and decoded here with explicit shifts and
//! masks.

use crate::common::constants::{ICACHE_LINE_IMAGE, ICACHE_LINE_INS, ICACHE_SETS, ICACHE_WAYS, NUM_FETCH_INS};
use crate::common::pc::VirtPc;
use crate::isa::format::{InsFormat, format_of};
use crate::isa::instruction::InsWord;

/// Processor mode checked against a line's read-enable bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Kernel mode (read-enable bit 0).
    #[default]
    Kernel,
    /// Executive mode (read-enable bit 1).
    Executive,
    /// Supervisor mode (read-enable bit 2).
    Supervisor,
    /// User mode (read-enable bit 3).
    User,
}

impl AccessMode {
    /// Builds a mode from the two-bit current-mode field of IER_CM.
    #[inline]
    pub const fn from_cm(cm: u8) -> Self {
        match cm & 0x3 {
            0 => Self::Kernel,
            1 => Self::Executive,
            2 => Self::Supervisor,
            _ => Self::User,
        }
    }

    #[inline]
    const fn enable_bit(self) -> u8 {
        match self {
            Self::Kernel => 1,
            Self::Executive => 1 << 1,
            Self::Supervisor => 1 << 2,
            Self::User => 1 << 3,
        }
    }
}

/// Protection and address-space attributes installed with a line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineAttrs {
    /// Line holds PAL code.
    pub pal: bool,
    /// Address-space-match: line hits regardless of ASN.
    pub asm_: bool,
    /// Address space number the line belongs to.
    pub asn: u8,
    /// Read-enable bits, kernel through user in bits [3:0].
    pub access: u8,
}

/// One cache line: metadata plus sixteen instruction words.
#[derive(Debug, Clone)]
pub struct IcacheLine {
    /// Line contains valid data.
    pub valid: bool,
    /// Line holds PAL code.
    pub pal: bool,
    /// Address-space-match bit.
    pub asm_: bool,
    /// Round-robin replacement counter (4 bits in the packed image).
    pub replace: u8,
    /// Per-mode read-enable bits.
    pub access: u8,
    /// Address space number.
    pub asn: u8,
    /// Virtual tag, address bits [47:15].
    pub tag: u64,
    /// The sixteen instruction words.
    pub words: [u32; ICACHE_LINE_INS],
}

impl Default for IcacheLine {
    fn default() -> Self {
        Self {
            valid: false,
            pal: false,
            asm_: false,
            replace: 0,
            access: 0,
            asn: 0,
            tag: 0,
            words: [0; ICACHE_LINE_INS],
        }
    }
}

/// Up to four sequential instructions returned by a fetch hit.
#[derive(Debug, Clone, Copy)]
pub struct FetchGroup {
    /// Number of valid slots (shorter near the end of a line).
    pub count: usize,
    /// Recomputed per-instruction VPCs.
    pub pcs: [VirtPc; NUM_FETCH_INS],
    /// The raw instruction words.
    pub words: [InsWord; NUM_FETCH_INS],
    /// Format of each word.
    pub formats: [InsFormat; NUM_FETCH_INS],
}

/// Outcome of an instruction-cache probe.
#[derive(Debug, Clone, Copy)]
pub enum FetchOutcome {
    /// Instructions found; decode can proceed.
    Hit(FetchGroup),
    /// A valid line sits at the index but the tag does not match.
    Miss,
    /// No valid line at the index.
    WayMiss,
}

/// The instruction cache.
#[derive(Debug)]
pub struct Icache {
    sets: Vec<[IcacheLine; ICACHE_WAYS]>,
    /// Per-set round-robin victim pointer.
    replace: Vec<u8>,
}

const fn index_of(addr: u64) -> usize {
    (addr >> 6) as usize & (ICACHE_SETS - 1)
}

const fn tag_of(addr: u64) -> u64 {
    addr >> 15 & 0x1_ffff_ffff
}

const fn offset_of(addr: u64) -> usize {
    (addr >> 2) as usize & (ICACHE_LINE_INS - 1)
}

impl Default for Icache {
    fn default() -> Self {
        Self::new()
    }
}

impl Icache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            sets: vec![[IcacheLine::default(), IcacheLine::default()]; ICACHE_SETS],
            replace: vec![0; ICACHE_SETS],
        }
    }

    /// Probes for the line holding `vpc` under the given mode and ASN.
    ///
    /// On a hit, returns up to four instructions starting at the requested
    /// word, their recomputed VPCs, and their formats.
    pub fn fetch(&self, vpc: VirtPc, mode: AccessMode, asn: u8) -> FetchOutcome {
        let addr = vpc.addr();
        let set = &self.sets[index_of(addr)];
        let tag = tag_of(addr);

        let mut any_valid = false;
        for line in set {
            if !line.valid {
                continue;
            }
            any_valid = true;
            if line.tag != tag {
                continue;
            }
            if !line.asm_ && line.asn != asn {
                continue;
            }
            if line.access & mode.enable_bit() == 0 {
                continue;
            }
            return FetchOutcome::Hit(Self::group(line, vpc));
        }

        if any_valid {
            FetchOutcome::Miss
        } else {
            FetchOutcome::WayMiss
        }
    }

    fn group(line: &IcacheLine, vpc: VirtPc) -> FetchGroup {
        let offset = offset_of(vpc.addr());
        let count = NUM_FETCH_INS.min(ICACHE_LINE_INS - offset);
        let mut group = FetchGroup {
            count,
            pcs: [VirtPc::default(); NUM_FETCH_INS],
            words: [InsWord::default(); NUM_FETCH_INS],
            formats: [InsFormat::Res; NUM_FETCH_INS],
        };
        for i in 0..count {
            let word = InsWord(line.words[offset + i]);
            group.pcs[i] = vpc.incr(i as u64);
            group.words[i] = word;
            group.formats[i] = format_of(word.opcode());
        }
        group
    }

    /// Read-only probe: does any way hold a valid line matching `vpc`?
    ///
    /// Used for branch-target pre-checks; ignores mode and ASN.
    pub fn valid(&self, vpc: VirtPc) -> bool {
        let addr = vpc.addr();
        let tag = tag_of(addr);
        self.sets[index_of(addr)]
            .iter()
            .any(|line| line.valid && line.tag == tag)
    }

    /// Installs a line for `vpc`, choosing the victim way round-robin.
    pub fn fill(&mut self, vpc: VirtPc, words: [u32; ICACHE_LINE_INS], attrs: LineAttrs) {
        let addr = vpc.addr();
        let index = index_of(addr);
        let way = self.replace[index] as usize % ICACHE_WAYS;
        self.replace[index] = (self.replace[index] + 1) & 0xf;
        self.sets[index][way] = IcacheLine {
            valid: true,
            pal: attrs.pal,
            asm_: attrs.asm_,
            replace: self.replace[index],
            access: attrs.access,
            asn: attrs.asn,
            tag: tag_of(addr),
            words,
        };
    }

    /// Invalidates every line.
    pub fn flush(&mut self) {
        for set in &mut self.sets {
            for line in set {
                line.valid = false;
            }
        }
    }

    /// Invalidates lines without the address-space-match bit.
    pub fn flush_non_asm(&mut self) {
        for set in &mut self.sets {
            for line in set {
                if !line.asm_ {
                    line.valid = false;
                }
            }
        }
    }
}

/// Encodes a line into its 128-byte packed image.
///
/// Word 0: asm(0), valid(1), pal(2), replace [6:3], access [10:7],
/// asn [18:11], rest reserved. Word 1: index at [14:6], tag at [47:15].
/// Then the sixteen instruction words little-endian, then 48 reserved
/// bytes.
pub fn pack_line(line: &IcacheLine, index: u16) -> [u8; ICACHE_LINE_IMAGE] {
    let mut image = [0u8; ICACHE_LINE_IMAGE];
    let w0 = u64::from(line.asm_)
        | u64::from(line.valid) << 1
        | u64::from(line.pal) << 2
        | u64::from(line.replace & 0xf) << 3
        | u64::from(line.access & 0xf) << 7
        | u64::from(line.asn) << 11;
    let w1 = u64::from(index & 0x1ff) << 6 | (line.tag & 0x1_ffff_ffff) << 15;
    image[0..8].copy_from_slice(&w0.to_le_bytes());
    image[8..16].copy_from_slice(&w1.to_le_bytes());
    for (i, word) in line.words.iter().enumerate() {
        let at = 16 + i * 4;
        image[at..at + 4].copy_from_slice(&word.to_le_bytes());
    }
    image
}

/// Decodes a packed 128-byte image back into a line and its set index.
pub fn unpack_line(image: &[u8; ICACHE_LINE_IMAGE]) -> (IcacheLine, u16) {
    let mut w0_bytes = [0u8; 8];
    w0_bytes.copy_from_slice(&image[0..8]);
    let w0 = u64::from_le_bytes(w0_bytes);
    let mut w1_bytes = [0u8; 8];
    w1_bytes.copy_from_slice(&image[8..16]);
    let w1 = u64::from_le_bytes(w1_bytes);

    let mut words = [0u32; ICACHE_LINE_INS];
    for (i, word) in words.iter_mut().enumerate() {
        let at = 16 + i * 4;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&image[at..at + 4]);
        *word = u32::from_le_bytes(buf);
    }

    let line = IcacheLine {
        asm_: w0 & 1 != 0,
        valid: w0 >> 1 & 1 != 0,
        pal: w0 >> 2 & 1 != 0,
        replace: (w0 >> 3 & 0xf) as u8,
        access: (w0 >> 7 & 0xf) as u8,
        asn: (w0 >> 11 & 0xff) as u8,
        tag: w1 >> 15 & 0x1_ffff_ffff,
        words,
    };
    (line, (w1 >> 6 & 0x1ff) as u16)
}
