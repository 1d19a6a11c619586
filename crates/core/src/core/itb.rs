//! Instruction translation buffer.
//!
//! 128 entries filled round-robin. An entry is written by PAL code in two
//! steps: a store to ITB_TAG latches the virtual address, and the
//! retirement of the HW_MTPR to ITB_PTE commits tag and PTE together into
//! the buffer. Entries match on the virtual page (widened by the PTE's
//! granularity hint) and either the ASN or the address-space-match bit.

use crate::common::constants::{ITB_LEN, PAGE_SIZE};
use crate::core::icache::AccessMode;

/// One translation entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItbEntry {
    /// Page-aligned virtual address, pre-masked by `match_mask`.
    pub virt: u64,
    /// Physical page frame base.
    pub phys: u64,
    /// Bits of the VA that select the entry.
    pub match_mask: u64,
    /// Bits of the VA carried through to the PA.
    pub keep_mask: u64,
    /// Read-enable bits, kernel through user in bits [3:0].
    pub access: u8,
    /// Address-space-match: entry hits regardless of ASN.
    pub asm_: bool,
    /// Address space number.
    pub asn: u8,
    /// Entry holds a live translation.
    pub valid: bool,
}

/// Why a translation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateError {
    /// No entry matches the address: the driver raises ITB_MISS.
    NotMapped,
    /// An entry matches but forbids the current mode: the driver raises
    /// an instruction access violation.
    AccessViolation,
}

/// The instruction translation buffer.
#[derive(Debug)]
pub struct Itb {
    entries: [ItbEntry; ITB_LEN],
    next: usize,
}

impl Default for Itb {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes covered by a page with granularity hint `gh` (8 KiB × 8^gh).
const fn page_span(gh: u8) -> u64 {
    PAGE_SIZE << (3 * gh as u32)
}

impl Itb {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            entries: [ItbEntry::default(); ITB_LEN],
            next: 0,
        }
    }

    /// Installs a translation at the round-robin cursor.
    ///
    /// `va` is the latched ITB_TAG value; `pfn` is the page frame from the
    /// PTE, `gh` its granularity hint.
    pub fn insert(&mut self, va: u64, pfn: u64, gh: u8, access: u8, asm_: bool, asn: u8) {
        let span = page_span(gh & 0x3);
        let keep_mask = span - 1;
        let match_mask = !keep_mask;
        self.entries[self.next] = ItbEntry {
            virt: va & match_mask,
            phys: (pfn << 13) & match_mask,
            match_mask,
            keep_mask,
            access,
            asm_,
            asn,
            valid: true,
        };
        self.next = (self.next + 1) % ITB_LEN;
    }

    /// Finds the entry covering `va` for the given ASN.
    pub fn lookup(&self, va: u64, asn: u8) -> Option<&ItbEntry> {
        self.entries
            .iter()
            .filter(|e| e.valid)
            .find(|e| va & e.match_mask == e.virt && (e.asm_ || e.asn == asn))
    }

    /// Translates `va` to a physical address, checking the mode's
    /// read-enable bit.
    pub fn translate(&self, va: u64, asn: u8, mode: AccessMode) -> Result<u64, TranslateError> {
        let entry = self.lookup(va, asn).ok_or(TranslateError::NotMapped)?;
        let enable = match mode {
            AccessMode::Kernel => 1,
            AccessMode::Executive => 1 << 1,
            AccessMode::Supervisor => 1 << 2,
            AccessMode::User => 1 << 3,
        };
        if entry.access & enable == 0 {
            return Err(TranslateError::AccessViolation);
        }
        Ok(entry.phys | (va & entry.keep_mask))
    }

    /// Invalidates every entry (ITB_IA).
    pub fn invalidate_all(&mut self) {
        for e in &mut self.entries {
            e.valid = false;
        }
    }

    /// Invalidates entries without the ASM bit (ITB_IAP).
    pub fn invalidate_process(&mut self) {
        for e in &mut self.entries {
            if !e.asm_ {
                e.valid = false;
            }
        }
    }

    /// Invalidates entries covering `va` (ITB_IS).
    pub fn invalidate_single(&mut self, va: u64) {
        for e in &mut self.entries {
            if e.valid && va & e.match_mask == e.virt {
                e.valid = false;
            }
        }
    }
}
