//! Internal processor registers.
//!
//! IPRs are addressed by an 8-bit index carried in HW_MFPR/HW_MTPR
//! instructions; the index range determines which box owns the register
//! and therefore which lock guards it. Every register with internal
//! structure gets a newtype over `u64` with explicit shift-and-mask
//! accessors — the packed layouts come from the EV6 hardware reference
//! and must be bit-identical on every target.

/// IPR index constants.
pub mod index {
    /// ITB tag latch (write).
    pub const ITB_TAG: u16 = 0x00;
    /// ITB PTE; retiring the write commits tag+PTE into the ITB.
    pub const ITB_PTE: u16 = 0x01;
    /// ITB invalidate-all-process pseudo-register.
    pub const ITB_IAP: u16 = 0x02;
    /// ITB invalidate-all pseudo-register.
    pub const ITB_IA: u16 = 0x03;
    /// ITB invalidate-single.
    pub const ITB_IS: u16 = 0x04;
    /// Exception address.
    pub const EXC_ADDR: u16 = 0x06;
    /// Formatted faulting instruction VA.
    pub const IVA_FORM: u16 = 0x07;
    /// Current mode.
    pub const CM: u16 = 0x09;
    /// Interrupt enables.
    pub const IER: u16 = 0x0a;
    /// Interrupt enables + current mode combined.
    pub const IER_CM: u16 = 0x0b;
    /// Software interrupt requests.
    pub const SIRR: u16 = 0x0c;
    /// Interrupt summary.
    pub const ISUM: u16 = 0x0d;
    /// Hardware interrupt clear.
    pub const HW_INT_CLR: u16 = 0x0e;
    /// Exception summary.
    pub const EXC_SUM: u16 = 0x0f;
    /// PAL base address.
    pub const PAL_BASE: u16 = 0x10;
    /// Ibox control.
    pub const I_CTL: u16 = 0x11;
    /// I-cache flush (ASM lines spared) pseudo-register.
    pub const IC_FLUSH_ASM: u16 = 0x12;
    /// I-cache flush pseudo-register.
    pub const IC_FLUSH: u16 = 0x13;
    /// Performance counter control.
    pub const PCTR_CTL: u16 = 0x14;
    /// Clear virtual-to-physical map pseudo-register.
    pub const CLR_MAP: u16 = 0x15;
    /// Ibox status.
    pub const I_STAT: u16 = 0x16;
    /// Sleep pseudo-register.
    pub const SLEEP: u16 = 0x17;
    /// DTB tag 0.
    pub const DTB_TAG0: u16 = 0x20;
    /// DTB PTE 0.
    pub const DTB_PTE0: u16 = 0x21;
    /// DTB invalidate-single 0.
    pub const DTB_IS0: u16 = 0x24;
    /// DTB ASN 0.
    pub const DTB_ASN0: u16 = 0x25;
    /// DTB alternate mode.
    pub const DTB_ALTMODE: u16 = 0x26;
    /// Memory-management status.
    pub const MM_STAT: u16 = 0x27;
    /// Mbox control.
    pub const M_CTL: u16 = 0x28;
    /// Dcache control.
    pub const DC_CTL: u16 = 0x29;
    /// Dcache status.
    pub const DC_STAT: u16 = 0x2a;
    /// Cbox data.
    pub const C_DATA: u16 = 0x2b;
    /// Cbox shift control.
    pub const C_SHFT: u16 = 0x2c;
    /// Process context, bank 0 (any combination of field-select bits).
    pub const PCXT0: u16 = 0x40;
    /// Last index of the PCXT0 range.
    pub const PCXT0_END: u16 = 0x5f;
    /// Process context, bank 1.
    pub const PCXT1: u16 = 0x60;
    /// Last index of the PCXT1 range.
    pub const PCXT1_END: u16 = 0x7f;
    /// DTB tag 1.
    pub const DTB_TAG1: u16 = 0xa0;
    /// DTB PTE 1.
    pub const DTB_PTE1: u16 = 0xa1;
    /// DTB invalidate-all-process.
    pub const DTB_IAP: u16 = 0xa2;
    /// DTB invalidate-all.
    pub const DTB_IA: u16 = 0xa3;
    /// DTB invalidate-single 1.
    pub const DTB_IS1: u16 = 0xa4;
    /// DTB ASN 1.
    pub const DTB_ASN1: u16 = 0xa5;
    /// Cycle counter.
    pub const CC: u16 = 0xc0;
    /// Cycle counter control.
    pub const CC_CTL: u16 = 0xc1;
    /// Faulting virtual address.
    pub const VA: u16 = 0xc2;
    /// Formatted faulting VA.
    pub const VA_FORM: u16 = 0xc3;
    /// VA format control.
    pub const VA_CTL: u16 = 0xc4;
}

/// The box whose lock guards an IPR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IprBank {
    /// Instruction-issue box.
    Ibox,
    /// Memory box.
    Mbox,
    /// Integer execution box.
    Ebox,
    /// Cache/bus box.
    Cbox,
}

/// Selects the owning bank from an IPR index.
pub fn bank_for(idx: u16) -> IprBank {
    use index::{
        CC, DC_STAT, DTB_ASN1, DTB_TAG0, DTB_TAG1, ITB_TAG, PCXT0, PCXT1_END, SLEEP, VA_CTL,
    };
    if (ITB_TAG..=SLEEP).contains(&idx) || (PCXT0..=PCXT1_END).contains(&idx) {
        IprBank::Ibox
    } else if (DTB_TAG0..=DC_STAT).contains(&idx) || (DTB_TAG1..=DTB_ASN1).contains(&idx) {
        IprBank::Mbox
    } else if (CC..=VA_CTL).contains(&idx) {
        IprBank::Ebox
    } else {
        IprBank::Cbox
    }
}

macro_rules! bit_field {
    ($get:ident, $set:ident, $shift:expr, $width:expr, $ty:ty) => {
        /// Reads the field.
        #[inline]
        pub const fn $get(self) -> $ty {
            ((self.0 >> $shift) & ((1u64 << $width) - 1)) as $ty
        }

        /// Writes the field.
        #[inline]
        pub fn $set(&mut self, value: $ty) {
            let mask = ((1u64 << $width) - 1) << $shift;
            self.0 = (self.0 & !mask) | ((value as u64) << $shift & mask);
        }
    };
}

macro_rules! flag_field {
    ($get:ident, $set:ident, $bit:expr) => {
        /// Reads the flag.
        #[inline]
        pub const fn $get(self) -> bool {
            self.0 >> $bit & 1 != 0
        }

        /// Writes the flag.
        #[inline]
        pub fn $set(&mut self, value: bool) {
            if value {
                self.0 |= 1 << $bit;
            } else {
                self.0 &= !(1 << $bit);
            }
        }
    };
}

/// EXC_SUM: which exception fired and for which register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExcSum(pub u64);

impl ExcSum {
    flag_field!(swc, set_swc, 0);
    flag_field!(inv, set_inv_flag, 1);
    flag_field!(dze, set_dze_flag, 2);
    flag_field!(ovf, set_ovf_flag, 3);
    flag_field!(unf, set_unf_flag, 4);
    flag_field!(ine, set_ine_flag, 5);
    flag_field!(iov, set_iov_flag, 6);
    flag_field!(int, set_int_flag, 7);
    bit_field!(reg, set_reg, 8, 5, u8);
    flag_field!(bad_iva, set_bad_iva, 13);
    flag_field!(pc_ovfl, set_pc_ovfl, 14);
    flag_field!(set_iov, set_set_iov, 47);
    bit_field!(sext_set_iov, set_sext_set_iov, 48, 16, u16);
}

/// MM_STAT: details of the most recent memory-management fault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MmStat(pub u64);

impl MmStat {
    flag_field!(wr, set_wr, 0);
    flag_field!(acv, set_acv, 1);
    flag_field!(fault_on_read, set_fault_on_read, 2);
    flag_field!(fault_on_write, set_fault_on_write, 3);
    bit_field!(opcodes, set_opcodes, 4, 6, u8);
    flag_field!(dc_tag_perr, set_dc_tag_perr, 10);
}

/// IER_CM: interrupt enables plus the current processor mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IerCm(pub u64);

impl IerCm {
    bit_field!(cm, set_cm, 3, 2, u8);
    flag_field!(asten, set_asten, 13);
    bit_field!(sien, set_sien, 14, 8, u8);
    bit_field!(pcen, set_pcen, 22, 2, u8);
    flag_field!(cren, set_cren, 24);
    flag_field!(slen, set_slen, 25);
    bit_field!(eien, set_eien, 26, 6, u8);
}

/// ISUM: pending interrupt summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ISum(pub u64);

impl ISum {
    flag_field!(astk, set_astk, 0);
    flag_field!(aste, set_aste, 1);
    flag_field!(asts, set_asts, 2);
    flag_field!(astu, set_astu, 3);
    bit_field!(si, set_si, 4, 15, u16);
    bit_field!(pc, set_pc, 19, 2, u8);
    flag_field!(cr, set_cr, 21);
    flag_field!(sl, set_sl, 22);
    bit_field!(ei, set_ei, 23, 6, u8);
}

/// I_CTL: Ibox control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ICtl(pub u64);

impl ICtl {
    flag_field!(spce, set_spce, 0);
    bit_field!(ic_en, set_ic_en, 1, 2, u8);
    bit_field!(spe, set_spe, 3, 3, u8);
    bit_field!(sde, set_sde, 6, 2, u8);
    bit_field!(sbe, set_sbe, 8, 2, u8);
    bit_field!(bp_mode, set_bp_mode, 10, 2, u8);
    flag_field!(hwe, set_hwe, 12);
    flag_field!(sl_xmit, set_sl_xmit, 13);
    flag_field!(sl_rcv, set_sl_rcv, 14);
    flag_field!(va_48, set_va_48, 15);
    flag_field!(va_form_32, set_va_form_32, 16);
    flag_field!(single_issue_h, set_single_issue_h, 17);
    flag_field!(pct0_en, set_pct0_en, 18);
    flag_field!(pct1_en, set_pct1_en, 19);
    flag_field!(call_pal_r23, set_call_pal_r23, 20);
    flag_field!(mchk_en, set_mchk_en, 21);
    flag_field!(tb_mb_en, set_tb_mb_en, 22);
    flag_field!(bist_fail, set_bist_fail, 23);
    bit_field!(chip_id, set_chip_id, 24, 6, u8);
    bit_field!(vptb, set_vptb, 30, 18, u32);
}

/// ITB_TAG: latched virtual address for the next ITB fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItbTag(pub u64);

impl ItbTag {
    /// The page-portion of the latched VA (bits [47:13]).
    #[inline]
    pub const fn va(self) -> u64 {
        self.0 & 0xffff_ffff_ffff_e000
    }
}

/// ITB_PTE: the page-table entry committed into the ITB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItbPte(pub u64);

impl ItbPte {
    flag_field!(asm_, set_asm, 4);
    bit_field!(gh, set_gh, 5, 2, u8);
    flag_field!(kre, set_kre, 8);
    flag_field!(ere, set_ere, 9);
    flag_field!(sre, set_sre, 10);
    flag_field!(ure, set_ure, 11);
    bit_field!(pfn, set_pfn, 13, 32, u64);

    /// The four read-enable bits packed kernel-first.
    pub const fn access(self) -> u8 {
        (self.kre() as u8)
            | (self.ere() as u8) << 1
            | (self.sre() as u8) << 2
            | (self.ure() as u8) << 3
    }
}

/// PCTX: process context (ASN and per-process enables).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pctx(pub u64);

impl Pctx {
    flag_field!(ppce, set_ppce, 1);
    flag_field!(fpe, set_fpe, 2);
    bit_field!(aster, set_aster, 5, 4, u8);
    bit_field!(astrr, set_astrr, 9, 4, u8);
    bit_field!(asn, set_asn, 39, 8, u8);
}

/// I_STAT: Ibox parity status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IStat(pub u64);

impl IStat {
    flag_field!(tpe, set_tpe, 29);
    flag_field!(dpe, set_dpe, 30);
}

/// Registers owned by the Ibox.
#[derive(Debug, Clone, Default)]
pub struct IboxIprs {
    /// Latched ITB tag.
    pub itb_tag: ItbTag,
    /// Latched ITB PTE.
    pub itb_pte: ItbPte,
    /// ITB invalidate-single latch.
    pub itb_is: u64,
    /// Exception address.
    pub exc_addr: u64,
    /// Formatted faulting VA.
    pub iva_form: u64,
    /// Interrupt enables + current mode.
    pub ier_cm: IerCm,
    /// Software interrupt requests.
    pub sirr: u64,
    /// Interrupt summary.
    pub isum: ISum,
    /// Hardware interrupt clear.
    pub hw_int_clr: u64,
    /// Exception summary.
    pub exc_sum: ExcSum,
    /// PAL base address.
    pub pal_base: u64,
    /// Ibox control.
    pub i_ctl: ICtl,
    /// Performance counter control.
    pub pctr_ctl: u64,
    /// Ibox status.
    pub i_stat: IStat,
    /// Process context.
    pub pctx: Pctx,
}

impl IboxIprs {
    /// Reset values: I-cache enabled both ways, FP enabled, rest zero.
    pub fn reset() -> Self {
        let mut iprs = Self::default();
        iprs.i_ctl.set_ic_en(3);
        iprs.pctx.set_fpe(true);
        iprs
    }
}

/// Registers owned by the Mbox.
#[derive(Debug, Clone, Copy, Default)]
pub struct MboxIprs {
    /// Memory-management fault status.
    pub mm_stat: MmStat,
    /// Dcache control.
    pub dc_ctl: u64,
    /// Dcache status.
    pub dc_stat: u64,
    /// DTB alternate mode.
    pub dtb_altmode: u64,
    /// Mbox control.
    pub m_ctl: u64,
}

/// Registers owned by the Ebox.
#[derive(Debug, Clone, Copy, Default)]
pub struct EboxIprs {
    /// Cycle counter.
    pub cc: u64,
    /// Cycle counter control.
    pub cc_ctl: u64,
    /// Faulting virtual address.
    pub va: u64,
    /// Formatted faulting VA.
    pub va_form: u64,
    /// VA format control.
    pub va_ctl: u64,
}

/// Registers owned by the Cbox.
#[derive(Debug, Clone, Copy, Default)]
pub struct CboxIprs {
    /// Cbox data port.
    pub c_data: u64,
    /// Cbox shift control.
    pub c_shft: u64,
}

/// All four IPR banks.
#[derive(Debug, Clone, Default)]
pub struct IprFile {
    /// Ibox bank.
    pub ibox: IboxIprs,
    /// Mbox bank.
    pub mbox: MboxIprs,
    /// Ebox bank.
    pub ebox: EboxIprs,
    /// Cbox bank.
    pub cbox: CboxIprs,
}

impl IprFile {
    /// All banks at their reset values.
    pub fn reset() -> Self {
        Self { ibox: IboxIprs::reset(), ..Self::default() }
    }
}
