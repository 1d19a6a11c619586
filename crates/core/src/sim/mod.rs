//! Simulation assembly: collaborator ports and the threaded CPU.

/// Threaded CPU assembly and lifecycle.
pub mod cpu;

/// Collaborator traits (Mbox, Cbox) and recording stubs.
pub mod ports;

pub use cpu::{Cpu, CpuState, QueueSide};
pub use ports::{CachePort, MafKind, MemoryPort};
