use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicy {
    Lru,
    Random,
}

impl FromStr for ReplacementPolicy {
    type Err = anyhow::Error;

    // Only the first letter matters, so "L", "lru" and "LRU" are all accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('L') => Ok(ReplacementPolicy::Lru),
            Some('R') => Ok(ReplacementPolicy::Random),
            _ => bail!("unknown replacement policy '{s}' (expected L or R)"),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementPolicy::Lru => write!(f, "LRU"),
            ReplacementPolicy::Random => write!(f, "Random"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub nsets: u32,
    pub bsize: u32, // in Bytes
    pub assoc: u32, // set to 1 for Direct-Mapped
    pub policy: ReplacementPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            nsets: 256,
            bsize: 64,
            assoc: 4,
            policy: ReplacementPolicy::Lru,
        }
    }
}

impl CacheConfig {
    /// Rejects any geometry that is not made of powers of two.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("nsets", self.nsets),
            ("bsize", self.bsize),
            ("assoc", self.assoc),
        ] {
            if !value.is_power_of_two() {
                bail!("{name} must be a power of two, got {value}");
            }
        }
        Ok(())
    }

    pub fn total_slots(&self) -> u64 {
        self.nsets as u64 * self.assoc as u64
    }

    pub fn decoder(&self) -> AddressDecoder {
        AddressDecoder::new(self.bsize, self.nsets)
    }
}

/// Splits 32-bit addresses into set index and tag.
#[derive(Debug, Clone, Copy)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
    index_mask: u32,
}

impl AddressDecoder {
    pub fn new(bsize: u32, nsets: u32) -> Self {
        Self {
            offset_bits: bsize.trailing_zeros(),
            index_bits: nsets.trailing_zeros(),
            index_mask: nsets - 1,
        }
    }

    pub fn decode(&self, address: u32) -> (u32, u32) {
        let index = (address >> self.offset_bits) & self.index_mask;
        // checked_shr keeps a 32-bit wide offset+index from overflowing the shift
        let tag = address
            .checked_shr(self.offset_bits + self.index_bits)
            .unwrap_or(0);
        (index, tag)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: u32,
    pub last_used: u64,
}

pub struct CacheSet {
    lines: Vec<CacheLine>,
}

impl CacheSet {
    fn new(ways: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); ways],
        }
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    fn find_line(&self, tag: u32) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    pub fn free_way(&self) -> Option<usize> {
        self.lines.iter().position(|line| !line.valid)
    }
}

pub struct Cache {
    sets: Vec<CacheSet>,
    occupied: u64,
    capacity: u64,
}

impl Cache {
    pub fn new(config: &CacheConfig) -> Self {
        let sets = (0..config.nsets)
            .map(|_| CacheSet::new(config.assoc as usize))
            .collect();
        Self {
            sets,
            occupied: 0,
            capacity: config.total_slots(),
        }
    }

    pub fn set(&self, index: u32) -> &CacheSet {
        &self.sets[index as usize]
    }

    pub fn lookup(&self, index: u32, tag: u32) -> Option<usize> {
        self.set(index).find_line(tag)
    }

    pub fn has_free_slot(&self, index: u32) -> bool {
        self.set(index).free_way().is_some()
    }

    pub fn is_globally_full(&self) -> bool {
        self.occupied == self.capacity
    }

    pub fn occupied(&self) -> u64 {
        self.occupied
    }

    /// Fills `way` of set `index`, returning the tag it held if the slot was
    /// already in use.
    pub fn install(&mut self, index: u32, way: usize, tag: u32, tick: u64) -> Option<u32> {
        let line = &mut self.sets[index as usize].lines[way];
        let evicted = line.valid.then_some(line.tag);
        if !line.valid {
            self.occupied += 1;
        }
        line.valid = true;
        line.tag = tag;
        line.last_used = tick;
        evicted
    }

    pub fn touch(&mut self, index: u32, way: usize, tick: u64) {
        self.sets[index as usize].lines[way].last_used = tick;
    }
}
