use crate::classify::MissKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
    pub compulsory: u64,
    pub conflict: u64,
    pub capacity: u64,
    pub occupied: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.accesses += 1;
        self.hits += 1;
    }

    pub fn record_miss(&mut self, kind: MissKind) {
        self.accesses += 1;
        self.misses += 1;
        match kind {
            MissKind::Compulsory => self.compulsory += 1,
            MissKind::Conflict => self.conflict += 1,
            MissKind::Capacity => self.capacity += 1,
        }
    }

    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }

    /// Share of all misses that were of `kind`.
    pub fn miss_kind_rate(&self, kind: MissKind) -> f64 {
        if self.misses == 0 {
            return 0.0;
        }
        let count = match kind {
            MissKind::Compulsory => self.compulsory,
            MissKind::Conflict => self.conflict,
            MissKind::Capacity => self.capacity,
        };
        count as f64 / self.misses as f64
    }
}
