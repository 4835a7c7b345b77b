//! Deterministic fingerprints for datasets.

/// 64-bit FNV-1a hash used to identify a dataset's exact bytes in logs.
#[derive(Copy, Clone, Debug)]
pub struct Fnv64(u64);

impl Fnv64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    pub fn new() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    /// Feed bytes into the hash function.
    pub fn update(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 ^ u64::from(*b)).wrapping_mul(Self::PRIME);
        }
    }

    pub fn finish(&self) -> u64 {
        self.0
    }

    /// 16-character lowercase hex rendering.
    pub fn finish_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

impl Default for Fnv64 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_vectors() {
        assert_eq!(Fnv64::new().finish(), 0xcbf2_9ce4_8422_2325);

        let mut h = Fnv64::new();
        h.update(b"a");
        assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);

        let mut h = Fnv64::new();
        h.update(b"foobar");
        assert_eq!(h.finish_hex(), "85944171f73967e8");
    }

    #[test]
    fn incremental_updates_equal_single_update() {
        let mut split = Fnv64::new();
        split.update(b"Gender,AFP,");
        split.update(b"Class\n");
        let mut whole = Fnv64::new();
        whole.update(b"Gender,AFP,Class\n");
        assert_eq!(split.finish(), whole.finish());
    }
}
