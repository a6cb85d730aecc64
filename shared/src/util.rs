/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// IDs for rows created together in one request.
///
/// Starts at one [`snowflake_id`] and counts up, so rows of the same batch
/// never share an ID even when they are built within one millisecond.
#[derive(Debug)]
pub struct SnowflakeBatch {
    next: i64,
}

impl SnowflakeBatch {
    pub fn new() -> Self {
        Self {
            next: snowflake_id(),
        }
    }

    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for SnowflakeBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Minutes to milliseconds
pub const fn minutes_to_millis(minutes: i64) -> i64 {
    minutes * 60_000
}
