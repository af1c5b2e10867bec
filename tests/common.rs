/// Deterministic skewed bytes: low values are far more frequent than high ones.
pub fn skewed_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let r = (state >> 33) as u32;
            ((r % 256) * ((r >> 8) % 256) / 256) as u8
        })
        .collect()
}
