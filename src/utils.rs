const SEED_XOR: u128 = 0b10101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010101010;
pub fn stable_hash_seed(s: &str) -> [u8; 16] {
    let mut val = 17u128;
    for byte in s.as_bytes() {
        val = 31u128.wrapping_mul(val).wrapping_add(*byte as u128);
        val ^= SEED_XOR;
    }
    val.to_le_bytes()
}
