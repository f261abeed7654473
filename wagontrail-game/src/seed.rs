//! Reversible share codes for replaying a journey.
//! Code format: `<DIFF>-<WORD><NN>`, e.g. `PI-PRAIRIE42`, `TB-BISON07`.

use crate::state::Difficulty;

pub const WORD_LIST: [&str; 64] = [
    "PRAIRIE", "BISON", "WAGON", "OXEN", "CANVAS", "AXLE", "YOKE", "SADDLE", "RIVER", "FERRY",
    "FORD", "CREEK", "BLUFF", "MESA", "CANYON", "RIDGE", "SUMMIT", "PASS", "SAGE", "CEDAR",
    "WILLOW", "ASPEN", "PINE", "CLOVER", "ANTELOPE", "COYOTE", "EAGLE", "HAWK", "RABBIT", "ELK",
    "BEAVER", "OTTER", "LANTERN", "KETTLE", "SKILLET", "BACON", "FLOUR", "COFFEE", "BEANS",
    "BISCUIT", "RIFLE", "POWDER", "COMPASS", "MAP", "JOURNAL", "QUILT", "BONNET", "BOOTS",
    "HARNESS", "WHEEL", "SPOKE", "TONGUE", "TRAIL", "RUTS", "DUST", "THUNDER", "SUNRISE",
    "DUSK", "CAMPFIRE", "FIDDLE", "HOMESTEAD", "OREGON", "FRONTIER", "PIONEER",
];

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Low 16 bits of a seed: 6 bits of word index, 7 bits of number.
const fn pack(word_index: u16, number: u8) -> u16 {
    (word_index & 0x003F) | ((number as u16 & 0x7F) << 6)
}

const fn unpack(packed: u16) -> (usize, u8) {
    ((packed & 0x003F) as usize, ((packed >> 6) & 0x7F) as u8)
}

fn compose_seed(difficulty: Difficulty, word_index: u16, number: u8) -> u64 {
    let packed = pack(word_index, number);
    let mut buf = [0_u8; 12];
    buf[..7].copy_from_slice(b"WAGON::");
    buf[7..9].copy_from_slice(difficulty.code().as_bytes());
    buf[9..11].copy_from_slice(&packed.to_le_bytes());
    buf[11] = 0x5A;
    (fnv1a64(&buf) & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render the share code for `seed`. Only the low 16 bits are encoded, so
/// arbitrary seeds map onto the code space; decoded seeds round-trip exactly.
#[must_use]
pub fn encode(difficulty: Difficulty, seed: u64) -> String {
    let (word_index, number) = unpack((seed & 0xFFFF) as u16);
    let word = WORD_LIST.get(word_index).copied().unwrap_or(WORD_LIST[0]);
    format!("{}-{word}{:02}", difficulty.code(), number % 100)
}

/// Parse a share code back into its difficulty and seed.
#[must_use]
pub fn decode(code: &str) -> Option<(Difficulty, u64)> {
    let (prefix, rest) = code.trim().split_once('-')?;
    let difficulty = Difficulty::from_code(prefix)?;
    if rest.len() < 3 || !rest.is_char_boundary(rest.len() - 2) {
        return None;
    }
    let (word_part, number_part) = rest.split_at(rest.len() - 2);
    if !number_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number: u8 = number_part.parse().ok()?;
    let word = normalize_word(word_part);
    let index = WORD_LIST.iter().position(|w| *w == word)?;
    let word_index = u16::try_from(index).ok()?;
    Some((difficulty, compose_seed(difficulty, word_index, number)))
}

/// Mint a fresh code (and its seed) from arbitrary entropy.
#[must_use]
pub fn code_from_entropy(difficulty: Difficulty, entropy: u64) -> (String, u64) {
    let word_index = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let number = u8::try_from((entropy >> 17) % 100).unwrap_or(0);
    let seed = compose_seed(difficulty, word_index, number);
    (encode(difficulty, seed), seed)
}
