// Keyboard Layout Module
// QWERTY neighbour table used to pick believable typos.

use crate::random::RandomSource;

/// Keys physically adjacent to `key` on a US QWERTY layout (lowercase only)
pub fn qwerty_neighbors(key: char) -> &'static [char] {
    match key {
        'q' => &['w', 'a'],
        'w' => &['q', 'e', 's', 'a'],
        'e' => &['w', 'r', 'd', 's'],
        'r' => &['e', 't', 'f', 'd'],
        't' => &['r', 'y', 'g', 'f'],
        'y' => &['t', 'u', 'h', 'g'],
        'u' => &['y', 'i', 'j', 'h'],
        'i' => &['u', 'o', 'k', 'j'],
        'o' => &['i', 'p', 'l', 'k'],
        'p' => &['o', 'l'],
        'a' => &['q', 'w', 's', 'z'],
        's' => &['a', 'w', 'e', 'd', 'x', 'z'],
        'd' => &['s', 'e', 'r', 'f', 'c', 'x'],
        'f' => &['d', 'r', 't', 'g', 'v', 'c'],
        'g' => &['f', 't', 'y', 'h', 'b', 'v'],
        'h' => &['g', 'y', 'u', 'j', 'n', 'b'],
        'j' => &['h', 'u', 'i', 'k', 'm', 'n'],
        'k' => &['j', 'i', 'o', 'l', 'm'],
        'l' => &['k', 'o', 'p'],
        'z' => &['a', 's', 'x'],
        'x' => &['z', 's', 'd', 'c'],
        'c' => &['x', 'd', 'f', 'v'],
        'v' => &['c', 'f', 'g', 'b'],
        'b' => &['v', 'g', 'h', 'n'],
        'n' => &['b', 'h', 'j', 'm'],
        'm' => &['n', 'j', 'k'],
        _ => &[],
    }
}

/// Pick a neighbouring key for `c`, keeping its case.
///
/// Returns `None` for characters with no entry in the table (digits, punctuation, whitespace).
pub fn nearby_key<R: RandomSource + ?Sized>(c: char, rng: &mut R) -> Option<char> {
    let neighbors = qwerty_neighbors(c.to_ascii_lowercase());
    if neighbors.is_empty() {
        return None;
    }
    let idx = ((rng.next() * neighbors.len() as f64) as usize).min(neighbors.len() - 1);
    let key = neighbors[idx];
    Some(if c.is_ascii_uppercase() {
        key.to_ascii_uppercase()
    } else {
        key
    })
}
