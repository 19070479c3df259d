//! Linear-time exact byte search (Knuth-Morris-Pratt).
//!
//! The failure table uses the `next` convention: `table[0] == -1` and
//! `table[q]` is the length of the longest proper prefix of `pattern[..q]`
//! that is also a suffix of it.

/// Build the failure table for `pattern`.
///
/// For case-insensitive search, build it from the lower-cased pattern.
pub fn failure_table(pattern: &[u8]) -> Vec<i32> {
    let mut table = vec![0i32; pattern.len()];
    let Some(first) = table.first_mut() else {
        return table;
    };
    *first = -1;

    let mut j = 0usize;
    let mut k = -1i32;
    while j + 1 < pattern.len() {
        if k == -1 || pattern[j] == pattern[k as usize] {
            j += 1;
            k += 1;
            table[j] = k;
        } else {
            k = table[k as usize];
        }
    }
    table
}

/// Index of the first occurrence of `pattern` in `haystack`.
pub fn search(haystack: &[u8], pattern: &[u8], table: &[i32]) -> Option<usize> {
    search_by(haystack, pattern, table, |h, p| h == p)
}

/// Like [`search`], with ASCII upper case in the haystack folded to match a
/// pattern that is already lower case.
pub fn search_case_insensitive(
    haystack: &[u8],
    lower_pattern: &[u8],
    table: &[i32],
) -> Option<usize> {
    search_by(haystack, lower_pattern, table, |h, p| {
        h == p || h.to_ascii_lowercase() == p
    })
}

fn search_by(
    haystack: &[u8],
    pattern: &[u8],
    table: &[i32],
    eq: impl Fn(u8, u8) -> bool,
) -> Option<usize> {
    if pattern.is_empty() {
        return Some(0);
    }
    debug_assert_eq!(table.len(), pattern.len());

    let mut i = 0usize;
    let mut j = 0i32;
    while i < haystack.len() {
        if j == -1 || eq(haystack[i], pattern[j as usize]) {
            i += 1;
            j += 1;
            if j as usize == pattern.len() {
                return Some(i - pattern.len());
            }
        } else {
            j = table[j as usize];
        }
    }
    None
}

/// A search pattern with its failure table, ready to run over many buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    bytes: Vec<u8>,
    table: Vec<i32>,
    case_sensitive: bool,
}

impl Pattern {
    pub fn new(bytes: &[u8], case_sensitive: bool) -> Self {
        let bytes = if case_sensitive {
            bytes.to_vec()
        } else {
            bytes.to_ascii_lowercase()
        };
        let table = failure_table(&bytes);
        Self {
            bytes,
            table,
            case_sensitive,
        }
    }

    /// Parse whitespace separated hex byte pairs such as `"de ad be ef"`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.is_empty() || digits.len() % 2 != 0 {
            return None;
        }
        let bytes = digits
            .chunks(2)
            .map(|pair| {
                let hi = pair[0].to_digit(16)?;
                let lo = pair[1].to_digit(16)?;
                Some((hi * 16 + lo) as u8)
            })
            .collect::<Option<Vec<u8>>>()?;
        Some(Self::new(&bytes, true))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn find_in(&self, haystack: &[u8]) -> Option<usize> {
        if self.case_sensitive {
            search(haystack, &self.bytes, &self.table)
        } else {
            search_case_insensitive(haystack, &self.bytes, &self.table)
        }
    }
}
