use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::{BcsvError, Result};

/// Marker carried by names whose 32-bit value is a hash of a C string
pub const CSTRING_REF_MARKER: &str = ".hshCstringRef";

/// Marker carried by names whose 32-bit value is a hash reference
pub const HASH_REF_MARKER: &str = ".HashRef";

/// Wordlist embedded in the crate, one candidate name per line
const BUNDLED_WORDLIST: &str = include_str!("../assets/hashes.txt");

/// CRC-32 (IEEE, reflected) of a name's UTF-8 bytes
///
/// # Arguments
/// - `name` - The text to hash
///
/// # Returns
/// A 32-bit hash value
pub fn crc32(name: &str) -> u32 {
    crc32fast::hash(name.as_bytes())
}

/// 32-bit MurmurHash3 (x86_32 flavor) of a name's UTF-8 bytes with seed 0
pub fn murmur3_32(name: &str) -> u32 {
    murmur3_32_with_seed(name.as_bytes(), 0)
}

/// MurmurHash3 x86_32 over raw bytes
pub fn murmur3_32_with_seed(data: &[u8], seed: u32) -> u32 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut h = seed;
    let mut chunks = data.chunks_exact(4);

    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);

        h ^= k;
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k |= (byte as u32) << (8 * i);
        }
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
    }

    h ^= data.len() as u32;

    // fmix32
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Hash functions used to name BCSV columns and values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Crc32,
    Murmur3,
}

impl HashAlgorithm {
    /// Calculate hash using this algorithm
    ///
    /// # Arguments
    /// - `name` - The text to hash
    ///
    /// # Returns
    /// The calculated hash value base of the hash algorithm
    pub fn calc(&self, name: &str) -> u32 {
        match self {
            HashAlgorithm::Crc32 => crc32(name),
            HashAlgorithm::Murmur3 => murmur3_32(name),
        }
    }
}

/// What a dictionary word says about the value stored under it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Ordinary name, no hint about the stored value
    Plain,
    /// Name carries the `.hshCstringRef` marker
    CStringRef,
    /// Name carries the `.HashRef` marker
    HashRef,
    /// The type part of the word mentions `string`
    StringTyped,
}

impl EntryKind {
    fn classify(name: &str, word: &str) -> Self {
        if name.contains(CSTRING_REF_MARKER) {
            EntryKind::CStringRef
        } else if name.contains(HASH_REF_MARKER) {
            EntryKind::HashRef
        } else if word.contains("string") {
            EntryKind::StringTyped
        } else {
            EntryKind::Plain
        }
    }

    /// True when a 4-byte value under this name should be shown as a string hash
    pub fn is_string_reference(&self) -> bool {
        !matches!(self, EntryKind::Plain)
    }
}

/// One known word from a wordlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    word: String,
    name: String,
    kind: EntryKind,
}

impl DictEntry {
    fn new(word: &str) -> Self {
        let name = word.split(' ').next().unwrap_or_default();
        Self {
            word: word.to_string(),
            kind: EntryKind::classify(name, word),
            name: name.replace(CSTRING_REF_MARKER, ""),
        }
    }

    /// The full word as it appears in the wordlist
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Column name: text before the first space, without the C string marker
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }
}

/// A successful hash lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub entry: &'a DictEntry,
    pub via: HashAlgorithm,
}

/// Immutable `hash -> word` mappings for both hash algorithms
///
/// Build it once, then share it by reference between decodes. The first word
/// producing a given digest wins; later duplicates are dropped.
#[derive(Debug, Clone, Default)]
pub struct HashDictionary {
    entries: Vec<DictEntry>,
    crc32: HashMap<u32, usize>,
    murmur3: HashMap<u32, usize>,
}

impl HashDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dictionary from the wordlist embedded in the crate
    pub fn bundled() -> Self {
        let mut dict = Self::new();
        dict.extend_from_wordlist(BUNDLED_WORDLIST);
        debug!(
            words = dict.len(),
            crc32 = dict.crc32.len(),
            murmur3 = dict.murmur3.len(),
            "built bundled hash dictionary"
        );
        dict
    }

    /// Process-wide bundled dictionary, built on first use
    pub fn shared() -> &'static HashDictionary {
        static SHARED: OnceLock<HashDictionary> = OnceLock::new();
        SHARED.get_or_init(HashDictionary::bundled)
    }

    /// Create a dictionary from an iterator of words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self::new();
        for word in words {
            dict.add(word.as_ref());
        }
        dict
    }

    /// Create a dictionary from the text of a newline-delimited wordlist
    pub fn from_wordlist(text: &str) -> Self {
        let mut dict = Self::new();
        dict.extend_from_wordlist(text);
        dict
    }

    /// Create a dictionary from a wordlist file
    ///
    /// The lookup file should contain one word per line
    /// Lines starting with '#' are treated as comments
    ///
    /// # Arguments
    /// - `path` - The path to the wordlist
    ///
    /// # Errors
    /// - If the file cannot be opened, a `BcsvError::LookupFileNotFound` error is returned with the file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut dict = Self::new();
        dict.extend_from_file(path)?;
        Ok(dict)
    }

    /// Add every word of a newline-delimited wordlist
    pub fn extend_from_wordlist(&mut self, text: &str) {
        for line in text.split('\n') {
            if let Some(word) = wordlist_line(line) {
                self.add(word);
            }
        }
    }

    /// Add every word of a wordlist file
    pub fn extend_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|_| BcsvError::LookupFileNotFound(path.display().to_string()))?;

        let before = self.len();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if let Some(word) = wordlist_line(&line) {
                self.add(word);
            }
        }

        debug!(path = %path.display(), added = self.len() - before, "loaded wordlist");
        Ok(())
    }

    /// Add a word and return its `(crc32, murmur3)` digests
    ///
    /// Digests already present keep their first word.
    pub fn add(&mut self, word: &str) -> (u32, u32) {
        let crc = crc32(word);
        let mm3 = murmur3_32(word);

        let new_crc = !self.crc32.contains_key(&crc);
        let new_mm3 = !self.murmur3.contains_key(&mm3);

        if new_crc || new_mm3 {
            let index = self.entries.len();
            self.entries.push(DictEntry::new(word));
            if new_crc {
                self.crc32.insert(crc, index);
            }
            if new_mm3 {
                self.murmur3.insert(mm3, index);
            }
        }

        (crc, mm3)
    }

    /// Look a hash up in a single mapping. `0` never resolves.
    pub fn lookup(&self, algorithm: HashAlgorithm, hash: u32) -> Option<&DictEntry> {
        if hash == 0 {
            return None;
        }

        let index = match algorithm {
            HashAlgorithm::Crc32 => self.crc32.get(&hash),
            HashAlgorithm::Murmur3 => self.murmur3.get(&hash),
        }?;

        self.entries.get(*index)
    }

    /// Resolve a hash, trying CRC-32 first and MurmurHash3 second
    pub fn resolve(&self, hash: u32) -> Option<Resolved<'_>> {
        [HashAlgorithm::Crc32, HashAlgorithm::Murmur3]
            .into_iter()
            .find_map(|via| self.lookup(via, hash).map(|entry| Resolved { entry, via }))
    }

    /// Column name for a hash, or the hash as lowercase hex if unknown
    pub fn field_name(&self, hash: u32) -> String {
        self.resolve(hash)
            .map(|r| r.entry.name().to_string())
            .unwrap_or_else(|| format!("{:x}", hash))
    }

    /// Number of distinct words kept
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn wordlist_line(line: &str) -> Option<&str> {
    let word = line.strip_suffix('\r').unwrap_or(line);
    if word.is_empty() || word.starts_with('#') {
        None
    } else {
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32() {
        assert_eq!(crc32("123456789"), 0xCBF43926);
        assert_eq!(crc32(""), 0);
    }

    #[test]
    fn test_murmur3() {
        assert_eq!(murmur3_32(""), 0);
        assert_eq!(murmur3_32_with_seed(b"", 1), 0x514E28B7);
        assert_eq!(murmur3_32("hello"), 0x248BFA47);
        assert_eq!(HashAlgorithm::Murmur3.calc("hello"), 0x248BFA47);
    }

    #[test]
    fn test_resolve_prefers_crc32() {
        let dict = HashDictionary::from_words(["ItemName string64"]);

        let by_crc = dict.resolve(crc32("ItemName string64")).unwrap();
        assert_eq!(by_crc.via, HashAlgorithm::Crc32);
        assert_eq!(by_crc.entry.name(), "ItemName");
        assert_eq!(by_crc.entry.word(), "ItemName string64");

        let by_mm3 = dict.resolve(murmur3_32("ItemName string64")).unwrap();
        assert_eq!(by_mm3.via, HashAlgorithm::Murmur3);
    }

    #[test]
    fn test_zero_never_resolves() {
        // Both digests of the empty string are zero
        let dict = HashDictionary::from_words([""]);
        assert!(dict.resolve(0).is_none());
        assert_eq!(dict.field_name(0), "0");
    }

    #[test]
    fn test_first_word_wins() {
        let mut dict = HashDictionary::new();
        let (crc, _) = dict.add("Label string32");
        dict.add("Label string32");
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.lookup(HashAlgorithm::Crc32, crc).unwrap().word(), "Label string32");
    }

    #[test]
    fn test_entry_kinds() {
        let dict = HashDictionary::from_words([
            "ItemKind.hshCstringRef u32",
            "Target.HashRef u32",
            "Label string32",
            "Price s32",
        ]);

        let kind = |w: &str| dict.resolve(crc32(w)).unwrap().entry.kind();
        assert_eq!(kind("ItemKind.hshCstringRef u32"), EntryKind::CStringRef);
        assert_eq!(kind("Target.HashRef u32"), EntryKind::HashRef);
        assert_eq!(kind("Label string32"), EntryKind::StringTyped);
        assert_eq!(kind("Price s32"), EntryKind::Plain);

        // The C string marker never shows up in a column name
        assert_eq!(dict.field_name(crc32("ItemKind.hshCstringRef u32")), "ItemKind");
        assert_eq!(dict.field_name(crc32("Target.HashRef u32")), "Target.HashRef");
    }

    #[test]
    fn test_wordlist_parsing() {
        let dict = HashDictionary::from_wordlist("# comment\r\nAlpha u8\r\n\r\nBeta u16\n");
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.field_name(crc32("Alpha u8")), "Alpha");
        assert_eq!(dict.field_name(0xDEADBEEF), "deadbeef");
    }

    #[test]
    fn test_wordlist_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.txt");
        std::fs::write(&path, "Extra u8\nUniqueID u16\n").unwrap();

        let mut dict = HashDictionary::bundled();
        let before = dict.len();
        dict.extend_from_file(&path).unwrap();
        assert_eq!(dict.len(), before + 1);
        assert_eq!(dict.field_name(crc32("Extra u8")), "Extra");

        let loaded = HashDictionary::from_file(&path).unwrap();
        assert_eq!(loaded.len(), 2);

        assert!(matches!(
            HashDictionary::from_file(dir.path().join("missing.txt")),
            Err(BcsvError::LookupFileNotFound(_))
        ));
    }

    #[test]
    fn test_shared_is_built_once() {
        let a = HashDictionary::shared();
        let b = HashDictionary::shared();
        assert!(std::ptr::eq(a, b));
        assert!(!a.is_empty());

        let hash = crc32("UniqueID u16");
        assert_eq!(a.field_name(hash), b.field_name(hash));
        assert_eq!(a.field_name(hash), HashDictionary::bundled().field_name(hash));
    }
}
