// Core data structures for beamfold

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default train fraction
pub const DEFAULT_TRAIN_RATIO: f64 = 0.7;

/// Default test fraction
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Default number of folds per dataset
pub const DEFAULT_FOLD_COUNT: u32 = 5;

// ============================================================================
// Fold
// ============================================================================

/// Fold identifier
///
/// Seeds the shuffle of a fold and names its output directory. Folds start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Fold(u32);

impl Fold {
    /// Create a fold, rejecting zero
    pub fn new(id: u32) -> Result<Self> {
        if id == 0 {
            return Err(Error::InvalidFold(id.to_string()));
        }
        Ok(Self(id))
    }

    /// Folds `1..=count`
    pub fn range(count: u32) -> impl Iterator<Item = Fold> {
        (1..=count).map(Fold)
    }

    /// Numeric identifier
    pub fn id(&self) -> u32 {
        self.0
    }

    /// Seed for the fold's generator
    pub fn seed(&self) -> u64 {
        u64::from(self.0)
    }
}

impl fmt::Display for Fold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Fold {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id = s
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidFold(s.to_string()))?;
        Self::new(id)
    }
}

// ============================================================================
// Split
// ============================================================================

/// One of the three disjoint subsets of a fold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    Train,
    Test,
    Valid,
}

impl SplitKind {
    /// All splits in slicing order
    pub fn all() -> [Self; 3] {
        [Self::Train, Self::Test, Self::Valid]
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
            Self::Valid => "valid",
        }
    }

    /// Output file name inside a fold directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Train => "train_links",
            Self::Test => "test_links",
            Self::Valid => "valid_links",
        }
    }
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Train and test fractions; valid takes the remainder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: DEFAULT_TRAIN_RATIO,
            test: DEFAULT_TEST_RATIO,
        }
    }
}

impl SplitRatios {
    /// Create validated ratios
    pub fn new(train: f64, test: f64) -> Result<Self> {
        let ratios = Self { train, test };
        ratios.validate()?;
        Ok(ratios)
    }

    /// Check that both fractions lie in `[0, 1]` and leave a non-negative remainder
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("train", self.train), ("test", self.test)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!(
                    "{name} ratio must be within [0, 1], got {value}"
                )));
            }
        }
        if self.train + self.test > 1.0 + f64::EPSILON {
            return Err(Error::config(format!(
                "train + test ratios must not exceed 1, got {}",
                self.train + self.test
            )));
        }
        Ok(())
    }

    /// Split sizes for `total` records
    ///
    /// Train and test are floored, valid absorbs the rounding remainder.
    pub fn sizes(&self, total: usize) -> SplitSizes {
        let n = total as f64;
        let train = ((self.train * n).floor() as usize).min(total);
        let test = ((self.test * n).floor() as usize).min(total - train);
        SplitSizes {
            train,
            test,
            valid: total - train - test,
        }
    }
}

/// Record counts of the three splits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSizes {
    pub train: usize,
    pub test: usize,
    pub valid: usize,
}

impl SplitSizes {
    /// Size of one split
    pub fn get(&self, kind: SplitKind) -> usize {
        match kind {
            SplitKind::Train => self.train,
            SplitKind::Test => self.test,
            SplitKind::Valid => self.valid,
        }
    }

    /// Sum of all splits
    pub fn total(&self) -> usize {
        self.train + self.test + self.valid
    }
}

impl fmt::Display for SplitSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "train={} test={} valid={}",
            self.train, self.test, self.valid
        )
    }
}

// ============================================================================
// Link records
// ============================================================================

/// One line of a links file, kept byte-for-byte including its terminator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkRecord {
    raw: Vec<u8>,
}

impl LinkRecord {
    /// Wrap a raw line
    pub fn from_line(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }

    /// Line as stored, terminator included
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Line without its `\n` or `\r\n` terminator
    pub fn content(&self) -> &[u8] {
        let line = self.raw.strip_suffix(b"\n").unwrap_or(self.raw.as_slice());
        line.strip_suffix(b"\r").unwrap_or(line)
    }

    /// Whether the line ends with `\n`
    pub fn has_terminator(&self) -> bool {
        self.raw.ends_with(b"\n")
    }

    /// Source and target identifiers, if the line is `source \t target`
    pub fn fields(&self) -> Option<(&str, &str)> {
        let text = std::str::from_utf8(self.content()).ok()?;
        let mut parts = text.split('\t');
        let source = parts.next()?;
        let target = parts.next()?;
        if parts.next().is_some() || source.is_empty() || target.is_empty() {
            return None;
        }
        Some((source, target))
    }
}

/// Ordered link records read from one input artifact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCollection {
    records: Vec<LinkRecord>,
}

impl LinkCollection {
    /// Split raw file contents into records
    ///
    /// Each record keeps its own line ending. A final line without one is
    /// given the ending of the first line so it cannot fuse with another
    /// record once shuffled.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut records: Vec<LinkRecord> = bytes
            .split_inclusive(|b| *b == b'\n')
            .map(LinkRecord::from_line)
            .collect();

        let ending: &[u8] = match records.first() {
            Some(first) if first.as_bytes().ends_with(b"\r\n") => b"\r\n",
            _ => b"\n",
        };
        if let Some(last) = records.last_mut() {
            if !last.has_terminator() {
                last.raw.extend_from_slice(ending);
            }
        }

        Self { records }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in file order
    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    /// Records whose line is not exactly two non-empty tab-separated fields
    pub fn malformed_count(&self) -> usize {
        self.records.iter().filter(|r| r.fields().is_none()).count()
    }
}

/// The three splits of one fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldPartition {
    pub fold: Fold,
    pub train: Vec<LinkRecord>,
    pub test: Vec<LinkRecord>,
    pub valid: Vec<LinkRecord>,
}

impl FoldPartition {
    /// Records of one split
    pub fn split(&self, kind: SplitKind) -> &[LinkRecord] {
        match kind {
            SplitKind::Train => &self.train,
            SplitKind::Test => &self.test,
            SplitKind::Valid => &self.valid,
        }
    }

    /// Record counts
    pub fn sizes(&self) -> SplitSizes {
        SplitSizes {
            train: self.train.len(),
            test: self.test.len(),
            valid: self.valid.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_rejects_zero() {
        assert!(Fold::new(0).is_err());
        assert_eq!(Fold::new(3).unwrap().seed(), 3);
        assert!("0".parse::<Fold>().is_err());
        assert!("abc".parse::<Fold>().is_err());
        assert_eq!("5".parse::<Fold>().unwrap().id(), 5);
    }

    #[test]
    fn test_fold_range() {
        let folds: Vec<u32> = Fold::range(5).map(|f| f.id()).collect();
        assert_eq!(folds, vec![1, 2, 3, 4, 5]);
        assert_eq!(Fold::range(0).count(), 0);
    }

    #[test]
    fn test_size_law() {
        let ratios = SplitRatios::default();
        assert_eq!(
            ratios.sizes(10),
            SplitSizes {
                train: 7,
                test: 2,
                valid: 1
            }
        );
        assert_eq!(
            ratios.sizes(3),
            SplitSizes {
                train: 2,
                test: 0,
                valid: 1
            }
        );
        assert_eq!(ratios.sizes(0), SplitSizes::default());
        assert_eq!(ratios.sizes(1).valid, 1);
    }

    #[test]
    fn test_ratio_validation() {
        assert!(SplitRatios::new(0.7, 0.2).is_ok());
        assert!(SplitRatios::new(0.8, 0.2).is_ok());
        assert!(SplitRatios::new(0.9, 0.2).is_err());
        assert!(SplitRatios::new(-0.1, 0.2).is_err());
        assert!(SplitRatios::new(f64::NAN, 0.2).is_err());
    }

    #[test]
    fn test_parse_keeps_line_endings() {
        let collection = LinkCollection::parse(b"a\tb\r\nc\td\r\n");
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.records()[0].as_bytes(), b"a\tb\r\n");
        assert_eq!(collection.records()[0].content(), b"a\tb");
    }

    #[test]
    fn test_parse_terminates_last_line() {
        let collection = LinkCollection::parse(b"a\tb\nc\td");
        assert_eq!(collection.records()[1].as_bytes(), b"c\td\n");

        let collection = LinkCollection::parse(b"a\tb\r\nc\td");
        assert_eq!(collection.records()[1].as_bytes(), b"c\td\r\n");
    }

    #[test]
    fn test_parse_empty() {
        assert!(LinkCollection::parse(b"").is_empty());
    }

    #[test]
    fn test_record_fields() {
        let record = LinkRecord::from_line("http://wdc/e1\thttp://www.wikidata.org/entity/Q1\n");
        assert_eq!(
            record.fields(),
            Some(("http://wdc/e1", "http://www.wikidata.org/entity/Q1"))
        );
        assert!(LinkRecord::from_line("only-one-field\n").fields().is_none());
        assert!(LinkRecord::from_line("a\tb\tc\n").fields().is_none());

        let collection = LinkCollection::parse(b"a\tb\nbroken\n");
        assert_eq!(collection.malformed_count(), 1);
    }
}
