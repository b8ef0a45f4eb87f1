//! Fixed train / validation / test partition of instance indices.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Total number of indexed instances covered by the splits.
pub const NUM_INDEXED_INSTANCES: usize = 150;

/// Dataset split, selected by the index encoded in the instance file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// Indices 0..60
    Train,
    /// Indices 60..80
    Val,
    /// Indices 80..150
    Test,
    /// Indices 0..150
    All,
}

impl Split {
    /// Half-open index range of this split.
    pub fn range(&self) -> Range<usize> {
        match self {
            Split::Train => 0..60,
            Split::Val => 60..80,
            Split::Test => 80..NUM_INDEXED_INSTANCES,
            Split::All => 0..NUM_INDEXED_INSTANCES,
        }
    }

    /// Whether instance `index` belongs to this split.
    pub fn contains(&self, index: i64) -> bool {
        usize::try_from(index).map_or(false, |i| self.range().contains(&i))
    }

    /// Lowercase split name.
    pub fn name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
            Split::All => "all",
        }
    }
}

impl FromStr for Split {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(Split::Train),
            "val" | "valid" | "validation" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            "all" => Ok(Split::All),
            _ => Err(DataError::UnknownSplit(s.to_string())),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert!(Split::Train.contains(59));
        assert!(!Split::Val.contains(59));
        assert!(Split::Val.contains(60));
        assert!(!Split::Train.contains(60));
        assert!(Split::Val.contains(79));
        assert!(Split::Test.contains(80));
        assert!(Split::Test.contains(149));

        for split in [Split::Train, Split::Val, Split::Test, Split::All] {
            assert!(!split.contains(150), "{} must exclude 150", split);
            assert!(!split.contains(10_000));
            assert!(!split.contains(-1));
            assert!(!split.contains(i64::MIN));
        }
    }

    #[test]
    fn test_splits_partition_all() {
        for i in 0..NUM_INDEXED_INSTANCES as i64 {
            let owners = [Split::Train, Split::Val, Split::Test]
                .iter()
                .filter(|s| s.contains(i))
                .count();
            assert_eq!(owners, 1, "index {} must be in exactly one split", i);
            assert!(Split::All.contains(i));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("TRAIN".parse::<Split>().unwrap(), Split::Train);
        assert_eq!("validation".parse::<Split>().unwrap(), Split::Val);
        assert_eq!("Test".parse::<Split>().unwrap(), Split::Test);
        assert!(matches!("holdout".parse::<Split>(), Err(DataError::UnknownSplit(_))));
    }
}
