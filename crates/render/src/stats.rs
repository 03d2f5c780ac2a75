use std::fmt;

use tracker_api::SortBy;

/// Summary line above the result grid.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsLine {
    pub count: usize,
    pub from_cache: bool,
    pub sort_by: Option<SortBy>,
}

impl fmt::Display for StatsLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Found {} papers", self.count)?;
        match self.sort_by {
            Some(SortBy::Authority) => write!(f, " - sorted by authority")?,
            Some(SortBy::Date) => write!(f, " - sorted by date")?,
            Some(SortBy::Relevance) => write!(f, " - sorted by relevance")?,
            Some(SortBy::Other) | None => {}
        }
        if self.from_cache {
            write!(f, " (from cache)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_line_variants() {
        let plain = StatsLine {
            count: 3,
            from_cache: false,
            sort_by: None,
        };
        assert_eq!(plain.to_string(), "Found 3 papers");

        let full = StatsLine {
            count: 12,
            from_cache: true,
            sort_by: Some(SortBy::Authority),
        };
        assert_eq!(full.to_string(), "Found 12 papers - sorted by authority (from cache)");
    }
}
