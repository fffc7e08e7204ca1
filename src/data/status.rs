//! Status labels and per-page status filters.
//!
//! The tracker treats status as an open string. Producers are responsible
//! for folding whatever the upstream service reports into one of the
//! canonical labels below before a snapshot reaches the tracker.

/// Canonical SISS label for a healthy site.
pub const NORMAL: &str = "NORMAL";
/// Canonical SISS label for a site needing attention ("NOT INSTALLED" upstream).
pub const CRITICAL: &str = "CRITICAL";
/// Tower report label for a reachable tower.
pub const ONLINE: &str = "Online";
/// Tower report label for an unreachable tower.
pub const OFFLINE: &str = "Offline";

/// Fold a raw SISS status into its canonical label.
///
/// Returns `None` for statuses the dashboard does not track; those rows are
/// dropped by the producer.
pub fn normalize_site_status(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    if trimmed == NORMAL {
        Some(NORMAL)
    } else if trimmed == "NOT INSTALLED" || trimmed.eq_ignore_ascii_case(CRITICAL) {
        Some(CRITICAL)
    } else {
        None
    }
}

/// Which page a filter belongs to. Each page has its own closed set of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Tower,
    Site,
}

impl FilterKind {
    fn labels(self) -> [&'static str; 2] {
        match self {
            FilterKind::Tower => [OFFLINE, ONLINE],
            FilterKind::Site => [NORMAL, CRITICAL],
        }
    }
}

/// Status filter selected for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFilter {
    kind: FilterKind,
    only: Option<&'static str>,
}

impl StatusFilter {
    /// A filter that shows every row.
    pub fn all(kind: FilterKind) -> Self {
        Self { kind, only: None }
    }

    /// The status this filter keeps, or `None` when it keeps everything.
    pub fn status(&self) -> Option<&'static str> {
        self.only
    }

    /// The same page's filter with nothing excluded.
    pub fn cleared(self) -> Self {
        Self::all(self.kind)
    }

    /// Cycle All -> first label -> second label -> All.
    pub fn next(self) -> Self {
        let [first, second] = self.kind.labels();
        let only = match self.only {
            None => Some(first),
            Some(s) if s == first => Some(second),
            Some(_) => None,
        };
        Self { only, ..self }
    }

    /// Human-readable label for the header bar and table titles.
    pub fn label(&self) -> String {
        match (self.kind, self.only) {
            (FilterKind::Tower, None) => "Offline & Online".to_string(),
            (FilterKind::Site, None) => "NORMAL + CRITICAL".to_string(),
            (_, Some(s)) => format!("{} only", s),
        }
    }

    /// Lowercase token used in export filenames ("semua" when unfiltered).
    pub fn file_token(&self) -> String {
        self.only
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| "semua".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_known_site_statuses() {
        assert_eq!(normalize_site_status("NORMAL"), Some(NORMAL));
        assert_eq!(normalize_site_status("NOT INSTALLED"), Some(CRITICAL));
        assert_eq!(normalize_site_status("CRITICAL"), Some(CRITICAL));
        assert_eq!(normalize_site_status("Critical"), Some(CRITICAL));
        assert_eq!(normalize_site_status("critical"), Some(CRITICAL));
    }

    #[test]
    fn drops_untracked_site_statuses() {
        assert_eq!(normalize_site_status("MAINTENANCE"), None);
        assert_eq!(normalize_site_status(""), None);
        assert_eq!(normalize_site_status("normal"), None);
    }

    #[test]
    fn tower_filter_cycles_offline_first() {
        let f = StatusFilter::all(FilterKind::Tower);
        assert_eq!(f.status(), None);
        let f = f.next();
        assert_eq!(f.status(), Some(OFFLINE));
        let f = f.next();
        assert_eq!(f.status(), Some(ONLINE));
        assert_eq!(f.next().status(), None);
        assert_eq!(f.cleared(), StatusFilter::all(FilterKind::Tower));
    }

    #[test]
    fn site_filter_tokens() {
        let f = StatusFilter::all(FilterKind::Site);
        assert_eq!(f.file_token(), "semua");
        assert_eq!(f.next().file_token(), "normal");
        assert_eq!(f.next().next().file_token(), "critical");
        assert_eq!(f.next().next().label(), "CRITICAL only");
    }
}
