//! Per-run hit accumulation and deduplication by paste id.

use std::collections::HashSet;

use pastehunt_core::{Candidate, Hit, PasteId, SourceKind};

/// Hits gathered during one aggregation run.
///
/// The first source to report a paste id owns it; later reports of the same
/// id, from the same or another source, are dropped.
#[derive(Debug, Default)]
pub struct AggregationContext {
    seen: HashSet<PasteId>,
    hits: Vec<Hit>,
}

impl AggregationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add candidates from `source`, returning how many were new.
    pub fn absorb(&mut self, candidates: Vec<Candidate>, source: SourceKind) -> usize {
        let before = self.hits.len();
        for candidate in candidates {
            if self.seen.insert(candidate.id.clone()) {
                self.hits.push(Hit::from_candidate(candidate, source));
            }
        }
        self.hits.len() - before
    }

    /// Number of unique hits so far.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Hits in the order they were first seen.
    pub fn into_hits(self) -> Vec<Hit> {
        self.hits
    }
}

/// Drop every hit whose id appeared earlier in the list.
pub fn dedup_hits(hits: Vec<Hit>) -> Vec<Hit> {
    let mut seen = HashSet::new();
    hits.into_iter().filter(|hit| seen.insert(hit.id.clone())).collect()
}

/// Title matches first; order within each group is preserved.
pub fn sort_hits(hits: &mut [Hit]) {
    hits.sort_by_key(|hit| hit.kind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pastehunt_core::{MatchKind, SnippetHint};

    fn candidate(id: &str, kind: MatchKind) -> Candidate {
        Candidate {
            id: PasteId::parse(id).unwrap(),
            title: format!("title {id}"),
            link: format!("https://pastebin.com/{id}"),
            kind,
            hint: SnippetHint::Title(format!("title {id}")),
        }
    }

    #[test]
    fn test_absorb_first_writer_wins() {
        let mut ctx = AggregationContext::new();
        let added = ctx.absorb(vec![candidate("AbCd1234", MatchKind::Title)], SourceKind::Archive);
        assert_eq!(added, 1);

        let added = ctx.absorb(
            vec![candidate("AbCd1234", MatchKind::Content), candidate("EfGh5678", MatchKind::Content)],
            SourceKind::Google,
        );
        assert_eq!(added, 1);

        let hits = ctx.into_hits();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, SourceKind::Archive);
        assert_eq!(hits[0].kind, MatchKind::Title);
        assert_eq!(hits[1].source, SourceKind::Google);
    }

    #[test]
    fn test_absorb_drops_duplicates_within_one_source() {
        let mut ctx = AggregationContext::new();
        let added = ctx.absorb(
            vec![candidate("AbCd1234", MatchKind::Content), candidate("AbCd1234", MatchKind::Title)],
            SourceKind::DuckDuckGo,
        );
        assert_eq!(added, 1);
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_dedup_hits() {
        let mut ctx = AggregationContext::new();
        ctx.absorb(vec![candidate("AbCd1234", MatchKind::Title)], SourceKind::Archive);
        let mut hits = ctx.into_hits();
        hits.push(hits[0].clone());

        assert_eq!(dedup_hits(hits).len(), 1);
    }

    #[test]
    fn test_sort_hits_is_stable() {
        let mut ctx = AggregationContext::new();
        ctx.absorb(
            vec![
                candidate("Content1", MatchKind::Content),
                candidate("TitleAa1", MatchKind::Title),
                candidate("Content2", MatchKind::Content),
                candidate("TitleAa2", MatchKind::Title),
            ],
            SourceKind::Archive,
        );
        let mut hits = ctx.into_hits();
        sort_hits(&mut hits);

        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["TitleAa1", "TitleAa2", "Content1", "Content2"]);
    }
}
