//! Part/excerpt selection: decide which score the working view is cloned from.

use crate::model::{Document, Score};

/// Where the working view comes from. Holds indices and owned names only,
/// never references into the document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewSource {
    #[default]
    WholeDocument,
    /// A pre-built excerpt with its own sub-score
    Excerpt { index: usize, title: String },
    /// One instrument of the full score, the others hidden
    Part { index: usize, name: String },
}

impl ViewSource {
    /// Resolve a requested index. Excerpts win over raw parts; the index is
    /// clamped into range. `None` (or a document with neither) selects the
    /// whole document.
    pub fn resolve(document: &Document, requested: Option<usize>) -> Self {
        let Some(index) = requested else {
            return Self::WholeDocument;
        };
        if !document.excerpts.is_empty() {
            let index = index.min(document.excerpts.len() - 1);
            return Self::Excerpt {
                index,
                title: document.excerpts[index].title.clone(),
            };
        }
        if !document.score.parts.is_empty() {
            let index = index.min(document.score.parts.len() - 1);
            return Self::Part {
                index,
                name: document.score.parts[index].display_name().to_string(),
            };
        }
        Self::WholeDocument
    }

    /// Score the working view is cloned from.
    pub fn base<'a>(&self, document: &'a Document) -> &'a Score {
        match self {
            Self::Excerpt { index, .. } => document
                .excerpts
                .get(*index)
                .map_or(&document.score, |e| &e.score),
            Self::WholeDocument | Self::Part { .. } => &document.score,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::WholeDocument => None,
            Self::Excerpt { title, .. } => Some(title),
            Self::Part { name, .. } => Some(name),
        }
    }

    /// Whether the view shows a single instrument of the full score.
    pub fn solo_instrument(&self) -> bool {
        matches!(self, Self::Part { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Self::WholeDocument => None,
            Self::Excerpt { index, .. } | Self::Part { index, .. } => Some(*index),
        }
    }
}

/// Hide every instrument except `keep`. Music is hidden, not deleted.
pub fn isolate_part(score: &mut Score, keep: usize) {
    for (i, part) in score.parts.iter_mut().enumerate() {
        if i != keep {
            part.show = false;
        }
    }
}

/// Names a user can pick from: excerpt titles if there are any, else parts.
pub fn selectable_names(document: &Document) -> Vec<String> {
    if !document.excerpts.is_empty() {
        document.excerpts.iter().map(|e| e.title.clone()).collect()
    } else {
        document
            .score
            .parts
            .iter()
            .map(|p| p.display_name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Excerpt, Part};
    use pretty_assertions::assert_eq;

    fn part(id: &str, name: &str) -> Part {
        Part {
            id: id.into(),
            name: name.into(),
            abbreviation: None,
            show: true,
            transpose: None,
            measures: Vec::new(),
        }
    }

    fn document() -> Document {
        let score = Score {
            parts: vec![part("P1", "Flute"), part("P2", ""), part("P3", "Cello")],
            ..Score::new()
        };
        Document::new("trio", score)
    }

    #[test]
    fn parts_are_clamped_and_soloed() {
        let doc = document();
        let source = ViewSource::resolve(&doc, Some(10));
        assert_eq!(
            source,
            ViewSource::Part {
                index: 2,
                name: "Cello".into()
            }
        );
        assert!(source.solo_instrument());
    }

    #[test]
    fn unnamed_part_falls_back_to_id() {
        let source = ViewSource::resolve(&document(), Some(1));
        assert_eq!(source.display_name(), Some("P2"));
    }

    #[test]
    fn excerpts_take_priority_over_parts() {
        let mut doc = document();
        doc.excerpts.push(Excerpt::from_parts(&doc.score, "Winds", &[0]));
        doc.excerpts.push(Excerpt::from_parts(&doc.score, "Strings", &[2]));
        let source = ViewSource::resolve(&doc, Some(7));
        assert_eq!(
            source,
            ViewSource::Excerpt {
                index: 1,
                title: "Strings".into()
            }
        );
        assert!(!source.solo_instrument());
        assert_eq!(source.base(&doc).parts[0].name, "Cello");
        assert_eq!(selectable_names(&doc), vec!["Winds", "Strings"]);
    }

    #[test]
    fn no_request_or_no_parts_means_whole_document() {
        assert_eq!(ViewSource::resolve(&document(), None), ViewSource::WholeDocument);
        let empty = Document::new("empty", Score::new());
        let source = ViewSource::resolve(&empty, Some(0));
        assert_eq!(source, ViewSource::WholeDocument);
        assert_eq!(source.display_name(), None);
    }

    #[test]
    fn isolation_hides_all_but_one() {
        let mut score = document().score;
        isolate_part(&mut score, 1);
        let shown: Vec<bool> = score.parts.iter().map(|p| p.show).collect();
        assert_eq!(shown, vec![false, true, false]);
    }
}
