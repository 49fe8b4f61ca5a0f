use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tracing::debug;
use yca_model::{AnalyzedComment, RawComment, VideoRef};

use crate::error::UpstreamError;

/// Fetches the comments of a video.
#[async_trait]
pub trait CommentSource: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn fetch(&self, video: &VideoRef) -> Result<Vec<RawComment>, UpstreamError>;
}

/// Assigns a category and reasoning to each comment.
///
/// Every input comment must come back with a label; ids that were not in the
/// input are rejected, and so is an answer that leaves comments out.
#[async_trait]
pub trait CommentClassifier: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn classify(
        &self,
        comments: &[RawComment],
    ) -> Result<Vec<AnalyzedComment>, UpstreamError>;
}

/// Fetch + classify, with the result normalized for the task store.
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn CommentSource>,
    classifier: Arc<dyn CommentClassifier>,
}

impl Pipeline {
    pub fn new(source: Arc<dyn CommentSource>, classifier: Arc<dyn CommentClassifier>) -> Self {
        Self { source, classifier }
    }

    /// Run the analysis for one video.
    ///
    /// Output follows the fetch order and holds each fetched comment id exactly once.
    pub async fn analyze(&self, video: &VideoRef) -> Result<Vec<AnalyzedComment>, UpstreamError> {
        let mut fetched = self.source.fetch(video).await?;
        let mut seen = HashSet::with_capacity(fetched.len());
        fetched.retain(|c| seen.insert(c.id.clone()));
        debug!(
            source = self.source.name(),
            video = video.video_id(),
            comments = fetched.len(),
            "comments fetched"
        );

        if fetched.is_empty() {
            return Ok(Vec::new());
        }

        let classified = self.classifier.classify(&fetched).await?;
        let produced = classified.len();
        let ordered = order_by_source(&fetched, classified)?;
        debug!(
            classifier = self.classifier.name(),
            produced,
            kept = ordered.len(),
            "comments classified"
        );
        Ok(ordered)
    }
}

fn order_by_source(
    source: &[RawComment],
    classified: Vec<AnalyzedComment>,
) -> Result<Vec<AnalyzedComment>, UpstreamError> {
    let index: HashMap<&str, usize> = source
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.as_str(), i))
        .collect();
    let mut slots: Vec<Option<AnalyzedComment>> = vec![None; source.len()];
    for c in classified {
        let pos = *index
            .get(c.id.as_str())
            .ok_or_else(|| UpstreamError::UnknownComment(c.id.clone()))?;
        // first answer wins
        if slots[pos].is_none() {
            slots[pos] = Some(c);
        }
    }
    let missing: Vec<String> = source
        .iter()
        .zip(&slots)
        .filter(|(_, slot)| slot.is_none())
        .map(|(raw, _)| raw.id.clone())
        .collect();
    if !missing.is_empty() {
        return Err(UpstreamError::Unclassified(missing));
    }
    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FixedSource(Vec<RawComment>);

    #[async_trait]
    impl CommentSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }
        async fn fetch(&self, _video: &VideoRef) -> Result<Vec<RawComment>, UpstreamError> {
            Ok(self.0.clone())
        }
    }

    /// Labels comments in reverse order, optionally adding a stray id or
    /// answering for the first `only` comments.
    #[derive(Default)]
    struct ReverseClassifier {
        stray: Option<&'static str>,
        only: Option<usize>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommentClassifier for ReverseClassifier {
        fn name(&self) -> &'static str {
            "reverse"
        }
        async fn classify(
            &self,
            comments: &[RawComment],
        ) -> Result<Vec<AnalyzedComment>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let answered = &comments[..self.only.unwrap_or(comments.len()).min(comments.len())];
            let mut out: Vec<AnalyzedComment> = answered
                .iter()
                .rev()
                .map(|c| AnalyzedComment {
                    id: c.id.clone(),
                    category: "other".into(),
                    reasoning: c.text.clone(),
                })
                .collect();
            if let Some(id) = self.stray {
                out.push(AnalyzedComment {
                    id: id.into(),
                    category: "other".into(),
                    reasoning: String::new(),
                });
            }
            Ok(out)
        }
    }

    fn raw(id: &str) -> RawComment {
        RawComment {
            id: id.into(),
            author: "someone".into(),
            text: format!("text {id}"),
        }
    }

    fn video() -> VideoRef {
        VideoRef::parse("https://youtu.be/abc").unwrap()
    }

    #[tokio::test]
    async fn results_follow_source_order_without_duplicates() {
        let source = FixedSource(vec![raw("a"), raw("b"), raw("a"), raw("c")]);
        let pipeline = Pipeline::new(Arc::new(source), Arc::new(ReverseClassifier::default()));

        let out = pipeline.analyze(&video()).await.unwrap();
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn empty_video_skips_classifier() {
        let classifier = Arc::new(ReverseClassifier::default());
        let pipeline = Pipeline::new(Arc::new(FixedSource(vec![])), classifier.clone());

        let out = pipeline.analyze(&video()).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invented_ids_are_rejected() {
        let classifier = ReverseClassifier {
            stray: Some("zzz"),
            ..Default::default()
        };
        let pipeline = Pipeline::new(Arc::new(FixedSource(vec![raw("a")])), Arc::new(classifier));

        let err = pipeline.analyze(&video()).await.unwrap_err();
        assert_eq!(err, UpstreamError::UnknownComment("zzz".into()));
    }

    #[tokio::test]
    async fn dropped_comments_fail_the_analysis() {
        let classifier = ReverseClassifier {
            only: Some(1),
            ..Default::default()
        };
        let source = FixedSource(vec![raw("a"), raw("b"), raw("c")]);
        let pipeline = Pipeline::new(Arc::new(source), Arc::new(classifier));

        let err = pipeline.analyze(&video()).await.unwrap_err();
        assert_eq!(err, UpstreamError::Unclassified(vec!["b".into(), "c".into()]));
    }
}
