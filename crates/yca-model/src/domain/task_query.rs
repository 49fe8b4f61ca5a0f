use super::{TaskInfo, TaskStatus};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// Query parameters for listing tasks with filtering and pagination.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub limit: usize,
    pub offset: usize,
}

/// Result of a paginated task query.
#[derive(Debug, Clone)]
pub struct TaskPage<T> {
    pub items: Vec<T>,
    /// Number of matches before pagination.
    pub total: usize,
}

impl<T> TaskPage<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> TaskPage<U> {
        TaskPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

impl TaskQuery {
    pub fn new() -> Self {
        Self {
            status: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_LIMIT);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn matches(&self, info: &TaskInfo) -> bool {
        self.status.is_none_or(|s| info.status == s)
    }

    /// Cut the requested window out of the full, already ordered match list.
    pub fn paginate<T>(&self, matched: Vec<T>) -> TaskPage<T> {
        let total = matched.len();
        let items = matched
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect();
        TaskPage { items, total }
    }
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(TaskQuery::new().limit, DEFAULT_LIMIT);
        assert_eq!(TaskQuery::new().with_limit(5_000).limit, MAX_LIMIT);
    }

    #[test]
    fn paginate_reports_total_before_windowing() {
        let q = TaskQuery::new().with_offset(2).with_limit(2);
        let page = q.paginate((0..5).collect::<Vec<_>>());
        assert_eq!(page.items, vec![2, 3]);
        assert_eq!(page.total, 5);

        let past_end = TaskQuery::new().with_offset(9).paginate(vec![1, 2]);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 2);
    }

    #[test]
    fn zero_limit_yields_empty_window() {
        let page = TaskQuery::new().with_limit(0).paginate(vec![1, 2, 3]);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }

    #[test]
    fn page_map_keeps_total() {
        let page = TaskPage {
            items: vec![1, 2],
            total: 7,
        };
        let page = page.map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 7);
    }
}
