mod comment;
pub use comment::{AnalyzedComment, RawComment};

mod event;
pub use event::{EventKind, TaskEvent};

mod task_data;
pub use task_data::{Summary, TaskData};

mod task_id;
pub use task_id::TaskId;

mod task_info;
pub use task_info::TaskInfo;

mod task_query;
pub use task_query::{TaskPage, TaskQuery};

mod task_status;
pub use task_status::TaskStatus;

mod task_view;
pub use task_view::{TaskStatusView, YoutubeVideo};

/// Free-form classification label attached to a comment.
pub type Category = String;
