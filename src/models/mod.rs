pub mod analysis;
pub mod answer;
pub mod submission;

pub use analysis::{Analysis, AnswerFormat, TaskType};
pub use answer::Answer;
pub use submission::{Credentials, SubmissionPayload, SubmissionResult};
