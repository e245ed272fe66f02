mod user;
pub use user::{UserEntity, UserEntityCreateUpdate};

mod module;
pub use module::{Module, ModuleCreate};

mod lesson;
pub use lesson::{Lesson, LessonCreate, RoadmapLessonRow};

mod question;
pub use question::{Choice, Question, QuestionCreate, answer_key_references_choices};

mod response;
pub use response::{ResponseEntity, ResponseCreate};

mod progress;
pub use progress::{ProgressEntity, progress_key};

mod report;
pub use report::{ReportEntity, ReportCreate};
