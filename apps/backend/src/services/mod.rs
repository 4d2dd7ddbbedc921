pub mod locks;
pub mod progress;
pub mod quiz;

pub use progress::ProgressService;
pub use quiz::QuizService;
