pub mod answer_solver;
pub mod endpoint_resolver;
pub mod llm_service;
pub mod submit_service;

pub use answer_solver::AnswerSolver;
pub use endpoint_resolver::EndpointResolver;
pub use llm_service::{LlmService, Oracle};
pub use submit_service::{HttpSubmitter, Submitter};
