//! 基础设施层：持有稀缺资源（Browser / Page），只暴露能力

pub mod js_executor;
pub mod renderer;

pub use js_executor::JsExecutor;
pub use renderer::{BrowserRenderer, PageRenderer};
