mod engine;
mod value;
pub use engine::Engine;
pub use value::Value;
