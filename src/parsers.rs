pub mod lr;
mod stack;
