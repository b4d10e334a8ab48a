//! Instruction generation: templates, terminology and the row generator.

pub mod generator;
pub mod templates;
pub mod terminology;

pub use generator::{InstructionGenerator, SectionPlan, Setup, group_steps};
pub use templates::{InstructionKind, RowEnd, RowValues, Shaping, TemplateSet};
pub use terminology::{Term, Terminology};
